//! Fixed first-run dataset.
//!
//! Kept separate from load/persist so a store reset can reuse it.

use super::category::Category;
use super::item::{Item, ItemStatus};
use super::locale::LocaleMap;
use super::price::Price;

/// Manager passphrase used until the first password change.
pub const DEFAULT_PASSWORD: &str = "manager";

pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(1, LocaleMap::new("Food", "طعام", "خواردن")),
        Category::new(2, LocaleMap::new("Drinks", "مشروبات", "ڤەخواردن")),
        Category::new(3, LocaleMap::new("Dessert", "حلويات", "شیرینی")),
        Category::new(4, LocaleMap::new("Special", "عروض خاصة", "تایبەتی")),
    ]
}

pub fn default_items() -> Vec<Item> {
    vec![
        Item {
            id: 1,
            category_id: 1,
            price: Price::new(6000),
            status: ItemStatus::Available,
            image: None,
            name: LocaleMap::new("Chicken Shawarma", "شاورما دجاج", "شاورمای مریشک"),
            desc: LocaleMap::new(
                "Tasty chicken with garlic",
                "دجاج لذيذ مع ثوم",
                "مریشکی بەتام لەگەڵ سیر",
            ),
        },
        Item {
            id: 2,
            category_id: 1,
            price: Price::new(9000),
            status: ItemStatus::Available,
            image: None,
            name: LocaleMap::new("Beef Kebab", "كباب لحم", "كبابی گۆشت"),
            desc: LocaleMap::new("Grilled beef skewers", "لحم مشوي", "گۆشتی برژاو"),
        },
        Item {
            id: 3,
            category_id: 2,
            price: Price::new(1000),
            status: ItemStatus::Unavailable,
            image: None,
            name: LocaleMap::new("Cola", "كولا", "کۆلا"),
            desc: LocaleMap::new("Cold drink", "مشروب بارد", "خواردنەوەی سارد"),
        },
    ]
}
