//! Locale Projection: display-ready text for the public menu.
//!
//! # Invariants
//! - Projection never mutates stored records.
//! - Empty translations fall back to English.
//! - Card order follows item collection order.

use crate::model::category::CategoryId;
use crate::model::item::ItemId;
use crate::model::locale::{Locale, LocaleMap};
use crate::model::state::AppState;
use crate::service::catalog::{find_category, items_in, MenuFilter};

/// Text for `locale`, or the English text when that is empty.
pub fn resolve_text(field: &LocaleMap, locale: Locale) -> &str {
    match field.get(locale) {
        "" => &field.en,
        value => value,
    }
}

/// Category selector entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTab {
    pub id: CategoryId,
    pub label: String,
}

/// One item as shown on the public menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCard {
    pub id: ItemId,
    pub category_id: CategoryId,
    /// `None` when the item's category was deleted.
    pub category_label: Option<String>,
    pub name: String,
    pub desc: String,
    /// Grouped amount with currency code, e.g. `6,000 IQD`.
    pub price: String,
    pub available: bool,
    /// Encoded image text, when one is attached.
    pub image: Option<String>,
}

/// Category tabs in collection order.
pub fn category_tabs(state: &AppState, locale: Locale) -> Vec<CategoryTab> {
    state
        .categories
        .iter()
        .map(|category| CategoryTab {
            id: category.id,
            label: resolve_text(&category.name, locale).to_string(),
        })
        .collect()
}

/// Menu cards for `filter`, projected into `locale`.
pub fn menu_cards(state: &AppState, locale: Locale, filter: MenuFilter) -> Vec<MenuCard> {
    items_in(state, filter)
        .into_iter()
        .map(|item| MenuCard {
            id: item.id,
            category_id: item.category_id,
            category_label: find_category(state, item.category_id)
                .map(|category| resolve_text(&category.name, locale).to_string()),
            name: resolve_text(&item.name, locale).to_string(),
            desc: resolve_text(&item.desc, locale).to_string(),
            price: item.price.display(),
            available: item.status.is_available(),
            image: item.image.as_ref().map(|image| image.as_str().to_string()),
        })
        .collect()
}
