//! Menu item record.
//!
//! # Invariants
//! - `id` is unique within the item collection and never reused.
//! - `category_id` is a loose reference: nothing guarantees the category
//!   still exists, and readers must tolerate a failed lookup.

use super::category::CategoryId;
use super::image::ImageBlob;
use super::locale::LocaleMap;
use super::price::Price;
use serde::{Deserialize, Deserializer, Serialize};

/// Item identifier, unique within the item collection.
pub type ItemId = i64;

/// Whether an item can currently be ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Available,
    Unavailable,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }

    pub fn is_available(self) -> bool {
        self == Self::Available
    }
}

/// A dish or drink listed on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    #[serde(deserialize_with = "int_or_numeric_text")]
    pub category_id: CategoryId,
    pub price: Price,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub image: Option<ImageBlob>,
    pub name: LocaleMap,
    #[serde(default)]
    pub desc: LocaleMap,
}

/// Older snapshots stored the category select value verbatim, as text.
fn int_or_numeric_text<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse::<i64>().map_err(|_| {
            serde::de::Error::custom(format!("invalid numeric reference `{text}`"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemStatus};
    use crate::model::price::Price;

    #[test]
    fn decodes_form_text_fields_from_older_snapshots() {
        let value = serde_json::json!({
            "id": 1700000000000_i64,
            "categoryId": "2",
            "price": "1500",
            "status": "unavailable",
            "image": null,
            "name": { "en": "Tea", "ar": "شاي", "ku": "چا" },
            "desc": { "en": "", "ar": "", "ku": "" }
        });

        let item: Item = serde_json::from_value(value).unwrap();
        assert_eq!(item.category_id, 2);
        assert_eq!(item.price, Price::new(1500));
        assert_eq!(item.status, ItemStatus::Unavailable);
        assert!(item.image.is_none());
    }

    #[test]
    fn encodes_with_camel_case_keys() {
        let value = serde_json::json!({
            "id": 3,
            "categoryId": 2,
            "price": 1000,
            "status": "available",
            "image": null,
            "name": { "en": "Cola", "ar": "", "ku": "" },
            "desc": { "en": "Cold drink", "ar": "", "ku": "" }
        });
        let item: Item = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), value);
    }

    #[test]
    fn rejects_non_numeric_category_reference() {
        let value = serde_json::json!({
            "id": 1,
            "categoryId": "drinks",
            "price": 1,
            "status": "available",
            "name": { "en": "Cola" }
        });
        assert!(serde_json::from_value::<Item>(value).is_err());
    }
}
