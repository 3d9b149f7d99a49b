//! Menu category record.

use super::locale::LocaleMap;
use serde::{Deserialize, Serialize};

/// Category identifier, unique within the category collection.
pub type CategoryId = i64;

/// A menu section such as "Food" or "Drinks".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: LocaleMap,
}

impl Category {
    pub fn new(id: CategoryId, name: LocaleMap) -> Self {
        Self { id, name }
    }
}
