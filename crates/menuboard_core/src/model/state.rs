//! Root application state aggregate.
//!
//! # Responsibility
//! - Hold every persisted field: locale, session, records, settings and the
//!   id sequence.
//! - Hand out record ids from one monotonic sequence.
//!
//! # Invariants
//! - Category ids are unique among categories; item ids among items.
//! - `next_id` is greater than every id in either collection after
//!   `normalize_sequence`, so allocated ids are never reused.
//! - Sequence arithmetic is checked; an exhausted sequence is an error, never
//!   a wrapped or repeated id.
//! - No invariant links `Item::category_id` to an existing category.

use super::category::Category;
use super::item::Item;
use super::locale::Locale;
use super::seed::{default_categories, default_items, DEFAULT_PASSWORD};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Who is driving the UI. Not a security boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    #[default]
    Anonymous,
    Manager,
}

impl Session {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Manager => "manager",
        }
    }
}

impl<'de> Deserialize<'de> for Session {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Older snapshots stored `user: null | "manager"`.
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("anonymous") => Ok(Self::Anonymous),
            Some("manager") => Ok(Self::Manager),
            Some(other) => Err(serde::de::Error::unknown_variant(
                other,
                &["anonymous", "manager"],
            )),
        }
    }
}

/// Manager settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

/// Persisted-state consistency errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    DuplicateCategoryId(i64),
    DuplicateItemId(i64),
    /// No id above the highest one in use is representable.
    IdSequenceExhausted,
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateCategoryId(id) => write!(f, "duplicate category id {id}"),
            Self::DuplicateItemId(id) => write!(f, "duplicate item id {id}"),
            Self::IdSequenceExhausted => write!(f, "record id sequence exhausted"),
        }
    }
}

impl Error for StateError {}

/// Whole application snapshot; persisted as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default, alias = "lang")]
    pub locale: Locale,
    #[serde(default, alias = "user")]
    pub session: Session,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub(crate) next_id: i64,
}

impl AppState {
    /// First-run state: default records, default password, anonymous session.
    pub fn seeded() -> Self {
        let mut state = Self {
            categories: default_categories(),
            items: default_items(),
            ..Self::default()
        };
        state.next_id = state.max_used_id().saturating_add(1).max(1);
        state
    }

    pub fn is_manager(&self) -> bool {
        self.session == Session::Manager
    }

    /// Next id the sequence will hand out.
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    /// Takes one id from the sequence.
    pub(crate) fn allocate_id(&mut self) -> Result<i64, StateError> {
        self.normalize_sequence()?;
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(StateError::IdSequenceExhausted)?;
        Ok(id)
    }

    /// Moves the sequence past every id already in use.
    ///
    /// Snapshots written before the sequence existed carry timestamp ids and
    /// no `nextId`; this keeps new ids clear of them.
    pub(crate) fn normalize_sequence(&mut self) -> Result<(), StateError> {
        let floor = self
            .max_used_id()
            .checked_add(1)
            .ok_or(StateError::IdSequenceExhausted)?;
        self.next_id = self.next_id.max(floor).max(1);
        Ok(())
    }

    fn max_used_id(&self) -> i64 {
        self.categories
            .iter()
            .map(|category| category.id)
            .chain(self.items.iter().map(|item| item.id))
            .max()
            .unwrap_or(0)
    }

    /// Verifies per-collection id uniqueness.
    pub fn check_unique_ids(&self) -> Result<(), StateError> {
        let mut seen = HashSet::with_capacity(self.categories.len());
        for category in &self.categories {
            if !seen.insert(category.id) {
                return Err(StateError::DuplicateCategoryId(category.id));
            }
        }

        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(item.id) {
                return Err(StateError::DuplicateItemId(item.id));
            }
        }
        Ok(())
    }
}
