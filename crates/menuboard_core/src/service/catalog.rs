//! CRUD Engine for categories and items.
//!
//! # Responsibility
//! - Create, replace and delete records on an exclusively borrowed state.
//! - Parse raw form input into typed records.
//!
//! # Invariants
//! - Creates append; updates replace in place; collection order is
//!   insertion order and is never re-sorted.
//! - An input id that matches nothing is treated as a create with a fresh id.
//! - Deleting a category never touches items.
//! - Record names need a non-blank English value; other text may be empty.

use crate::model::category::{Category, CategoryId};
use crate::model::image::{ImageBlob, ImageError};
use crate::model::item::{Item, ItemId, ItemStatus};
use crate::model::locale::LocaleMap;
use crate::model::price::{Price, PriceError};
use crate::model::state::AppState;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Catalog validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The English name is blank. `record` is `category` or `item`.
    EmptyName { record: &'static str },
    InvalidPrice(PriceError),
    InvalidImage(ImageError),
    /// A form field could not be parsed.
    InvalidField { field: &'static str, value: String },
    /// No fresh record id is left to hand out.
    IdsExhausted,
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName { record } => write!(f, "{record} name (en) must not be empty"),
            Self::InvalidPrice(err) => write!(f, "{err}"),
            Self::InvalidImage(err) => write!(f, "{err}"),
            Self::InvalidField { field, value } => write!(f, "invalid {field}: `{value}`"),
            Self::IdsExhausted => write!(f, "no record ids left"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPrice(err) => Some(err),
            Self::InvalidImage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PriceError> for CatalogError {
    fn from(value: PriceError) -> Self {
        Self::InvalidPrice(value)
    }
}

impl From<ImageError> for CatalogError {
    fn from(value: ImageError) -> Self {
        Self::InvalidImage(value)
    }
}

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted<Id> {
    Created(Id),
    Updated(Id),
}

impl<Id: Copy> Upserted<Id> {
    pub fn id(&self) -> Id {
        match self {
            Self::Created(id) | Self::Updated(id) => *id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Item listing filter for the public menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuFilter {
    #[default]
    All,
    Category(CategoryId),
}

/// Category create/replace request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    /// `None` creates; an existing id replaces that category.
    pub id: Option<CategoryId>,
    pub name: LocaleMap,
}

/// Item create/replace request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    /// `None` creates; an existing id replaces that item.
    pub id: Option<ItemId>,
    pub category_id: CategoryId,
    pub price: Price,
    pub status: ItemStatus,
    pub image: Option<ImageBlob>,
    pub name: LocaleMap,
    pub desc: LocaleMap,
}

/// Raw item editor values as submitted by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    /// Hidden id field; blank for new items.
    pub id: String,
    pub category_id: String,
    pub price: String,
    pub status: String,
    /// Encoded image text; blank when no image is attached.
    pub image: String,
    pub name: LocaleMap,
    pub desc: LocaleMap,
}

impl ItemForm {
    /// Parses every text field into a typed [`ItemInput`].
    pub fn parse(&self) -> Result<ItemInput, CatalogError> {
        let id = match self.id.trim() {
            "" => None,
            raw => Some(parse_id("id", raw)?),
        };
        let status = match self.status.trim() {
            "" | "available" => ItemStatus::Available,
            "unavailable" => ItemStatus::Unavailable,
            other => {
                return Err(CatalogError::InvalidField {
                    field: "status",
                    value: other.to_string(),
                })
            }
        };
        let image = match self.image.trim() {
            "" => None,
            raw => Some(ImageBlob::from_data_url(raw)?),
        };

        Ok(ItemInput {
            id,
            category_id: parse_id("category", self.category_id.trim())?,
            price: self.price.parse()?,
            status,
            image,
            name: self.name.clone(),
            desc: self.desc.clone(),
        })
    }
}

fn parse_id(field: &'static str, raw: &str) -> Result<i64, CatalogError> {
    raw.parse::<i64>().map_err(|_| CatalogError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

fn require_name(name: &LocaleMap, record: &'static str) -> Result<(), CatalogError> {
    if name.en.trim().is_empty() {
        return Err(CatalogError::EmptyName { record });
    }
    Ok(())
}

/// Replaces the category with `input.id` or appends a new one.
pub fn upsert_category(
    state: &mut AppState,
    input: CategoryInput,
) -> Result<Upserted<CategoryId>, CatalogError> {
    require_name(&input.name, "category")?;

    if let Some(id) = input.id {
        if let Some(existing) = state.categories.iter_mut().find(|c| c.id == id) {
            existing.name = input.name;
            return Ok(Upserted::Updated(id));
        }
    }

    let id = state
        .allocate_id()
        .map_err(|_| CatalogError::IdsExhausted)?;
    state.categories.push(Category::new(id, input.name));
    Ok(Upserted::Created(id))
}

/// Removes the category with `id`; returns whether one was removed.
pub fn delete_category(state: &mut AppState, id: CategoryId) -> bool {
    let before = state.categories.len();
    state.categories.retain(|category| category.id != id);
    state.categories.len() != before
}

/// Replaces the item with `input.id` or appends a new one.
///
/// The category reference is stored as given, even when it resolves to
/// nothing.
pub fn upsert_item(state: &mut AppState, input: ItemInput) -> Result<Upserted<ItemId>, CatalogError> {
    require_name(&input.name, "item")?;

    let existing_index = input
        .id
        .and_then(|id| state.items.iter().position(|item| item.id == id));
    let id = match existing_index {
        Some(index) => state.items[index].id,
        None => state
            .allocate_id()
            .map_err(|_| CatalogError::IdsExhausted)?,
    };

    let item = Item {
        id,
        category_id: input.category_id,
        price: input.price,
        status: input.status,
        image: input.image,
        name: input.name,
        desc: input.desc,
    };

    match existing_index {
        Some(index) => {
            state.items[index] = item;
            Ok(Upserted::Updated(id))
        }
        None => {
            state.items.push(item);
            Ok(Upserted::Created(id))
        }
    }
}

/// Removes the item with `id`; returns whether one was removed.
pub fn delete_item(state: &mut AppState, id: ItemId) -> bool {
    let before = state.items.len();
    state.items.retain(|item| item.id != id);
    state.items.len() != before
}

pub fn find_category(state: &AppState, id: CategoryId) -> Option<&Category> {
    state.categories.iter().find(|category| category.id == id)
}

pub fn find_item(state: &AppState, id: ItemId) -> Option<&Item> {
    state.items.iter().find(|item| item.id == id)
}

/// Items matching `filter`, in collection order.
pub fn items_in(state: &AppState, filter: MenuFilter) -> Vec<&Item> {
    state
        .items
        .iter()
        .filter(|item| match filter {
            MenuFilter::All => true,
            MenuFilter::Category(category_id) => item.category_id == category_id,
        })
        .collect()
}

/// Items whose category no longer exists, in collection order.
pub fn orphaned_items(state: &AppState) -> Vec<&Item> {
    state
        .items
        .iter()
        .filter(|item| find_category(state, item.category_id).is_none())
        .collect()
}
