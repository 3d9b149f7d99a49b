//! Menu domain model.
//!
//! # Responsibility
//! - Define the persisted shape of categories, items, settings and session.
//! - Keep locale-tagged text in a fixed-field map.
//!
//! # Invariants
//! - Every record is identified by an integer id from `AppState`'s sequence.
//! - Item-to-category references are not enforced.

pub mod category;
pub mod image;
pub mod item;
pub mod locale;
pub mod price;
pub mod seed;
pub mod state;
