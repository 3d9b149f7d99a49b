//! Use-case layer.
//!
//! # Responsibility
//! - `catalog`: CRUD engine over an exclusively borrowed `AppState`.
//! - `session`: manager login/logout/passphrase transitions.
//! - `menu_service`: application context that guards, applies and persists.
//!
//! Engine and gate functions are storage-agnostic; only `MenuService`
//! touches the record store.

pub mod catalog;
pub mod menu_service;
pub mod session;
