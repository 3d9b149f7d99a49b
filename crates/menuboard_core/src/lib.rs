//! Core domain logic for Menuboard, a local-first restaurant menu.
//! This crate is the single source of truth for menu records, the manager
//! session gate and snapshot persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod projection;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId};
pub use model::image::{ImageBlob, ImageError};
pub use model::item::{Item, ItemId, ItemStatus};
pub use model::locale::{Locale, LocaleMap, UnknownLocale};
pub use model::price::{Price, PriceError, CURRENCY_CODE};
pub use model::seed::DEFAULT_PASSWORD;
pub use model::state::{AppState, Session, Settings, StateError};
pub use projection::{category_tabs, menu_cards, resolve_text, CategoryTab, MenuCard};
pub use service::catalog::{
    CatalogError, CategoryInput, ItemForm, ItemInput, MenuFilter, Upserted,
};
pub use service::menu_service::{MenuService, ServiceError, ServiceResult};
pub use service::session::{AuthError, MIN_PASSWORD_LEN};
pub use store::{
    KvBackend, LoadOrigin, MemoryKvBackend, RecordStore, SqliteKvBackend, StoreError,
    StoreOptions, StoreResult, DEFAULT_QUOTA_BYTES, DEFAULT_STORAGE_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
