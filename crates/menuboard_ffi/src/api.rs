//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose menu viewing and manager dashboard actions to Dart via FRB.
//! - Translate core errors into short, UI-ready messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One `MenuService` per process holds the live state; it is opened on the
//!   first call and reused, so an edit whose save failed stays visible until
//!   a later save succeeds.
//! - Login failures never reveal which check failed.

use menuboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CategoryInput, ImageBlob, ItemForm, Locale, LocaleMap, MenuFilter, MenuService, RecordStore,
    ServiceError, SqliteKvBackend, StoreError, StoreOptions,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const MENU_DB_FILE_NAME: &str = "menuboard.sqlite3";
static MENU_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static MENU_SERVICE: OnceLock<Mutex<Option<MenuService<SqliteKvBackend>>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
/// Safe to call repeatedly with the same `level + log_dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Category tab shown above the public menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTab {
    pub category_id: i64,
    pub label: String,
}

/// One public menu card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCardView {
    pub item_id: i64,
    pub category_id: i64,
    pub name: String,
    pub desc: String,
    /// Formatted price, e.g. `6,000 IQD`.
    pub price: String,
    pub available: bool,
    /// Data URL of the item image, if any.
    pub image: Option<String>,
}

/// Everything the menu screen needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSnapshot {
    /// Active locale code (`en|ar|ku`).
    pub locale: String,
    /// Whether the layout should be right-to-left.
    pub rtl: bool,
    /// Whether the manager dashboard is unlocked.
    pub manager: bool,
    pub tabs: Vec<MenuTab>,
    pub cards: Vec<MenuCardView>,
    /// Empty on success; diagnostic text otherwise.
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Affected record id, when the action targets one.
    pub record_id: Option<i64>,
    /// Human-readable message for UI display.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: Option<i64>) -> Self {
        Self {
            ok: true,
            record_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// Text fields of the item editor, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemEditorInput {
    /// Blank for a new item.
    pub id: String,
    pub category_id: String,
    pub price: String,
    pub status: String,
    /// Data URL from `encode_image`, or blank.
    pub image: String,
    pub name_en: String,
    pub name_ar: String,
    pub name_ku: String,
    pub desc_en: String,
    pub desc_ar: String,
    pub desc_ku: String,
}

/// Result of encoding a picked image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub ok: bool,
    pub data_url: String,
    pub message: String,
}

/// Loads the public menu projected into the active locale.
///
/// `category_id = None` shows every item.
#[flutter_rust_bridge::frb(sync)]
pub fn menu_snapshot(category_id: Option<i64>) -> MenuSnapshot {
    let filter = category_id.map_or(MenuFilter::All, MenuFilter::Category);
    match with_service(|service| snapshot_view(service, filter)) {
        Ok(snapshot) => snapshot,
        Err(message) => MenuSnapshot {
            locale: Locale::default().code().to_string(),
            rtl: false,
            manager: false,
            tabs: Vec::new(),
            cards: Vec::new(),
            message,
        },
    }
}

fn snapshot_view(service: &MenuService<SqliteKvBackend>, filter: MenuFilter) -> MenuSnapshot {
    let locale = service.locale();
    MenuSnapshot {
        locale: locale.code().to_string(),
        rtl: locale.is_rtl(),
        manager: service.state().is_manager(),
        tabs: service
            .tabs()
            .into_iter()
            .map(|tab| MenuTab {
                category_id: tab.id,
                label: tab.label,
            })
            .collect(),
        cards: service
            .menu(filter)
            .into_iter()
            .map(|card| MenuCardView {
                item_id: card.id,
                category_id: card.category_id,
                name: card.name,
                desc: card.desc,
                price: card.price,
                available: card.available,
                image: card.image,
            })
            .collect(),
        message: String::new(),
    }
}

/// Switches the display language (`en|ar|ku`).
#[flutter_rust_bridge::frb(sync)]
pub fn switch_locale(code: String) -> ActionResponse {
    let locale = match code.parse::<Locale>() {
        Ok(locale) => locale,
        Err(err) => return ActionResponse::failure(err.to_string()),
    };
    run_action(|service| service.switch_locale(locale).map(|()| None), "Language changed.")
}

/// Unlocks the manager dashboard.
#[flutter_rust_bridge::frb(sync)]
pub fn manager_login(passphrase: String) -> ActionResponse {
    run_action(
        |service| service.login(&passphrase).map(|_| None),
        "Logged in.",
    )
}

/// Locks the manager dashboard.
#[flutter_rust_bridge::frb(sync)]
pub fn manager_logout() -> ActionResponse {
    run_action(|service| service.logout().map(|()| None), "Logged out.")
}

/// Changes the manager passphrase; the caller must log in again.
#[flutter_rust_bridge::frb(sync)]
pub fn manager_change_password(old_password: String, new_password: String) -> ActionResponse {
    run_action(
        |service| {
            service
                .change_password(&old_password, &new_password)
                .map(|()| None)
        },
        "Password changed. Please log in again.",
    )
}

/// Creates (`id = None`) or replaces a category.
#[flutter_rust_bridge::frb(sync)]
pub fn save_category(
    id: Option<i64>,
    name_en: String,
    name_ar: String,
    name_ku: String,
) -> ActionResponse {
    let input = CategoryInput {
        id,
        name: LocaleMap::new(name_en, name_ar, name_ku),
    };
    run_action(
        |service| service.upsert_category(input).map(|outcome| Some(outcome.id())),
        "Category saved.",
    )
}

/// Deletes a category. Its items stay and only show under "All".
#[flutter_rust_bridge::frb(sync)]
pub fn remove_category(id: i64) -> ActionResponse {
    run_action(
        |service| service.delete_category(id).map(|_| Some(id)),
        "Category deleted.",
    )
}

/// Creates or replaces an item from raw editor text.
#[flutter_rust_bridge::frb(sync)]
pub fn save_item(input: ItemEditorInput) -> ActionResponse {
    let form = ItemForm {
        id: input.id,
        category_id: input.category_id,
        price: input.price,
        status: input.status,
        image: input.image,
        name: LocaleMap::new(input.name_en, input.name_ar, input.name_ku),
        desc: LocaleMap::new(input.desc_en, input.desc_ar, input.desc_ku),
    };
    let parsed = match form.parse() {
        Ok(parsed) => parsed,
        Err(err) => return ActionResponse::failure(err.to_string()),
    };
    run_action(
        |service| service.upsert_item(parsed).map(|outcome| Some(outcome.id())),
        "Item saved.",
    )
}

/// Deletes an item.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_item(id: i64) -> ActionResponse {
    run_action(
        |service| service.delete_item(id).map(|_| Some(id)),
        "Item deleted.",
    )
}

/// Saves the current state again after an earlier save failed.
#[flutter_rust_bridge::frb(sync)]
pub fn retry_save() -> ActionResponse {
    run_action(|service| service.retry_save().map(|()| None), "Changes saved.")
}

/// Encodes picked file bytes into the data URL form stored on items.
#[flutter_rust_bridge::frb(sync)]
pub fn encode_image(media_type: String, bytes: Vec<u8>) -> EncodedImage {
    match ImageBlob::encode(&media_type, &bytes) {
        Ok(blob) => EncodedImage {
            ok: true,
            data_url: blob.as_str().to_string(),
            message: String::new(),
        },
        Err(err) => EncodedImage {
            ok: false,
            data_url: String::new(),
            message: err.to_string(),
        },
    }
}

fn resolve_menu_db_path() -> PathBuf {
    MENU_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("MENUBOARD_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(MENU_DB_FILE_NAME)
        })
        .clone()
}

fn open_service() -> Result<MenuService<SqliteKvBackend>, String> {
    let options = StoreOptions::default();
    let backend = SqliteKvBackend::open(resolve_menu_db_path(), options.quota_bytes)
        .map_err(|err| format!("menu DB open failed: {err}"))?;
    Ok(MenuService::open(RecordStore::new(backend, options)))
}

/// Runs `f` against the process-wide service, opening it on first use.
fn with_service<T>(
    f: impl FnOnce(&mut MenuService<SqliteKvBackend>) -> T,
) -> Result<T, String> {
    let mut slot = MENU_SERVICE
        .get_or_init(|| Mutex::new(None))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if slot.is_none() {
        *slot = Some(open_service()?);
    }
    let service = slot
        .as_mut()
        .ok_or_else(|| "menu service unavailable".to_string())?;
    Ok(f(service))
}

fn run_action(
    f: impl FnOnce(&mut MenuService<SqliteKvBackend>) -> Result<Option<i64>, ServiceError>,
    success_message: &str,
) -> ActionResponse {
    match with_service(f) {
        Ok(Ok(record_id)) => ActionResponse::success(success_message, record_id),
        Ok(Err(err)) => {
            log::warn!("event=ffi_action module=ffi status=error error={err}");
            ActionResponse::failure(user_message(&err))
        }
        Err(message) => ActionResponse::failure(message),
    }
}

fn user_message(err: &ServiceError) -> String {
    match err {
        ServiceError::NotAuthorized => "Please log in as manager first.".to_string(),
        ServiceError::Auth(menuboard_core::AuthError::InvalidCredentials) => {
            "Wrong password!".to_string()
        }
        ServiceError::Persist(StoreError::QuotaExceeded { .. }) => {
            "Storage full! Image might be too large.".to_string()
        }
        other => other.to_string(),
    }
}
