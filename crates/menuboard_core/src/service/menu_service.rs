//! Menu application context.
//!
//! # Responsibility
//! - Own the loaded `AppState` and its `RecordStore`.
//! - Route every mutation through the CRUD engine or the session gate, then
//!   persist the full snapshot before returning.
//! - Guard dashboard operations behind the manager session.
//!
//! # Invariants
//! - State is never reachable as ambient global data; callers hold the
//!   service.
//! - A failed persist keeps the in-memory change and returns
//!   `ServiceError::Persist`; memory and storage diverge until the next
//!   successful save.
//! - Several services on one storage key overwrite each other
//!   (last write wins).

use crate::model::category::CategoryId;
use crate::model::item::ItemId;
use crate::model::locale::Locale;
use crate::model::state::{AppState, Session};
use crate::projection::{category_tabs, menu_cards, CategoryTab, MenuCard};
use crate::service::catalog::{
    self, CatalogError, CategoryInput, ItemInput, MenuFilter, Upserted,
};
use crate::service::session::{self, AuthError};
use crate::store::{KvBackend, LoadOrigin, RecordStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Application-level error.
#[derive(Debug)]
pub enum ServiceError {
    /// Operation requires a manager session.
    NotAuthorized,
    Catalog(CatalogError),
    Auth(AuthError),
    /// The change is applied in memory but could not be saved.
    Persist(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthorized => write!(f, "manager login required"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Persist(err) => write!(f, "change not saved: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotAuthorized => None,
            Self::Catalog(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<CatalogError> for ServiceError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<AuthError> for ServiceError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Persist(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Owner of the running menu state.
pub struct MenuService<B: KvBackend> {
    store: RecordStore<B>,
    state: AppState,
    origin: LoadOrigin,
}

impl<B: KvBackend> MenuService<B> {
    /// Loads (or seeds) state from `store`.
    pub fn open(mut store: RecordStore<B>) -> Self {
        let (state, origin) = store.load_with_origin();
        Self {
            store,
            state,
            origin,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    /// How the state was obtained at open time.
    pub fn load_origin(&self) -> LoadOrigin {
        self.origin
    }

    pub fn locale(&self) -> Locale {
        self.state.locale
    }

    pub fn session(&self) -> Session {
        self.state.session
    }

    /// Public menu cards in the current locale.
    pub fn menu(&self, filter: MenuFilter) -> Vec<MenuCard> {
        menu_cards(&self.state, self.state.locale, filter)
    }

    /// Category tabs in the current locale.
    pub fn tabs(&self) -> Vec<CategoryTab> {
        category_tabs(&self.state, self.state.locale)
    }

    /// Switches the display locale. Records are untouched.
    pub fn switch_locale(&mut self, locale: Locale) -> ServiceResult<()> {
        self.state.locale = locale;
        self.save("switch_locale")?;
        info!("event=switch_locale module=service status=ok locale={locale}");
        Ok(())
    }

    pub fn login(&mut self, passphrase: &str) -> ServiceResult<Session> {
        match session::login(&mut self.state, passphrase) {
            Ok(session) => {
                self.save("login")?;
                info!("event=login module=service status=ok");
                Ok(session)
            }
            Err(err) => {
                warn!("event=login module=service status=denied");
                Err(err.into())
            }
        }
    }

    pub fn logout(&mut self) -> ServiceResult<()> {
        session::logout(&mut self.state);
        self.save("logout")?;
        info!("event=logout module=service status=ok");
        Ok(())
    }

    /// Changes the passphrase; the manager is logged out on success.
    pub fn change_password(&mut self, old: &str, new: &str) -> ServiceResult<()> {
        self.require_manager("change_password")?;
        if let Err(err) = session::change_password(&mut self.state, old, new) {
            warn!("event=change_password module=service status=rejected reason={err}");
            return Err(err.into());
        }
        self.save("change_password")?;
        info!("event=change_password module=service status=ok");
        Ok(())
    }

    pub fn upsert_category(&mut self, input: CategoryInput) -> ServiceResult<Upserted<CategoryId>> {
        self.require_manager("category_upsert")?;
        let requested = input.id;
        let outcome = catalog::upsert_category(&mut self.state, input)?;
        self.log_upsert("category_upsert", requested, outcome);
        self.save("category_upsert")?;
        Ok(outcome)
    }

    /// Deletes a category; items keep their now-dangling reference.
    pub fn delete_category(&mut self, id: CategoryId) -> ServiceResult<bool> {
        self.require_manager("category_delete")?;
        if !catalog::delete_category(&mut self.state, id) {
            warn!("event=category_delete module=service status=noop id={id}");
            return Ok(false);
        }
        self.save("category_delete")?;
        info!("event=category_delete module=service status=ok id={id}");
        Ok(true)
    }

    pub fn upsert_item(&mut self, input: ItemInput) -> ServiceResult<Upserted<ItemId>> {
        self.require_manager("item_upsert")?;
        let requested = input.id;
        let image_bytes = input.image.as_ref().map_or(0, |image| image.encoded_len());
        let outcome = catalog::upsert_item(&mut self.state, input)?;
        self.log_upsert("item_upsert", requested, outcome);
        if image_bytes > 0 {
            info!(
                "event=item_upsert module=service status=image id={} image_bytes={image_bytes}",
                outcome.id()
            );
        }
        self.save("item_upsert")?;
        Ok(outcome)
    }

    pub fn delete_item(&mut self, id: ItemId) -> ServiceResult<bool> {
        self.require_manager("item_delete")?;
        if !catalog::delete_item(&mut self.state, id) {
            warn!("event=item_delete module=service status=noop id={id}");
            return Ok(false);
        }
        self.save("item_delete")?;
        info!("event=item_delete module=service status=ok id={id}");
        Ok(true)
    }

    /// Writes the current state again, e.g. after an earlier quota failure
    /// has been resolved by removing a large image.
    pub fn retry_save(&mut self) -> ServiceResult<()> {
        self.save("retry_save")
    }

    fn require_manager(&self, event: &str) -> ServiceResult<()> {
        if self.state.is_manager() {
            return Ok(());
        }
        warn!("event={event} module=service status=denied reason=not_authorized");
        Err(ServiceError::NotAuthorized)
    }

    fn save(&mut self, event: &str) -> ServiceResult<()> {
        self.store.persist(&self.state).map_err(|err| {
            warn!("event={event} module=service status=unsaved error={err}");
            ServiceError::Persist(err)
        })
    }

    fn log_upsert(&self, event: &str, requested: Option<i64>, outcome: Upserted<i64>) {
        match (requested, outcome) {
            (Some(stale), Upserted::Created(id)) => warn!(
                "event={event} module=service status=ok action=created stale_id={stale} id={id}"
            ),
            (_, Upserted::Created(id)) => {
                info!("event={event} module=service status=ok action=created id={id}")
            }
            (_, Upserted::Updated(id)) => {
                info!("event={event} module=service status=ok action=updated id={id}")
            }
        }
    }
}
