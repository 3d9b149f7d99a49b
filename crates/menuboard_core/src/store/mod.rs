//! Record Store: snapshot load/persist over a key-value blob backend.
//!
//! # Responsibility
//! - Define the `KvBackend` contract (fallible, size-bounded, synchronous).
//! - Serialize the whole `AppState` as one JSON blob under one key.
//! - Seed the first-run dataset and recover from malformed snapshots.
//!
//! # Invariants
//! - A snapshot is written with a single backend `set`; readers never see a
//!   partially written state.
//! - `load` never fails and never panics; unreadable data degrades to the
//!   seeded defaults and is left in place for inspection.
//! - Quota failures are returned to the caller, never swallowed.

mod memory_kv;
mod record_store;
mod sqlite_kv;

pub use memory_kv::MemoryKvBackend;
pub use record_store::{LoadOrigin, RecordStore};
pub use sqlite_kv::SqliteKvBackend;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key the snapshot lives under by default.
pub const DEFAULT_STORAGE_KEY: &str = "restaurantApp";
/// Default backend budget, the common browser local-storage allowance.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

pub type StoreResult<T> = Result<T, StoreError>;

/// Snapshot persistence errors.
#[derive(Debug)]
pub enum StoreError {
    /// The backend refused the write because it would exceed its budget.
    QuotaExceeded { attempted: usize, limit: usize },
    Db(DbError),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded { attempted, limit } => write!(
                f,
                "storage quota exceeded: {attempted} bytes requested, limit is {limit} bytes"
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "snapshot serialization failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuotaExceeded { .. } => None,
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl StoreError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Key the snapshot is stored under.
    pub storage_key: String,
    /// Total byte budget of the backend across all keys.
    pub quota_bytes: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl StoreOptions {
    /// Side key that receives an undecodable snapshot before it is replaced.
    pub fn malformed_key(&self) -> String {
        format!("{}.malformed", self.storage_key)
    }
}

/// Key-value blob storage used for snapshots.
///
/// Implementations enforce their own byte budget on `set` and report
/// overruns as `StoreError::QuotaExceeded`. A failed `set` must leave the
/// previous value intact.
pub trait KvBackend {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;
    fn set(&mut self, key: &str, value: &[u8]) -> StoreResult<()>;
}

/// Shared quota rule: the new value plus every other stored value must fit.
pub(crate) fn check_quota(other_bytes: usize, value_len: usize, limit: usize) -> StoreResult<()> {
    let attempted = other_bytes.saturating_add(value_len);
    if attempted > limit {
        return Err(StoreError::QuotaExceeded { attempted, limit });
    }
    Ok(())
}
