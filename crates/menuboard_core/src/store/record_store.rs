//! Snapshot load/persist orchestration.

use super::{KvBackend, StoreOptions, StoreResult};
use crate::model::state::AppState;
use log::{error, info, warn};
use std::time::Instant;

/// Where a loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Decoded from the stored snapshot.
    Persisted,
    /// No snapshot existed; defaults were seeded and written.
    Seeded,
    /// The stored snapshot could not be read or decoded; defaults are in
    /// memory only. An undecodable blob is copied to
    /// [`StoreOptions::malformed_key`] before the next write replaces it.
    Recovered,
}

/// Record Store over one backend key.
pub struct RecordStore<B: KvBackend> {
    backend: B,
    options: StoreOptions,
    malformed: Option<Vec<u8>>,
}

impl<B: KvBackend> RecordStore<B> {
    pub fn new(backend: B, options: StoreOptions) -> Self {
        Self {
            backend,
            options,
            malformed: None,
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Loads the stored snapshot, seeding or recovering as needed.
    pub fn load(&mut self) -> AppState {
        self.load_with_origin().0
    }

    /// Same as [`RecordStore::load`], also reporting where the state came from.
    pub fn load_with_origin(&mut self) -> (AppState, LoadOrigin) {
        let started_at = Instant::now();
        self.malformed = None;
        let key = self.options.storage_key.as_str();

        let bytes = match self.backend.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                let state = AppState::seeded();
                match self.persist(&state) {
                    Ok(()) => info!(
                        "event=snapshot_load module=store status=seeded duration_ms={}",
                        started_at.elapsed().as_millis()
                    ),
                    Err(err) => error!(
                        "event=snapshot_load module=store status=error error_code=seed_persist_failed error={}",
                        err
                    ),
                }
                return (state, LoadOrigin::Seeded);
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=store status=recovered error_code=backend_read_failed error={}",
                    err
                );
                return (AppState::seeded(), LoadOrigin::Recovered);
            }
        };

        match decode_snapshot(&bytes) {
            Ok(state) => {
                info!(
                    "event=snapshot_load module=store status=ok bytes={} categories={} items={} duration_ms={}",
                    bytes.len(),
                    state.categories.len(),
                    state.items.len(),
                    started_at.elapsed().as_millis()
                );
                (state, LoadOrigin::Persisted)
            }
            Err(reason) => {
                warn!(
                    "event=snapshot_load module=store status=recovered error_code=malformed_snapshot bytes={} reason={}",
                    bytes.len(),
                    reason
                );
                self.malformed = Some(bytes);
                (AppState::seeded(), LoadOrigin::Recovered)
            }
        }
    }

    /// Whether an undecodable snapshot is still waiting to be set aside.
    pub fn has_pending_malformed(&self) -> bool {
        self.malformed.is_some()
    }

    /// Writes the whole state under the configured key.
    ///
    /// After a recovered load the undecodable blob is first copied to the
    /// malformed key; if that copy fails nothing is overwritten.
    pub fn persist(&mut self, state: &AppState) -> StoreResult<()> {
        let started_at = Instant::now();
        let bytes = serde_json::to_vec(state)?;
        self.set_aside_malformed()?;

        match self.backend.set(&self.options.storage_key, &bytes) {
            Ok(()) => {
                info!(
                    "event=snapshot_persist module=store status=ok bytes={} duration_ms={}",
                    bytes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                let code = if err.is_quota_exceeded() {
                    "quota_exceeded"
                } else {
                    "backend_write_failed"
                };
                error!(
                    "event=snapshot_persist module=store status=error bytes={} error_code={} error={}",
                    bytes.len(),
                    code,
                    err
                );
                Err(err)
            }
        }
    }

    fn set_aside_malformed(&mut self) -> StoreResult<()> {
        let blob = match self.malformed.take() {
            Some(blob) => blob,
            None => return Ok(()),
        };
        let key = self.options.malformed_key();
        match self.backend.set(&key, &blob) {
            Ok(()) => {
                info!(
                    "event=snapshot_set_aside module=store status=ok bytes={}",
                    blob.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=snapshot_set_aside module=store status=error bytes={} error={}",
                    blob.len(),
                    err
                );
                self.malformed = Some(blob);
                Err(err)
            }
        }
    }

    /// Replaces the stored snapshot with the first-run dataset.
    ///
    /// A pending undecodable blob is discarded, not set aside.
    pub fn reset(&mut self) -> StoreResult<AppState> {
        if self.malformed.take().is_some() {
            warn!("event=snapshot_reset module=store status=discarded_malformed");
        }
        let state = AppState::seeded();
        self.persist(&state)?;
        info!("event=snapshot_reset module=store status=ok");
        Ok(state)
    }
}

/// Decodes and checks a stored snapshot.
///
/// Failure reasons carry only the serde error category and position, never
/// snapshot content.
fn decode_snapshot(bytes: &[u8]) -> Result<AppState, String> {
    let mut state: AppState = serde_json::from_slice(bytes).map_err(|err| {
        format!(
            "{:?} at line {} column {}",
            err.classify(),
            err.line(),
            err.column()
        )
    })?;
    state.check_unique_ids().map_err(|err| err.to_string())?;
    state.normalize_sequence().map_err(|err| err.to_string())?;
    Ok(state)
}
