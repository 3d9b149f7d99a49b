//! In-process key-value backend.

use super::{check_quota, KvBackend, StoreResult, DEFAULT_QUOTA_BYTES};
use std::collections::HashMap;

/// Heap-backed backend with the same quota rule as the SQLite one.
///
/// Useful for tests and for hosts that keep snapshots elsewhere.
#[derive(Debug, Clone)]
pub struct MemoryKvBackend {
    entries: HashMap<String, Vec<u8>>,
    quota_bytes: usize,
}

impl Default for MemoryKvBackend {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTA_BYTES)
    }
}

impl MemoryKvBackend {
    pub fn new(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes,
        }
    }

    pub fn quota_bytes(&self) -> usize {
        self.quota_bytes
    }

    /// Bytes currently stored across all keys.
    pub fn used_bytes(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

impl KvBackend for MemoryKvBackend {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> StoreResult<()> {
        let other_bytes: usize = self
            .entries
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(_, stored)| stored.len())
            .sum();
        check_quota(other_bytes, value.len(), self.quota_bytes)?;

        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
