//! SQLite-backed key-value backend.
//!
//! # Invariants
//! - Quota check and upsert run in one transaction.
//! - `byte_len` mirrors `length(value)` for every row.

use super::{check_quota, KvBackend, StoreResult, DEFAULT_QUOTA_BYTES};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Snapshot backend over the `kv_entries` table.
pub struct SqliteKvBackend {
    conn: Connection,
    quota_bytes: usize,
}

impl SqliteKvBackend {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection, quota_bytes: usize) -> Self {
        Self { conn, quota_bytes }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>, quota_bytes: usize) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?, quota_bytes))
    }

    /// Opens a migrated in-memory database with the default quota.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?, DEFAULT_QUOTA_BYTES))
    }

    pub fn quota_bytes(&self) -> usize {
        self.quota_bytes
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KvBackend for SqliteKvBackend {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> StoreResult<()> {
        let tx = self.conn.transaction()?;

        let other_bytes: i64 = tx.query_row(
            "SELECT COALESCE(SUM(byte_len), 0) FROM kv_entries WHERE key != ?1;",
            [key],
            |row| row.get(0),
        )?;
        check_quota(
            usize::try_from(other_bytes).unwrap_or(usize::MAX),
            value.len(),
            self.quota_bytes,
        )?;

        tx.execute(
            "INSERT INTO kv_entries (key, value, byte_len)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                byte_len = excluded.byte_len,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value, value.len() as i64],
        )?;
        tx.commit()?;
        Ok(())
    }
}
