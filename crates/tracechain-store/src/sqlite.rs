//! SQLite implementation of the Store trait.
//!
//! The durable reference backend for Tracechain world state. It uses rusqlite
//! with bundled SQLite behind a mutex; each write-set is applied inside one
//! SQLite transaction.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{check_range, KeyValue, Store, WriteSet};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file, and any missing parent directories, then brings
    /// the schema up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// The transaction that last wrote `key`, if any.
    pub fn last_writer(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT tx_id FROM world_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(StoreError::from)
    }

    /// Number of committed write-sets.
    pub fn transaction_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative count {count}")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Poisoned(format!("mutex poisoned: {}", e)))
    }
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM world_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(StoreError::from)
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<KeyValue>> {
        check_range(start, end)?;
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM world_state
             WHERE key >= ?1 AND key < ?2
             ORDER BY key",
        )?;

        let entries = stmt
            .query_map(params![start, end], |row| {
                Ok(KeyValue {
                    key: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    fn commit(&self, write_set: &WriteSet) -> Result<()> {
        let mut conn = self.lock()?;
        let timestamp = write_set.timestamp().timestamp_millis();
        let write_count = i64::try_from(write_set.len())
            .map_err(|_| StoreError::InvalidData("write-set too large".into()))?;

        let tx = conn.transaction()?;
        {
            let mut upsert = tx.prepare(
                "INSERT INTO world_state (key, value, tx_id, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    tx_id = excluded.tx_id,
                    updated_at = excluded.updated_at",
            )?;
            for (key, value) in write_set.iter() {
                upsert.execute(params![key, value, write_set.tx_id(), timestamp])?;
            }
        }

        // A replayed tx_id violates the primary key and rolls the whole set back.
        tx.execute(
            "INSERT INTO transactions (tx_id, timestamp, write_count, committed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                write_set.tx_id(),
                timestamp,
                write_count,
                chrono::Utc::now().timestamp_millis()
            ],
        )?;
        tx.commit()?;

        tracing::debug!(tx_id = %write_set.tx_id(), write_count, "write-set applied");
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM world_state", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative count {count}")))
    }
}
