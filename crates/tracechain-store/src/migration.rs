//! Versioned schema for the SQLite world state.
//!
//! `MIGRATIONS[i]` takes the schema from version `i` to `i + 1`. Applied
//! versions are recorded in `schema_migrations`, and every pending step runs
//! in one SQLite transaction.

use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};

/// World state keyed by record key, plus a log of committed write-sets.
///
/// TEXT keys compare with BINARY collation, i.e. by UTF-8 bytes, which is
/// the order the in-memory store scans in.
const V1_WORLD_STATE: &str = r#"
    CREATE TABLE world_state (
        key TEXT PRIMARY KEY,
        value BLOB NOT NULL,
        tx_id TEXT NOT NULL,              -- transaction that last wrote the key
        updated_at INTEGER NOT NULL       -- transaction timestamp (Unix ms)
    );

    CREATE TABLE transactions (
        tx_id TEXT PRIMARY KEY,
        timestamp INTEGER NOT NULL,       -- platform timestamp (Unix ms)
        write_count INTEGER NOT NULL,
        committed_at INTEGER NOT NULL     -- local time of commit (Unix ms)
    );

    CREATE INDEX idx_world_state_tx ON world_state(tx_id);
"#;

const MIGRATIONS: &[&str] = &[V1_WORLD_STATE];

/// Schema version this build reads and writes.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring `conn` up to [`CURRENT_VERSION`]. Safe to call on every open.
///
/// Fails if the database was written by a newer schema.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let applied: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if applied > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {applied} is newer than supported version {CURRENT_VERSION}"
        )));
    }
    if applied == CURRENT_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (index, sql) in MIGRATIONS.iter().enumerate().skip(applied as usize) {
        let version = index as u32 + 1;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, chrono::Utc::now().timestamp_millis()],
        )?;
        tracing::debug!(version, "applied world-state schema migration");
    }
    tx.commit()?;

    Ok(())
}
