//! Error types for world-state backends.

use thiserror::Error;

/// Errors raised by a [`Store`](crate::Store) or a [`Transaction`](crate::Transaction).
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite rejected a statement.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// Range scan with a lower bound above its upper bound.
    #[error("invalid range: start {start:?} is after end {end:?}")]
    InvalidRange { start: String, end: String },

    /// A stored row could not be interpreted.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The on-disk schema cannot be brought to the current version.
    #[error("migration error: {0}")]
    Migration(String),

    /// Creating the database's parent directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
