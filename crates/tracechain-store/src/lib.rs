//! # Tracechain Store
//!
//! World-state abstraction for Tracechain. The contract never talks to a
//! database directly: it reads and writes through a [`StateStub`], which is
//! scoped to a single invocation.
//!
//! ## Overview
//!
//! Two traits split the responsibilities:
//!
//! - [`Store`] - committed world state: point reads, ordered range scans and
//!   atomic application of a write-set
//! - [`StateStub`] - what one invocation sees: reads that observe its own
//!   pending writes, buffered writes, the transaction id and the platform
//!   timestamp
//!
//! [`Transaction`] implements [`StateStub`] on top of any [`Store`]. Nothing
//! reaches the store until [`Transaction::commit`]; dropping the transaction
//! discards every pending write.
//!
//! ## Key Types
//!
//! - [`MemoryStore`] - ordered in-memory world state for tests
//! - [`SqliteStore`] - SQLite-backed world state with schema migrations
//! - [`WriteSet`] - the buffered writes of one invocation
//! - [`KeyValue`] - one entry returned by a range scan
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use tracechain_store::{MemoryStore, StateStub, Store, Transaction};
//!
//! let store = MemoryStore::new();
//!
//! let mut tx = Transaction::begin(&store, "tx-1", Utc::now());
//! tx.put_state("USER_alice", b"{}".to_vec()).unwrap();
//! assert!(tx.get_state("USER_alice").unwrap().is_some());
//! tx.commit().unwrap();
//!
//! assert!(store.get("USER_alice").unwrap().is_some());
//! ```
//!
//! ## Design Notes
//!
//! - **Read-your-writes**: a transaction's reads and scans overlay its pending
//!   writes on committed state.
//! - **Atomic commit**: a write-set is applied completely or not at all.
//! - **Byte order**: scans are ordered by the raw UTF-8 bytes of the key, in
//!   every backend.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;
pub mod transaction;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KeyValue, StateIterator, StateStub, Store, WriteSet};
pub use transaction::Transaction;
