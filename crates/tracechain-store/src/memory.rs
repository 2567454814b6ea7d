//! World state held in an ordered map.
//!
//! Backs unit tests and throwaway ledgers. Range scans and commit
//! atomicity match [`SqliteStore`](crate::SqliteStore); nothing outlives
//! the process.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, StoreError};
use crate::traits::{check_range, KeyValue, Store, WriteSet};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
/// Keys are held in a `BTreeMap`, whose `String` ordering is byte order.
pub struct MemoryStore {
    state: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.state
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.state
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<KeyValue>> {
        check_range(start, end)?;
        let state = self.read()?;
        Ok(state
            .range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
            .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
            .collect())
    }

    fn commit(&self, write_set: &WriteSet) -> Result<()> {
        // Single write guard for the whole set, so readers never see half of it.
        let mut state = self.write()?;
        for (key, value) in write_set.iter() {
            state.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
