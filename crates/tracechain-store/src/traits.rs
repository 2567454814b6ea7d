//! Store traits: committed world state and the per-invocation stub.
//!
//! [`Store`] is implemented by backends. [`StateStub`] is the narrow
//! interface the contract consumes; it is implemented by
//! [`Transaction`](crate::Transaction).

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{Result, StoreError};

/// One entry returned by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// The buffered writes of one invocation, keyed and ordered by world-state key.
///
/// A later write to the same key replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSet {
    tx_id: String,
    timestamp: DateTime<Utc>,
    writes: BTreeMap<String, Vec<u8>>,
}

impl WriteSet {
    pub fn new(tx_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
            writes: BTreeMap::new(),
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.writes.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.writes.get(key).map(Vec::as_slice)
    }

    /// Pending writes with `start <= key < end`, in key order.
    pub fn range<'a>(
        &'a self,
        start: &str,
        end: &str,
    ) -> impl Iterator<Item = (&'a String, &'a Vec<u8>)> + 'a {
        let start = start.to_string();
        let end = end.to_string();
        self.writes
            .iter()
            .filter(move |(k, _)| k.as_str() >= start.as_str() && k.as_str() < end.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.writes.iter()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Ordered results of a range scan.
#[derive(Debug)]
pub struct StateIterator {
    inner: std::vec::IntoIter<KeyValue>,
}

impl StateIterator {
    pub fn new(entries: Vec<KeyValue>) -> Self {
        Self {
            inner: entries.into_iter(),
        }
    }
}

impl Iterator for StateIterator {
    type Item = KeyValue;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for StateIterator {}

/// Committed world state.
///
/// Keys compare by their UTF-8 bytes. Implementations must apply a
/// [`WriteSet`] atomically: after `commit` returns an error, none of its
/// writes may be visible.
pub trait Store: Send + Sync {
    /// Read the committed value at `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Committed entries with `start <= key < end`, in key order.
    fn scan(&self, start: &str, end: &str) -> Result<Vec<KeyValue>>;

    /// Apply every write in `write_set` as one unit.
    fn commit(&self, write_set: &WriteSet) -> Result<()>;

    /// Number of committed keys.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<KeyValue>> {
        (**self).scan(start, end)
    }

    fn commit(&self, write_set: &WriteSet) -> Result<()> {
        (**self).commit(write_set)
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }
}

/// The world-state view of a single invocation.
///
/// Every contract operation takes one of these explicitly; there is no
/// ambient context. Reads observe the invocation's own pending writes.
pub trait StateStub {
    /// Read the value at `key`, or `None` if absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Buffer a write of `value` at `key`.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Entries with `start <= key < end`, in key order.
    fn get_state_by_range(&self, start: &str, end: &str) -> Result<StateIterator>;

    /// Identifier of the current transaction, unique per invocation.
    fn tx_id(&self) -> &str;

    /// Platform-supplied timestamp of the current transaction.
    ///
    /// Identical on every replica executing the same transaction.
    fn tx_timestamp(&self) -> DateTime<Utc>;
}

/// Reject a scan whose lower bound sorts after its upper bound.
pub(crate) fn check_range(start: &str, end: &str) -> Result<()> {
    if start > end {
        return Err(StoreError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}
