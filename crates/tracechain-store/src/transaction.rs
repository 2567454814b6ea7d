//! Per-invocation transaction over a [`Store`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::traits::{check_range, KeyValue, StateIterator, StateStub, Store, WriteSet};

/// One invocation's view of world state.
///
/// Writes are buffered in a [`WriteSet`] and only reach the store on
/// [`commit`](Transaction::commit). Dropping the transaction, or calling
/// [`rollback`](Transaction::rollback), discards them.
pub struct Transaction<'s, S: Store + ?Sized> {
    store: &'s S,
    write_set: WriteSet,
}

impl<'s, S: Store + ?Sized> Transaction<'s, S> {
    /// Start a transaction with a platform-assigned id and timestamp.
    pub fn begin(store: &'s S, tx_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            store,
            write_set: WriteSet::new(tx_id, timestamp),
        }
    }

    /// The writes buffered so far.
    pub fn pending(&self) -> &WriteSet {
        &self.write_set
    }

    /// Apply the buffered writes atomically. Returns the number of keys written.
    pub fn commit(self) -> Result<usize> {
        let written = self.write_set.len();
        if written > 0 {
            self.store.commit(&self.write_set)?;
        }
        tracing::trace!(tx_id = %self.write_set.tx_id(), written, "transaction committed");
        Ok(written)
    }

    /// Discard the buffered writes. Returns the number of keys dropped.
    pub fn rollback(self) -> usize {
        let discarded = self.write_set.len();
        tracing::trace!(tx_id = %self.write_set.tx_id(), discarded, "transaction rolled back");
        discarded
    }
}

impl<S: Store + ?Sized> StateStub for Transaction<'_, S> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(pending) = self.write_set.get(key) {
            return Ok(Some(pending.to_vec()));
        }
        self.store.get(key)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.write_set.put(key, value);
        Ok(())
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> Result<StateIterator> {
        check_range(start, end)?;

        let committed = self.store.scan(start, end)?;
        if self.write_set.is_empty() {
            return Ok(StateIterator::new(committed));
        }

        let mut merged: BTreeMap<String, Vec<u8>> = committed
            .into_iter()
            .map(|kv| (kv.key, kv.value))
            .collect();
        for (key, value) in self.write_set.range(start, end) {
            merged.insert(key.clone(), value.clone());
        }

        Ok(StateIterator::new(
            merged
                .into_iter()
                .map(|(key, value)| KeyValue { key, value })
                .collect(),
        ))
    }

    fn tx_id(&self) -> &str {
        self.write_set.tx_id()
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.write_set.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store, "seed", ts());
        tx.put_state("PRODUCT_a", b"a".to_vec()).unwrap();
        tx.put_state("PRODUCT_c", b"c".to_vec()).unwrap();
        tx.put_state("USER_x", b"x".to_vec()).unwrap();
        tx.commit().unwrap();
        store
    }

    #[test]
    fn test_reads_observe_pending_writes() {
        let store = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());

        assert_eq!(tx.get_state("PRODUCT_b").unwrap(), None);
        tx.put_state("PRODUCT_b", b"b".to_vec()).unwrap();
        assert_eq!(tx.get_state("PRODUCT_b").unwrap(), Some(b"b".to_vec()));

        tx.put_state("PRODUCT_a", b"a2".to_vec()).unwrap();
        assert_eq!(tx.get_state("PRODUCT_a").unwrap(), Some(b"a2".to_vec()));

        // Nothing visible outside the transaction yet.
        assert_eq!(store.get("PRODUCT_b").unwrap(), None);
        assert_eq!(store.get("PRODUCT_a").unwrap(), Some(b"a".to_vec()));
    }

    #[test]
    fn test_range_merges_pending_in_key_order() {
        let store = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());
        tx.put_state("PRODUCT_b", b"b".to_vec()).unwrap();
        tx.put_state("PRODUCT_c", b"c2".to_vec()).unwrap();
        tx.put_state("ORDER_z", b"z".to_vec()).unwrap();

        let entries: Vec<KeyValue> =
            tx.get_state_by_range("PRODUCT_", "PRODUCT_~").unwrap().collect();
        assert_eq!(
            entries,
            vec![
                KeyValue::new("PRODUCT_a", b"a".to_vec()),
                KeyValue::new("PRODUCT_b", b"b".to_vec()),
                KeyValue::new("PRODUCT_c", b"c2".to_vec()),
            ]
        );
    }

    #[test]
    fn test_commit_applies_all_writes() {
        let store = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());
        tx.put_state("ORDER_1", b"1".to_vec()).unwrap();
        tx.put_state("ORDER_2", b"2".to_vec()).unwrap();

        assert_eq!(tx.commit().unwrap(), 2);
        assert_eq!(store.len().unwrap(), 5);
    }

    #[test]
    fn test_rollback_discards() {
        let store = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());
        tx.put_state("ORDER_1", b"1".to_vec()).unwrap();

        assert_eq!(tx.rollback(), 1);
        assert_eq!(store.get("ORDER_1").unwrap(), None);
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn test_drop_discards() {
        let store = seeded();
        {
            let mut tx = Transaction::begin(&store, "tx-1", ts());
            tx.put_state("ORDER_1", b"1".to_vec()).unwrap();
        }
        assert!(!store.contains("ORDER_1").unwrap());
    }

    #[test]
    fn test_context_metadata() {
        let store = MemoryStore::new();
        let tx = Transaction::begin(&store, "abc123", ts());
        assert_eq!(tx.tx_id(), "abc123");
        assert_eq!(tx.tx_timestamp(), ts());
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let store = MemoryStore::new();
        let tx = Transaction::begin(&store, "tx", ts());
        assert!(tx.get_state_by_range("Z", "A").is_err());
    }
}
