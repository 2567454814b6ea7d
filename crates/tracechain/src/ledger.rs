//! The Ledger: a local host that runs the contract against a store.
//!
//! Plays the role a ledger platform plays in production. Each submission
//! gets a fresh transaction id and timestamp, runs inside its own
//! [`Transaction`], and is committed atomically on success or discarded on
//! failure. Evaluations run the same way but are never committed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracechain_store::{Store, StoreError, Transaction};
use tracing::{info, warn};

use crate::config::LedgerConfig;
use crate::contract::SupplyChainContract;
use crate::dispatch::Function;
use crate::error::Result;

/// A local ledger host.
///
/// Submissions are serialized so that each one validates against the state
/// left by the previous commit.
pub struct Ledger<S: Store> {
    /// The world-state backend.
    store: Arc<S>,
    /// The contract being hosted.
    contract: SupplyChainContract,
    /// Configuration.
    config: LedgerConfig,
    /// Monotonic counter mixed into transaction ids.
    sequence: AtomicU64,
    /// Held for the duration of a submission.
    serial: Mutex<()>,
}

impl<S: Store> Ledger<S> {
    /// Create a new ledger over `store`.
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self {
            store: Arc::new(store),
            contract: SupplyChainContract::new(config.contract.clone()),
            config,
            sequence: AtomicU64::new(0),
            serial: Mutex::new(()),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn contract(&self) -> &SupplyChainContract {
        &self.contract
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Named Invocation
    // ─────────────────────────────────────────────────────────────────────────

    /// Submit a state-changing invocation at the current time.
    pub fn submit<A: AsRef<str>>(&self, function: &str, args: &[A]) -> Result<Vec<u8>> {
        self.submit_at(Utc::now(), function, args)
    }

    /// Submit a state-changing invocation with a caller-chosen timestamp.
    ///
    /// Read-only functions are evaluated instead: they skip the serial lock
    /// and never reach the store's commit path.
    pub fn submit_at<A: AsRef<str>>(
        &self,
        timestamp: DateTime<Utc>,
        function: &str,
        args: &[A],
    ) -> Result<Vec<u8>> {
        let resolved: Function = function.parse().map_err(|e| {
            warn!(function, error = %e, "rejected submission");
            e
        })?;
        if resolved.is_query() {
            return self.evaluate_resolved(timestamp, resolved, args);
        }
        self.execute_named(timestamp, resolved.name(), |contract, ctx| {
            contract.dispatch(ctx, resolved, args)
        })
    }

    /// Evaluate an invocation at the current time without committing it.
    pub fn evaluate<A: AsRef<str>>(&self, function: &str, args: &[A]) -> Result<Vec<u8>> {
        self.evaluate_at(Utc::now(), function, args)
    }

    /// Evaluate an invocation with a caller-chosen timestamp without
    /// committing it.
    pub fn evaluate_at<A: AsRef<str>>(
        &self,
        timestamp: DateTime<Utc>,
        function: &str,
        args: &[A],
    ) -> Result<Vec<u8>> {
        let resolved: Function = function.parse().map_err(|e| {
            warn!(function, error = %e, "rejected evaluation");
            e
        })?;
        self.evaluate_resolved(timestamp, resolved, args)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed Invocation
    // ─────────────────────────────────────────────────────────────────────────

    /// Run `op` inside a transaction stamped `timestamp` and commit its
    /// writes if it succeeds.
    pub fn execute<T, F>(&self, timestamp: DateTime<Utc>, op: F) -> Result<T>
    where
        F: FnOnce(&SupplyChainContract, &mut Transaction<'_, S>) -> Result<T>,
    {
        self.execute_named(timestamp, "execute", op)
    }

    /// Run a read-only `op` at the current time. Any writes are discarded.
    pub fn query<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&SupplyChainContract, &Transaction<'_, S>) -> Result<T>,
    {
        let timestamp = Utc::now();
        let tx_id = self.next_tx_id(timestamp, "query");
        let tx = Transaction::begin(&*self.store, tx_id, timestamp);
        let result = op(&self.contract, &tx);
        tx.rollback();
        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────────

    fn execute_named<T, F>(&self, timestamp: DateTime<Utc>, label: &str, op: F) -> Result<T>
    where
        F: FnOnce(&SupplyChainContract, &mut Transaction<'_, S>) -> Result<T>,
    {
        let _guard = self
            .serial
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;

        let tx_id = self.next_tx_id(timestamp, label);
        let mut tx = Transaction::begin(&*self.store, tx_id.as_str(), timestamp);

        match op(&self.contract, &mut tx) {
            Ok(value) => {
                let written = tx.commit().map_err(|e| {
                    warn!(tx_id = %tx_id, function = label, error = %e, "commit failed");
                    e
                })?;
                info!(tx_id = %tx_id, function = label, written, "committed transaction");
                Ok(value)
            }
            Err(e) => {
                let discarded = tx.rollback();
                warn!(
                    tx_id = %tx_id,
                    function = label,
                    discarded,
                    error = %e,
                    "transaction failed"
                );
                Err(e)
            }
        }
    }

    fn evaluate_resolved<A: AsRef<str>>(
        &self,
        timestamp: DateTime<Utc>,
        function: Function,
        args: &[A],
    ) -> Result<Vec<u8>> {
        let tx_id = self.next_tx_id(timestamp, function.name());
        let mut tx = Transaction::begin(&*self.store, tx_id.as_str(), timestamp);

        let result = self.contract.dispatch(&mut tx, function, args);
        let discarded = tx.rollback();
        if let Err(e) = &result {
            warn!(tx_id = %tx_id, %function, discarded, error = %e, "evaluation failed");
        }
        result
    }

    /// Derive a transaction id unique to this host instance.
    fn next_tx_id(&self, timestamp: DateTime<Utc>, function: &str) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);

        let mut hasher = blake3::Hasher::new();
        hasher.update(self.config.tx_id_domain.as_bytes());
        hasher.update(&seq.to_be_bytes());
        hasher.update(&timestamp.timestamp().to_be_bytes());
        hasher.update(&timestamp.timestamp_subsec_nanos().to_be_bytes());
        hasher.update(function.as_bytes());
        hex::encode(hasher.finalize().as_bytes())
    }
}
