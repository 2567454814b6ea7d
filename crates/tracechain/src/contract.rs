//! The supply-chain contract and its world-state helpers.
//!
//! Operations are split by component: the user registry in
//! [`registry`](crate::registry), custody in [`products`](crate::products),
//! purchase orders in [`orders`](crate::orders) and namespace scans in
//! [`query`](crate::query). Each one takes the invocation's [`StateStub`]
//! explicitly, reads and validates first, and writes at most one record as
//! its final step.

use chrono::{DateTime, Utc};
use tracechain_core::{decode, encode, Record};
use tracechain_store::StateStub;

use crate::config::{ContractConfig, TimestampSource};
use crate::error::{ContractError, Result};

/// The supply-chain contract.
///
/// Holds no world state of its own; every piece of data lives in the store
/// and is re-read on each invocation.
#[derive(Debug, Clone, Default)]
pub struct SupplyChainContract {
    config: ContractConfig,
}

impl SupplyChainContract {
    pub fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Timestamp for records written by this invocation.
    pub(crate) fn now<C: StateStub + ?Sized>(&self, ctx: &C) -> DateTime<Utc> {
        match self.config.timestamp_source {
            TimestampSource::Transaction => ctx.tx_timestamp(),
            TimestampSource::LocalClock => Utc::now(),
        }
    }
}

/// Read and decode the record `id`, if present.
pub(crate) fn read_record<R, C>(ctx: &C, id: &str) -> Result<Option<R>>
where
    R: Record,
    C: StateStub + ?Sized,
{
    match ctx.get_state(&R::namespace().key(id))? {
        Some(bytes) => Ok(Some(decode(&bytes)?)),
        None => Ok(None),
    }
}

/// Read the record `id`, failing with `NotFound` if absent.
pub(crate) fn load_record<R, C>(ctx: &C, id: &str) -> Result<R>
where
    R: Record,
    C: StateStub + ?Sized,
{
    read_record(ctx, id)?.ok_or_else(|| ContractError::not_found(R::KIND, id))
}

/// Whether a record `id` is present. Does not decode it.
pub(crate) fn record_exists<R, C>(ctx: &C, id: &str) -> Result<bool>
where
    R: Record,
    C: StateStub + ?Sized,
{
    Ok(ctx.get_state(&R::namespace().key(id))?.is_some())
}

/// Fail with `AlreadyExists` if a record `id` is present.
pub(crate) fn ensure_absent<R, C>(ctx: &C, id: &str) -> Result<()>
where
    R: Record,
    C: StateStub + ?Sized,
{
    if record_exists::<R, C>(ctx, id)? {
        return Err(ContractError::already_exists(R::KIND, id));
    }
    Ok(())
}

/// Encode and buffer `record` under its key.
pub(crate) fn write_record<R, C>(ctx: &mut C, record: &R) -> Result<()>
where
    R: Record,
    C: StateStub + ?Sized,
{
    let bytes = encode(record)?;
    ctx.put_state(&record.key(), bytes)?;
    Ok(())
}

/// Decode every record in `R`'s namespace, in key order.
pub(crate) fn scan_records<R, C>(ctx: &C) -> Result<impl Iterator<Item = Result<R>>>
where
    R: Record,
    C: StateStub + ?Sized,
{
    let (start, end) = R::namespace().range();
    let entries = ctx.get_state_by_range(&start, &end)?;
    Ok(entries.map(|kv| decode::<R>(&kv.value).map_err(ContractError::from)))
}

/// Turn a failed lookup of a cross-referenced record into `ValidationFailed`.
///
/// Storage and decoding errors pass through untouched.
pub(crate) fn as_validation(role: &str, err: ContractError) -> ContractError {
    match err {
        ContractError::NotFound { .. } => {
            ContractError::ValidationFailed(format!("{role} validation failed: {err}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tracechain_core::{EntityKind, Role, User};
    use tracechain_store::{MemoryStore, Transaction};

    fn ts() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_now_uses_transaction_time_by_default() {
        let store = MemoryStore::new();
        let tx = Transaction::begin(&store, "tx", ts());
        assert_eq!(SupplyChainContract::default().now(&tx), ts());
    }

    #[test]
    fn test_now_local_clock() {
        let store = MemoryStore::new();
        let tx = Transaction::begin(&store, "tx", ts());
        let contract = SupplyChainContract::new(ContractConfig {
            timestamp_source: TimestampSource::LocalClock,
        });
        assert!(contract.now(&tx) > ts());
    }

    #[test]
    fn test_record_helpers() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store, "tx", ts());
        let user = User::new("u1", "U", "u@example.com", Role::Consumer, "", "Oslo");

        assert!(!record_exists::<User, _>(&tx, "u1").unwrap());
        write_record(&mut tx, &user).unwrap();
        assert!(record_exists::<User, _>(&tx, "u1").unwrap());
        assert_eq!(load_record::<User, _>(&tx, "u1").unwrap(), user);

        let err = ensure_absent::<User, _>(&tx, "u1").unwrap_err();
        assert!(matches!(err, ContractError::AlreadyExists { kind: EntityKind::User, .. }));

        let err = load_record::<User, _>(&tx, "u2").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_as_validation_only_wraps_not_found() {
        let wrapped = as_validation("buyer", ContractError::not_found(EntityKind::User, "x"));
        assert_eq!(wrapped.to_string(), "buyer validation failed: user x does not exist");

        let passthrough = as_validation("buyer", ContractError::UnknownFunction("f".into()));
        assert!(matches!(passthrough, ContractError::UnknownFunction(_)));
    }
}
