//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::cell::Cell;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracechain::{Ledger, LedgerConfig, Result, SupplyChainContract};
use tracechain_core::{NewOrder, NewProduct, NewUser, Order, Product, Role, User};
use tracechain_store::{MemoryStore, Store, Transaction};

/// First timestamp handed out by a fixture clock.
pub const EPOCH_SECS: i64 = 1_700_000_000;

/// A ledger with a deterministic clock.
///
/// Each operation runs one second after the previous one, so timestamps in
/// stored records are predictable.
pub struct TestLedger<S: Store = MemoryStore> {
    pub ledger: Ledger<S>,
    tick: Cell<i64>,
}

impl TestLedger<MemoryStore> {
    /// An empty in-memory ledger.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// An in-memory ledger holding the three sample participants.
    pub fn seeded() -> Self {
        let fixture = Self::new();
        fixture
            .run(|contract, ctx| contract.init_ledger(ctx))
            .expect("seeding an empty ledger");
        fixture
    }
}

impl<S: Store> TestLedger<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            ledger: Ledger::new(store, LedgerConfig::default()),
            tick: Cell::new(0),
        }
    }

    /// The timestamp the next operation will run at.
    pub fn now(&self) -> DateTime<Utc> {
        at(self.tick.get())
    }

    /// Run `op` at the next tick and commit it.
    pub fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&SupplyChainContract, &mut Transaction<'_, S>) -> Result<T>,
    {
        let timestamp = self.now();
        self.tick.set(self.tick.get() + 1);
        self.ledger.execute(timestamp, op)
    }

    /// Register a participant named after its id.
    pub fn register(&self, id: &str, role: impl Into<Role>) -> Result<User> {
        let user = participant(id, role);
        self.run(|contract, ctx| contract.create_user(ctx, user))
    }

    /// Register a product owned by `owner`. The QR code is `QR-<id>`.
    pub fn manufacture(&self, id: &str, owner: &str) -> Result<Product> {
        let draft = catalog_item(id);
        self.run(|contract, ctx| contract.create_product(ctx, draft, owner))
    }

    pub fn transfer(&self, product_id: &str, to: &str) -> Result<Product> {
        self.run(|contract, ctx| {
            contract.transfer_product(ctx, product_id, to, "warehouse", "handover")
        })
    }

    pub fn order(&self, id: &str, product_id: &str, buyer: &str, seller: &str) -> Result<Order> {
        let draft = NewOrder::new(id, product_id, buyer, seller, 1, 10.0);
        self.run(|contract, ctx| contract.create_order(ctx, draft))
    }

    pub fn product(&self, id: &str) -> Result<Product> {
        self.ledger.query(|contract, ctx| contract.get_product(ctx, id))
    }
}

impl Default for TestLedger<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixture clock's timestamp at `tick`.
pub fn at(tick: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(EPOCH_SECS, 0).single().unwrap_or_default() + Duration::seconds(tick)
}

/// A registration for `id` with placeholder contact details.
pub fn participant(id: &str, role: impl Into<Role>) -> NewUser {
    NewUser::new(
        id,
        format!("{id} Ltd"),
        format!("{id}@example.com"),
        role,
        format!("{id} Holdings"),
        format!("{id} HQ"),
    )
}

/// A catalog entry for `id` with QR code `QR-<id>`.
pub fn catalog_item(id: &str) -> NewProduct {
    NewProduct::new(id, format!("Item {id}"), "fixture", "misc", 10.0, format!("QR-{id}"))
}

/// One participant per well-known role, ids `manufacturer`, `distributor`,
/// `retailer` and `consumer`.
pub fn supply_chain_cast() -> Vec<NewUser> {
    [Role::Manufacturer, Role::Distributor, Role::Retailer, Role::Consumer]
        .into_iter()
        .map(|role| participant(&role.as_str().to_lowercase(), role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracechain_core::ProductStatus;

    #[test]
    fn test_seeded_fixture() {
        let fixture = TestLedger::seeded();
        assert_eq!(fixture.ledger.store().len().unwrap(), 3);
        assert_eq!(fixture.now(), at(1));
    }

    #[test]
    fn test_fixture_custody_chain() {
        let fixture = TestLedger::new();
        for user in supply_chain_cast() {
            let role = user.role.clone();
            fixture.register(&user.id, role).unwrap();
        }

        let p = fixture.manufacture("p1", "manufacturer").unwrap();
        assert_eq!(p.created_at, at(4));
        assert_eq!(p.qr_code, "QR-p1");

        fixture.transfer("p1", "distributor").unwrap();
        fixture.transfer("p1", "retailer").unwrap();
        let p = fixture.transfer("p1", "consumer").unwrap();
        assert_eq!(p.status, ProductStatus::Sold);
        assert_eq!(p.updated_at, at(7));
        assert_eq!(fixture.product("p1").unwrap(), p);
    }

    #[test]
    fn test_failed_step_still_advances_clock() {
        let fixture = TestLedger::new();
        assert!(fixture.manufacture("p1", "nobody").is_err());
        assert_eq!(fixture.now(), at(1));
    }
}
