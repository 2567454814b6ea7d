//! Product ledger: registration, custody transfer and status tracking.
//!
//! A product's custody trail is embedded in its record. Every mutation
//! appends exactly one [`History`] entry and rewrites the record; entries
//! are never edited or removed.

use tracechain_core::{History, NewProduct, Product, ProductStatus, User};
use tracechain_store::StateStub;
use tracing::debug;

use crate::contract::{
    as_validation, ensure_absent, load_record, record_exists, write_record, SupplyChainContract,
};
use crate::error::{ContractError, Result};

impl SupplyChainContract {
    /// Register a product manufactured by `owner_id`.
    ///
    /// The owner must be a registered manufacturer. The product starts
    /// `Created`, with a genesis history entry at the owner's location.
    pub fn create_product<C: StateStub + ?Sized>(
        &self,
        ctx: &mut C,
        product: NewProduct,
        owner_id: &str,
    ) -> Result<Product> {
        ensure_absent::<Product, C>(ctx, &product.id)?;

        let owner: User = load_record(ctx, owner_id).map_err(|e| as_validation("owner", e))?;
        if !owner.is_manufacturer() {
            return Err(ContractError::ValidationFailed(
                "only manufacturers can create products".to_string(),
            ));
        }
        if !product.has_valid_price() {
            return Err(ContractError::ValidationFailed(format!(
                "invalid price {} for product {}",
                product.price, product.id
            )));
        }

        let product = Product::manufacture(product, &owner, ctx.tx_id(), self.now(ctx));
        write_record(ctx, &product)?;
        debug!(product_id = %product.id, owner = %product.owner, "created product");
        Ok(product)
    }

    pub fn product_exists<C: StateStub + ?Sized>(&self, ctx: &C, product_id: &str) -> Result<bool> {
        record_exists::<Product, C>(ctx, product_id)
    }

    /// Fetch a product, failing with `NotFound` if unregistered.
    pub fn get_product<C: StateStub + ?Sized>(&self, ctx: &C, product_id: &str) -> Result<Product> {
        load_record(ctx, product_id)
    }

    /// Hand custody of a product to `new_owner_id`.
    ///
    /// Only existence of the new owner is checked. The current owner must
    /// still resolve to a registered user. The resulting status follows the
    /// recipient's role.
    pub fn transfer_product<C: StateStub + ?Sized>(
        &self,
        ctx: &mut C,
        product_id: &str,
        new_owner_id: &str,
        location: &str,
        description: &str,
    ) -> Result<Product> {
        let mut product: Product = load_record(ctx, product_id)?;
        let new_owner: User =
            load_record(ctx, new_owner_id).map_err(|e| as_validation("new owner", e))?;
        load_record::<User, C>(ctx, &product.owner)
            .map_err(|e| as_validation("current owner", e))?;

        let previous = product.owner.clone();
        product.transfer_to(&new_owner, ctx.tx_id(), self.now(ctx), location, description);
        write_record(ctx, &product)?;
        debug!(
            product_id,
            from = %previous,
            to = %product.owner,
            status = %product.status,
            "transferred product"
        );
        Ok(product)
    }

    /// Set a product's status verbatim and record the change.
    ///
    /// Ownership is unchanged. No transition rules are enforced.
    pub fn update_product_status<C: StateStub + ?Sized>(
        &self,
        ctx: &mut C,
        product_id: &str,
        status: impl Into<ProductStatus>,
        location: &str,
        description: &str,
    ) -> Result<Product> {
        let mut product: Product = load_record(ctx, product_id)?;

        product.update_status(status.into(), ctx.tx_id(), self.now(ctx), location, description);
        write_record(ctx, &product)?;
        debug!(product_id, status = %product.status, "updated product status");
        Ok(product)
    }

    /// The product's full custody trail, oldest first.
    pub fn get_product_history<C: StateStub + ?Sized>(
        &self,
        ctx: &C,
        product_id: &str,
    ) -> Result<Vec<History>> {
        Ok(self.get_product(ctx, product_id)?.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tracechain_core::{encode, HistoryAction, NewUser, Record, CREATED_DESCRIPTION};
    use tracechain_store::{MemoryStore, Transaction};

    fn ts() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn seeded() -> (MemoryStore, SupplyChainContract) {
        let store = MemoryStore::new();
        let contract = SupplyChainContract::default();
        let mut tx = Transaction::begin(&store, "seed", ts());
        contract.init_ledger(&mut tx).unwrap();
        let consumer = NewUser::new("c1", "Carol", "c@example.com", "Consumer", "", "Austin");
        contract.create_user(&mut tx, consumer).unwrap();
        tx.commit().unwrap();
        (store, contract)
    }

    fn widget() -> NewProduct {
        NewProduct::new("p1", "Widget", "A widget", "tools", 10.5, "QR-1")
    }

    #[test]
    fn test_transfer_from_unregistered_owner() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());
        let mut product = contract.create_product(&mut tx, widget(), "manufacturer001").unwrap();

        product.owner = "ghost".into();
        tx.put_state(&product.key(), encode(&product).unwrap()).unwrap();
        let before = tx.pending().len();

        let err = contract
            .transfer_product(&mut tx, "p1", "distributor001", "Chicago", "ship")
            .unwrap_err();
        assert!(err.is_validation_failed());
        assert_eq!(
            err.to_string(),
            "current owner validation failed: user ghost does not exist"
        );
        assert_eq!(tx.pending().len(), before);
        assert_eq!(contract.get_product(&tx, "p1").unwrap().history.len(), 1);
    }

    #[test]
    fn test_create_product() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());

        let product = contract.create_product(&mut tx, widget(), "manufacturer001").unwrap();
        assert_eq!(product.status, ProductStatus::Created);
        assert_eq!(product.owner, "manufacturer001");
        assert_eq!(product.created_at, ts());
        assert_eq!(product.history.len(), 1);

        let genesis = &product.history[0];
        assert_eq!(genesis.action, HistoryAction::Created);
        assert_eq!(genesis.tx_id, "tx-1");
        assert_eq!(genesis.from, "");
        assert_eq!(genesis.to, "manufacturer001");
        assert_eq!(genesis.location, "New York, USA");
        assert_eq!(genesis.description, CREATED_DESCRIPTION);
    }

    #[test]
    fn test_create_product_rejections() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());

        let err = contract.create_product(&mut tx, widget(), "ghost").unwrap_err();
        assert!(err.is_validation_failed());
        assert_eq!(err.to_string(), "owner validation failed: user ghost does not exist");

        let err = contract.create_product(&mut tx, widget(), "distributor001").unwrap_err();
        assert_eq!(err.to_string(), "only manufacturers can create products");

        let mut bad_price = widget();
        bad_price.price = -1.0;
        let err = contract.create_product(&mut tx, bad_price, "manufacturer001").unwrap_err();
        assert!(err.is_validation_failed());

        contract.create_product(&mut tx, widget(), "manufacturer001").unwrap();
        let err = contract.create_product(&mut tx, widget(), "manufacturer001").unwrap_err();
        assert!(err.is_already_exists());

        assert_eq!(tx.pending().len(), 1);
    }

    #[test]
    fn test_transfer_chain_sets_status_by_role() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());
        contract.create_product(&mut tx, widget(), "manufacturer001").unwrap();

        let p = contract
            .transfer_product(&mut tx, "p1", "distributor001", "Chicago", "truck")
            .unwrap();
        assert_eq!(p.status, ProductStatus::InTransit);
        let p = contract.transfer_product(&mut tx, "p1", "retailer001", "LA", "rail").unwrap();
        assert_eq!(p.status, ProductStatus::Delivered);
        let p = contract.transfer_product(&mut tx, "p1", "c1", "Austin", "sale").unwrap();
        assert_eq!(p.status, ProductStatus::Sold);
        assert_eq!(p.owner, "c1");

        let history = contract.get_product_history(&tx, "p1").unwrap();
        let hops: Vec<_> = history.iter().map(|h| (h.from.as_str(), h.to.as_str())).collect();
        assert_eq!(
            hops,
            vec![
                ("", "manufacturer001"),
                ("manufacturer001", "distributor001"),
                ("distributor001", "retailer001"),
                ("retailer001", "c1"),
            ]
        );
        assert!(history[1..].iter().all(|h| h.action == HistoryAction::Transferred));
    }

    #[test]
    fn test_transfer_back_to_manufacturer_is_in_transit() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());
        contract.create_product(&mut tx, widget(), "manufacturer001").unwrap();
        contract.transfer_product(&mut tx, "p1", "retailer001", "LA", "").unwrap();

        let p = contract
            .transfer_product(&mut tx, "p1", "manufacturer001", "NY", "return")
            .unwrap();
        assert_eq!(p.status, ProductStatus::InTransit);
    }

    #[test]
    fn test_transfer_rejections() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());

        let err = contract.transfer_product(&mut tx, "nope", "c1", "", "").unwrap_err();
        assert!(err.is_not_found());

        contract.create_product(&mut tx, widget(), "manufacturer001").unwrap();
        let err = contract.transfer_product(&mut tx, "p1", "ghost", "", "").unwrap_err();
        assert_eq!(err.to_string(), "new owner validation failed: user ghost does not exist");

        assert_eq!(contract.get_product_history(&tx, "p1").unwrap().len(), 1);
    }

    #[test]
    fn test_update_status_keeps_owner() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());
        contract.create_product(&mut tx, widget(), "manufacturer001").unwrap();
        tx.commit().unwrap();

        let later = ts() + Duration::seconds(60);
        let mut tx = Transaction::begin(&store, "tx-2", later);
        let p = contract
            .update_product_status(&mut tx, "p1", "Quarantined", "NY", "recall")
            .unwrap();
        assert_eq!(p.status.as_str(), "Quarantined");
        assert_eq!(p.owner, "manufacturer001");
        assert_eq!(p.updated_at, later);
        assert_eq!(p.created_at, ts());

        let last = p.last_event().unwrap();
        assert_eq!(last.action, HistoryAction::StatusUpdate);
        assert_eq!(last.from, last.to);
        assert_eq!(last.tx_id, "tx-2");

        let err = contract
            .update_product_status(&mut tx, "missing", ProductStatus::Sold, "", "")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_history_of_missing_product() {
        let (store, contract) = seeded();
        let tx = Transaction::begin(&store, "tx-1", ts());
        assert!(contract.get_product_history(&tx, "p1").unwrap_err().is_not_found());
        assert!(!contract.product_exists(&tx, "p1").unwrap());
    }
}
