//! Order ledger: purchase orders between registered participants.

use tracechain_core::{NewOrder, Order, OrderStatus, Product, User};
use tracechain_store::StateStub;
use tracing::debug;

use crate::contract::{
    as_validation, ensure_absent, load_record, record_exists, write_record, SupplyChainContract,
};
use crate::error::{ContractError, Result};

impl SupplyChainContract {
    /// Place a `Pending` order.
    ///
    /// Buyer, seller and product must all exist, checked in that order, and
    /// the total must be finite. Whether the seller owns the product, and
    /// whether quantity and total are positive, is not checked.
    pub fn create_order<C: StateStub + ?Sized>(
        &self,
        ctx: &mut C,
        order: NewOrder,
    ) -> Result<Order> {
        ensure_absent::<Order, C>(ctx, &order.id)?;

        load_record::<User, C>(ctx, &order.buyer_id).map_err(|e| as_validation("buyer", e))?;
        load_record::<User, C>(ctx, &order.seller_id).map_err(|e| as_validation("seller", e))?;
        load_record::<Product, C>(ctx, &order.product_id)
            .map_err(|e| as_validation("product", e))?;
        // A non-finite total encodes as null and could never be read back.
        if !order.has_finite_total() {
            return Err(ContractError::ValidationFailed(format!(
                "invalid total price {} for order {}",
                order.total_price, order.id
            )));
        }

        let order = Order::place(order, self.now(ctx));
        write_record(ctx, &order)?;
        debug!(
            order_id = %order.id,
            buyer = %order.buyer_id,
            seller = %order.seller_id,
            "created order"
        );
        Ok(order)
    }

    pub fn order_exists<C: StateStub + ?Sized>(&self, ctx: &C, order_id: &str) -> Result<bool> {
        record_exists::<Order, C>(ctx, order_id)
    }

    /// Fetch an order, failing with `NotFound` if unknown.
    pub fn get_order<C: StateStub + ?Sized>(&self, ctx: &C, order_id: &str) -> Result<Order> {
        load_record(ctx, order_id)
    }

    /// Set an order's status verbatim.
    ///
    /// Moving to `Delivered` stamps the delivery date with this
    /// transaction's time. Leaving `Delivered` keeps the old date.
    pub fn update_order_status<C: StateStub + ?Sized>(
        &self,
        ctx: &mut C,
        order_id: &str,
        status: impl Into<OrderStatus>,
    ) -> Result<Order> {
        let mut order: Order = load_record(ctx, order_id)?;

        order.set_status(status.into(), self.now(ctx));
        write_record(ctx, &order)?;
        debug!(order_id, status = %order.status, "updated order status");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tracechain_core::NewProduct;
    use tracechain_store::{MemoryStore, Transaction};

    fn ts() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn seeded() -> (MemoryStore, SupplyChainContract) {
        let store = MemoryStore::new();
        let contract = SupplyChainContract::default();
        let mut tx = Transaction::begin(&store, "seed", ts());
        contract.init_ledger(&mut tx).unwrap();
        let widget = NewProduct::new("p1", "Widget", "", "tools", 2.0, "QR-1");
        contract.create_product(&mut tx, widget, "manufacturer001").unwrap();
        tx.commit().unwrap();
        (store, contract)
    }

    fn draft() -> NewOrder {
        NewOrder::new("o1", "p1", "retailer001", "distributor001", 10, 20.0)
    }

    #[test]
    fn test_create_order() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());

        let order = contract.create_order(&mut tx, draft()).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.tracking_id, "TRKo1");
        assert_eq!(order.order_date, ts());
        assert!(order.delivery_date.is_none());
        tx.commit().unwrap();

        let tx = Transaction::begin(&store, "tx-2", ts());
        assert!(contract.order_exists(&tx, "o1").unwrap());
        assert_eq!(contract.get_order(&tx, "o1").unwrap(), order);
    }

    #[test]
    fn test_create_order_validation_order() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());

        let mut bad = draft();
        bad.buyer_id = "ghost".into();
        bad.seller_id = "phantom".into();
        let err = contract.create_order(&mut tx, bad).unwrap_err();
        assert_eq!(err.to_string(), "buyer validation failed: user ghost does not exist");

        let mut bad = draft();
        bad.seller_id = "phantom".into();
        bad.product_id = "nothing".into();
        let err = contract.create_order(&mut tx, bad).unwrap_err();
        assert_eq!(err.to_string(), "seller validation failed: user phantom does not exist");

        let mut bad = draft();
        bad.product_id = "nothing".into();
        let err = contract.create_order(&mut tx, bad).unwrap_err();
        assert!(err.is_validation_failed());
        assert_eq!(err.to_string(), "product validation failed: product nothing does not exist");

        assert!(tx.pending().is_empty());
    }

    #[test]
    fn test_non_finite_total_rejected() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());

        for total in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut bad = draft();
            bad.total_price = total;
            let err = contract.create_order(&mut tx, bad).unwrap_err();
            assert!(err.is_validation_failed());
            assert!(err.to_string().starts_with("invalid total price"));
        }
        assert!(tx.pending().is_empty());

        let mut refund = draft();
        refund.total_price = -5.0;
        contract.create_order(&mut tx, refund).unwrap();
        assert_eq!(contract.get_orders_by_user(&tx, "retailer001").unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_order_rejected() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());
        contract.create_order(&mut tx, draft()).unwrap();
        assert!(contract.create_order(&mut tx, draft()).unwrap_err().is_already_exists());
    }

    #[test]
    fn test_delivery_date_set_once_delivered() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());
        contract.create_order(&mut tx, draft()).unwrap();
        tx.commit().unwrap();

        let shipped_at = ts() + Duration::hours(1);
        let mut tx = Transaction::begin(&store, "tx-2", shipped_at);
        let order = contract.update_order_status(&mut tx, "o1", "Shipped").unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert!(order.delivery_date.is_none());

        let delivered_at = ts() + Duration::hours(5);
        let mut tx = Transaction::begin(&store, "tx-3", delivered_at);
        let order = contract.update_order_status(&mut tx, "o1", OrderStatus::Delivered).unwrap();
        assert_eq!(order.delivery_date, Some(delivered_at));

        let order = contract.update_order_status(&mut tx, "o1", "Completed").unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.delivery_date, Some(delivered_at));
        assert_eq!(order.order_date, ts());
    }

    #[test]
    fn test_update_missing_order() {
        let (store, contract) = seeded();
        let mut tx = Transaction::begin(&store, "tx-1", ts());
        let err = contract.update_order_status(&mut tx, "o9", "Shipped").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "order o9 does not exist");
    }
}
