//! Read-only scans over the product and order namespaces.
//!
//! Results come back in key order. A record that fails to decode fails the
//! whole query rather than being skipped.

use tracechain_core::{EntityKind, Order, Product};
use tracechain_store::StateStub;

use crate::contract::{scan_records, SupplyChainContract};
use crate::error::{ContractError, Result};

impl SupplyChainContract {
    /// Every product on the ledger.
    pub fn get_all_products<C: StateStub + ?Sized>(&self, ctx: &C) -> Result<Vec<Product>> {
        scan_records(ctx)?.collect()
    }

    /// Products whose current custodian is `owner_id`. Unknown owners yield
    /// an empty list.
    pub fn get_products_by_owner<C: StateStub + ?Sized>(
        &self,
        ctx: &C,
        owner_id: &str,
    ) -> Result<Vec<Product>> {
        let mut owned = Vec::new();
        for product in scan_records::<Product, C>(ctx)? {
            let product = product?;
            if product.is_owned_by(owner_id) {
                owned.push(product);
            }
        }
        Ok(owned)
    }

    /// Orders where `user_id` is the buyer or the seller.
    pub fn get_orders_by_user<C: StateStub + ?Sized>(
        &self,
        ctx: &C,
        user_id: &str,
    ) -> Result<Vec<Order>> {
        let mut orders = Vec::new();
        for order in scan_records::<Order, C>(ctx)? {
            let order = order?;
            if order.involves(user_id) {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    /// Resolve a QR code to a product.
    ///
    /// QR codes are not unique; the first match in key order wins. Fails
    /// with `NotFound` when nothing carries the code.
    pub fn validate_qr_code<C: StateStub + ?Sized>(
        &self,
        ctx: &C,
        qr_code: &str,
    ) -> Result<Product> {
        for product in scan_records::<Product, C>(ctx)? {
            let product = product?;
            if product.qr_code == qr_code {
                return Ok(product);
            }
        }
        Err(ContractError::not_found(
            EntityKind::Product,
            &format!("with QR code {qr_code}"),
        ))
    }
}
