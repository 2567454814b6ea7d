//! Purchase orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::OrderStatus;

/// Prefix of every tracking id; the rest is the order id.
pub const TRACKING_PREFIX: &str = "TRK";

/// A purchase record between a buyer and a seller for one product.
///
/// The referenced product and users are only checked when the order is
/// placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub product_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub quantity: i64,
    pub total_price: f64,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime<Utc>>,
    pub tracking_id: String,
}

impl Order {
    /// A new `Pending` order placed at `at`.
    pub fn place(draft: NewOrder, at: DateTime<Utc>) -> Self {
        let tracking_id = tracking_id_for(&draft.id);
        Self {
            id: draft.id,
            product_id: draft.product_id,
            buyer_id: draft.buyer_id,
            seller_id: draft.seller_id,
            quantity: draft.quantity,
            total_price: draft.total_price,
            status: OrderStatus::Pending,
            order_date: at,
            delivery_date: None,
            tracking_id,
        }
    }

    /// Set the status verbatim. Moving to `Delivered` stamps the delivery date.
    pub fn set_status(&mut self, status: OrderStatus, at: DateTime<Utc>) {
        if status == OrderStatus::Delivered {
            self.delivery_date = Some(at);
        }
        self.status = status;
    }

    /// Whether `user_id` is on either side of this order.
    pub fn involves(&self, user_id: &str) -> bool {
        self.buyer_id == user_id || self.seller_id == user_id
    }
}

/// Tracking id derived from an order id.
pub fn tracking_id_for(order_id: &str) -> String {
    format!("{TRACKING_PREFIX}{order_id}")
}

/// Fields supplied when an order is placed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub id: String,
    pub product_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub quantity: i64,
    pub total_price: f64,
}

impl NewOrder {
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        buyer_id: impl Into<String>,
        seller_id: impl Into<String>,
        quantity: i64,
        total_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            buyer_id: buyer_id.into(),
            seller_id: seller_id.into(),
            quantity,
            total_price,
        }
    }

    /// Whether the total is a finite number. Sign is not checked.
    pub fn has_finite_total(&self) -> bool {
        self.total_price.is_finite()
    }
}
