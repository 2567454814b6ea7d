//! Products and their embedded audit trail.
//!
//! A product's `history` is append-only: every mutation pushes exactly one
//! [`History`] entry and bumps `updated_at`. Nothing ever reorders or removes
//! entries, so the history seen after any operation is a prefix of the
//! history seen after the next one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{HistoryAction, ProductStatus, Role};
use crate::user::User;

/// Description attached to the genesis history entry.
pub const CREATED_DESCRIPTION: &str = "Product created by manufacturer";

/// One immutable audit event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: HistoryAction,
    pub from: String,
    pub to: String,
    pub location: String,
    pub description: String,
}

/// A physical item and its custody record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub qr_code: String,
    pub status: ProductStatus,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<History>,
}

impl Product {
    /// Build a freshly manufactured product owned by `owner`.
    ///
    /// The product starts `Created` with a single genesis entry recorded at
    /// the owner's location.
    pub fn manufacture(
        draft: NewProduct,
        owner: &User,
        tx_id: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        let genesis = History {
            tx_id: tx_id.into(),
            timestamp: at,
            action: HistoryAction::Created,
            from: String::new(),
            to: owner.id.clone(),
            location: owner.location.clone(),
            description: CREATED_DESCRIPTION.to_string(),
        };

        Self {
            id: draft.id,
            name: draft.name,
            description: draft.description,
            category: draft.category,
            price: draft.price,
            qr_code: draft.qr_code,
            status: ProductStatus::Created,
            owner: owner.id.clone(),
            created_at: at,
            updated_at: at,
            history: vec![genesis],
        }
    }

    /// Hand custody to `new_owner`, recording the transfer.
    ///
    /// The new status follows from the recipient's role, see
    /// [`ProductStatus::for_custodian`].
    pub fn transfer_to(
        &mut self,
        new_owner: &User,
        tx_id: impl Into<String>,
        at: DateTime<Utc>,
        location: impl Into<String>,
        description: impl Into<String>,
    ) {
        let previous = std::mem::replace(&mut self.owner, new_owner.id.clone());
        self.history.push(History {
            tx_id: tx_id.into(),
            timestamp: at,
            action: HistoryAction::Transferred,
            from: previous,
            to: new_owner.id.clone(),
            location: location.into(),
            description: description.into(),
        });
        self.status = ProductStatus::for_custodian(&new_owner.role);
        self.updated_at = at;
    }

    /// Set the status verbatim, recording the change against the current owner.
    pub fn update_status(
        &mut self,
        status: ProductStatus,
        tx_id: impl Into<String>,
        at: DateTime<Utc>,
        location: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.history.push(History {
            tx_id: tx_id.into(),
            timestamp: at,
            action: HistoryAction::StatusUpdate,
            from: self.owner.clone(),
            to: self.owner.clone(),
            location: location.into(),
            description: description.into(),
        });
        self.status = status;
        self.updated_at = at;
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner == user_id
    }

    /// The most recent audit entry.
    pub fn last_event(&self) -> Option<&History> {
        self.history.last()
    }
}

/// Catalog fields supplied when a manufacturer registers a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub qr_code: String,
}

impl NewProduct {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        qr_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            price,
            qr_code: qr_code.into(),
        }
    }

    /// Whether the price is a usable non-negative amount.
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}
