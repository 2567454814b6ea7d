//! # Tracechain Core
//!
//! Pure data model for Tracechain: participants, products with their custody
//! history, purchase orders, the world-state key layout and the record codec.
//!
//! This crate contains no I/O and no storage. Everything here is plain data
//! plus the rules for turning it into bytes and back.
//!
//! ## Key Types
//!
//! - [`User`] - A registered supply-chain participant
//! - [`Product`] - A physical item, its current custodian and its audit trail
//! - [`History`] - One immutable audit event embedded in a product
//! - [`Order`] - A purchase record between a buyer and a seller
//! - [`Namespace`] - The three logical tables sharing one key space
//!
//! ## Encoding
//!
//! Records are stored as field-named JSON objects. See the [`codec`] module.

pub mod codec;
pub mod error;
pub mod keys;
pub mod order;
pub mod product;
pub mod types;
pub mod user;

pub use codec::{decode, encode, encode_payload, Record};
pub use error::{CodecError, Result};
pub use keys::{Namespace, RANGE_SENTINEL};
pub use order::{tracking_id_for, NewOrder, Order, TRACKING_PREFIX};
pub use product::{History, NewProduct, Product, CREATED_DESCRIPTION};
pub use types::{EntityKind, HistoryAction, OrderStatus, ProductStatus, Role};
pub use user::{NewUser, User};
