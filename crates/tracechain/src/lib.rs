//! # Tracechain
//!
//! A supply-chain custody ledger: a participant registry, products with an
//! append-only custody trail, purchase orders between participants, and
//! read-only queries, all kept in a transactional key-value world state.
//!
//! ## Overview
//!
//! - **Users**: Registered participants with a role (Manufacturer,
//!   Distributor, Retailer, Consumer)
//! - **Products**: Created by manufacturers, handed from custodian to
//!   custodian; every change appends a history entry
//! - **Orders**: Purchase records between a buyer and a seller for a product
//! - **Queries**: Scans by owner, by participant, and QR-code lookup
//!
//! ## Key Concepts
//!
//! - **StateStub**: The per-invocation world-state view every operation
//!   takes explicitly. Reads see the invocation's own pending writes.
//! - **Write-set**: An invocation's writes are committed together or not at
//!   all. Any error discards them.
//! - **Ledger**: A local host that assigns transaction ids and timestamps,
//!   runs invocations and commits them.
//!
//! ## Usage
//!
//! ```rust
//! use tracechain::{Ledger, LedgerConfig};
//! use tracechain::store::MemoryStore;
//!
//! let ledger = Ledger::new(MemoryStore::new(), LedgerConfig::default());
//! let none: [&str; 0] = [];
//! ledger.submit("InitLedger", &none).unwrap();
//! ledger
//!     .submit(
//!         "CreateProduct",
//!         &["p1", "Widget", "A widget", "tools", "9.99", "QR1", "manufacturer001"],
//!     )
//!     .unwrap();
//! ledger
//!     .submit("TransferProduct", &["p1", "distributor001", "Chicago", "ship"])
//!     .unwrap();
//!
//! let product = ledger.query(|contract, ctx| contract.get_product(ctx, "p1")).unwrap();
//! assert_eq!(product.owner, "distributor001");
//! assert_eq!(product.history.len(), 2);
//! ```
//!
//! ## Re-exports
//!
//! - `tracechain::core` - Data model, key layout and record codec
//! - `tracechain::store` - World-state traits and backends

pub mod config;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod orders;
pub mod products;
pub mod query;
pub mod registry;

// Re-export component crates
pub use tracechain_core as core;
pub use tracechain_store as store;

// Re-export main types for convenience
pub use config::{ConfigError, ContractConfig, LedgerConfig, TimestampSource};
pub use contract::SupplyChainContract;
pub use dispatch::Function;
pub use error::{ContractError, Result};
pub use ledger::Ledger;
pub use registry::seed_users;

// Re-export commonly used core types
pub use tracechain_core::{
    History, HistoryAction, NewOrder, NewProduct, NewUser, Order, OrderStatus, Product,
    ProductStatus, Role, User,
};
