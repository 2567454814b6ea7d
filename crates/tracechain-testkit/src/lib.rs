//! # Tracechain Testkit
//!
//! Testing utilities for Tracechain.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A ledger with a deterministic clock and helpers for
//!   registering participants and moving products
//! - **Generators**: Proptest strategies for records and custody scripts
//!
//! ## Test Fixtures
//!
//! ```rust
//! use tracechain_testkit::fixtures::TestLedger;
//!
//! let fixture = TestLedger::seeded();
//! fixture.manufacture("p1", "manufacturer001").unwrap();
//! let product = fixture.transfer("p1", "retailer001").unwrap();
//! assert_eq!(product.history.len(), 2);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tracechain_testkit::generators::{play_script, CustodyScript};
//!
//! proptest! {
//!     #[test]
//!     fn history_is_append_only(script: CustodyScript) {
//!         let (_, snapshots) = play_script(&script).unwrap();
//!         for pair in snapshots.windows(2) {
//!             prop_assert!(pair[1].starts_with(&pair[0]));
//!         }
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{catalog_item, participant, supply_chain_cast, TestLedger};
pub use generators::{play_script, CustodyScript, CustodyStep};
