//! Proptest generators for property-based testing.

use proptest::prelude::*;

use chrono::{DateTime, TimeZone, Utc};
use tracechain::Result;
use tracechain_core::{History, NewOrder, NewProduct, NewUser, OrderStatus, ProductStatus, Role};

use crate::fixtures::{participant, TestLedger};

/// Generate a record id.
pub fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,11}".prop_map(String::from)
}

/// Generate one of the four well-known roles.
pub fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Manufacturer),
        Just(Role::Distributor),
        Just(Role::Retailer),
        Just(Role::Consumer),
    ]
}

/// Generate a role, occasionally one outside the well-known set.
pub fn open_role() -> impl Strategy<Value = Role> {
    prop_oneof![
        4 => role(),
        1 => "[A-Z][a-z]{2,10}".prop_map(Role::from),
    ]
}

/// Generate a product status, well-known or free-form.
pub fn product_status() -> impl Strategy<Value = ProductStatus> {
    prop_oneof![
        Just(ProductStatus::Created),
        Just(ProductStatus::InTransit),
        Just(ProductStatus::Delivered),
        Just(ProductStatus::Sold),
        "[A-Z][a-z]{2,10}".prop_map(ProductStatus::from),
    ]
}

/// Generate an order status, well-known or free-form.
pub fn order_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Pending),
        Just(OrderStatus::Confirmed),
        Just(OrderStatus::Shipped),
        Just(OrderStatus::Delivered),
        Just(OrderStatus::Completed),
        Just(OrderStatus::Cancelled),
        "[A-Z][a-z]{2,10}".prop_map(OrderStatus::from),
    ]
}

/// Generate a timestamp with sub-second precision.
pub fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..=4_102_444_800, 0u32..1_000_000_000).prop_map(|(secs, nanos)| {
        Utc.timestamp_opt(secs, nanos).single().unwrap_or_default()
    })
}

/// Generate a non-negative price.
pub fn price() -> impl Strategy<Value = f64> {
    0.0f64..1_000_000.0
}

/// Generate a participant registration.
pub fn new_user() -> impl Strategy<Value = NewUser> {
    (identifier(), open_role()).prop_map(|(id, role)| participant(&id, role))
}

/// Generate catalog fields for a product.
pub fn new_product() -> impl Strategy<Value = NewProduct> {
    (identifier(), ".{0,24}", ".{0,40}", "[a-z]{1,8}", price(), "[A-Z0-9]{1,8}").prop_map(
        |(id, name, description, category, price, qr_code)| {
            NewProduct::new(id, name, description, category, price, qr_code)
        },
    )
}

/// Generate order fields referencing the given ids.
pub fn new_order(
    product_id: String,
    buyer_id: String,
    seller_id: String,
) -> impl Strategy<Value = NewOrder> {
    (identifier(), 1i64..10_000, price()).prop_map(move |(id, quantity, total)| {
        NewOrder::new(id, product_id.clone(), buyer_id.clone(), seller_id.clone(), quantity, total)
    })
}

/// One step applied to a product after it is manufactured.
#[derive(Debug, Clone)]
pub enum CustodyStep {
    /// Hand the product to the participant at this index in the cast.
    Transfer(usize),
    /// Set the product's status.
    Status(ProductStatus),
}

/// A cast of participants and a sequence of steps applied to one product.
///
/// Participant 0 is always a manufacturer and creates the product.
#[derive(Debug, Clone)]
pub struct CustodyScript {
    pub cast: Vec<Role>,
    pub steps: Vec<CustodyStep>,
}

impl Arbitrary for CustodyScript {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::vec(open_role(), 0..5)
            .prop_flat_map(|others| {
                let mut cast = vec![Role::Manufacturer];
                cast.extend(others);
                let size = cast.len();
                let step = prop_oneof![
                    3 => (0..size).prop_map(CustodyStep::Transfer),
                    1 => product_status().prop_map(CustodyStep::Status),
                ];
                (Just(cast), prop::collection::vec(step, 0..12))
            })
            .prop_map(|(cast, steps)| CustodyScript { cast, steps })
            .boxed()
    }
}

impl CustodyScript {
    /// Id of the participant at `index`.
    pub fn participant_id(index: usize) -> String {
        format!("party{index}")
    }

    /// Id of the scripted product.
    pub const PRODUCT_ID: &'static str = "scripted";
}

/// Play a script against a fresh ledger.
///
/// Returns the fixture and the product's history as it stood after
/// manufacture and after every step.
pub fn play_script(script: &CustodyScript) -> Result<(TestLedger, Vec<Vec<History>>)> {
    let fixture = TestLedger::new();
    for (index, role) in script.cast.iter().enumerate() {
        fixture.register(&CustodyScript::participant_id(index), role.clone())?;
    }

    let owner = CustodyScript::participant_id(0);
    let product = fixture.manufacture(CustodyScript::PRODUCT_ID, &owner)?;
    let mut snapshots = vec![product.history];

    for step in &script.steps {
        let product = match step {
            CustodyStep::Transfer(to) => {
                fixture.transfer(CustodyScript::PRODUCT_ID, &CustodyScript::participant_id(*to))?
            }
            CustodyStep::Status(status) => {
                let status = status.clone();
                fixture.run(|contract, ctx| {
                    let id = CustodyScript::PRODUCT_ID;
                    contract.update_product_status(ctx, id, status, "site", "step")
                })?
            }
        };
        snapshots.push(product.history);
    }

    Ok((fixture, snapshots))
}
