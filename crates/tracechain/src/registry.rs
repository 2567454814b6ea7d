//! User registry: participant registration and lookup.

use tracechain_core::{NewUser, Role, User};
use tracechain_store::StateStub;
use tracing::debug;

use crate::contract::{ensure_absent, load_record, record_exists, write_record, SupplyChainContract};
use crate::error::Result;

/// Participants written by [`SupplyChainContract::init_ledger`].
pub fn seed_users() -> Vec<User> {
    vec![
        User::new(
            "manufacturer001",
            "John Manufacturing Co",
            "admin@johnmfg.com",
            Role::Manufacturer,
            "John Manufacturing",
            "New York, USA",
        ),
        User::new(
            "distributor001",
            "Global Distribution Inc",
            "admin@globaldist.com",
            Role::Distributor,
            "Global Distribution",
            "Chicago, USA",
        ),
        User::new(
            "retailer001",
            "Retail Store Chain",
            "admin@retailchain.com",
            Role::Retailer,
            "Retail Chain",
            "Los Angeles, USA",
        ),
    ]
}

impl SupplyChainContract {
    /// Seed the registry with one manufacturer, one distributor and one
    /// retailer. Existing records under those ids are overwritten.
    pub fn init_ledger<C: StateStub + ?Sized>(&self, ctx: &mut C) -> Result<()> {
        for user in seed_users() {
            write_record(ctx, &user)?;
        }
        debug!(tx_id = ctx.tx_id(), "seeded ledger with sample participants");
        Ok(())
    }

    /// Register a new active participant.
    ///
    /// The role is stored verbatim; values outside the well-known four are
    /// accepted.
    pub fn create_user<C: StateStub + ?Sized>(&self, ctx: &mut C, user: NewUser) -> Result<User> {
        ensure_absent::<User, C>(ctx, &user.id)?;

        let user = user.into_user();
        write_record(ctx, &user)?;
        debug!(user_id = %user.id, role = %user.role, "registered user");
        Ok(user)
    }

    pub fn user_exists<C: StateStub + ?Sized>(&self, ctx: &C, user_id: &str) -> Result<bool> {
        record_exists::<User, C>(ctx, user_id)
    }

    /// Fetch a participant, failing with `NotFound` if unregistered.
    pub fn get_user<C: StateStub + ?Sized>(&self, ctx: &C, user_id: &str) -> Result<User> {
        load_record(ctx, user_id)
    }
}
