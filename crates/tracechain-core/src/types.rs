//! Enumerations shared across the data model.
//!
//! Roles and statuses are open sets on the wire: a known name decodes to its
//! variant, anything else is kept verbatim in `Other` so that every stored
//! record round-trips. History actions are a closed set.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value outside the known set, kept verbatim.
            Other(String),
        }

        impl $name {
            /// The wire name of this value.
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => stringify!($variant), )+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $( stringify!($variant) => $name::$variant, )+
                    _ => $name::Other(s),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                match value {
                    $name::Other(s) => s,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name::from(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum! {
    /// A participant's fixed category in the supply chain.
    ///
    /// Registration does not validate the role, so unknown strings survive as
    /// [`Role::Other`].
    pub enum Role {
        Manufacturer,
        Distributor,
        Retailer,
        Consumer,
    }
}

open_enum! {
    /// Custody status of a product.
    ///
    /// Transfers only ever produce the known variants; an explicit status
    /// update may set any string.
    pub enum ProductStatus {
        Created,
        InTransit,
        Delivered,
        Sold,
    }
}

open_enum! {
    /// Status of a purchase order. Free-form; no transition graph.
    pub enum OrderStatus {
        Pending,
        Confirmed,
        Shipped,
        Delivered,
        Completed,
        Cancelled,
    }
}

impl ProductStatus {
    /// Status a product takes on when custody passes to a holder of `role`.
    ///
    /// Defaults to `InTransit`; retailers receive it as `Delivered` and
    /// consumers as `Sold`.
    pub fn for_custodian(role: &Role) -> Self {
        match role {
            Role::Distributor => ProductStatus::InTransit,
            Role::Retailer => ProductStatus::Delivered,
            Role::Consumer => ProductStatus::Sold,
            _ => ProductStatus::InTransit,
        }
    }
}

/// The kind of event recorded in a product's audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryAction {
    Created,
    Transferred,
    StatusUpdate,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Created => "Created",
            HistoryAction::Transferred => "Transferred",
            HistoryAction::StatusUpdate => "StatusUpdate",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three entity tables stored in world state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Product,
    Order,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Product => "product",
            EntityKind::Order => "order",
        };
        f.write_str(name)
    }
}
