//! World-state key layout.
//!
//! Users, products and orders share one flat key space and are separated by
//! string prefixes. A namespace scan runs from `<prefix>` (inclusive) to
//! `<prefix>~` (exclusive); `~` sorts after every ASCII character normally
//! used in ids. Existing stored data depends on this exact layout.

use crate::types::EntityKind;

/// Upper-bound sentinel appended to a prefix for namespace scans.
pub const RANGE_SENTINEL: char = '~';

/// A logical table inside the flat key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    User,
    Product,
    Order,
}

impl Namespace {
    /// The key prefix, including the trailing underscore.
    pub const fn prefix(self) -> &'static str {
        match self {
            Namespace::User => "USER_",
            Namespace::Product => "PRODUCT_",
            Namespace::Order => "ORDER_",
        }
    }

    /// World-state key for the record with the given id.
    pub fn key(self, id: &str) -> String {
        let prefix = self.prefix();
        let mut key = String::with_capacity(prefix.len() + id.len());
        key.push_str(prefix);
        key.push_str(id);
        key
    }

    /// `(start, end)` bounds covering the whole namespace; `end` is exclusive.
    pub fn range(self) -> (String, String) {
        let start = self.prefix().to_string();
        let mut end = start.clone();
        end.push(RANGE_SENTINEL);
        (start, end)
    }
}

impl From<EntityKind> for Namespace {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::User => Namespace::User,
            EntityKind::Product => Namespace::Product,
            EntityKind::Order => Namespace::Order,
        }
    }
}
