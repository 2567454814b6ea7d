//! Record encoding for world state.
//!
//! Every entity is stored as a field-named JSON object. Field order follows
//! the struct definition, so encoding is deterministic: the same record
//! always produces the same bytes on every replica, and bytes produced here
//! decode and re-encode to themselves. Floats use exact round-trip parsing.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, Result};
use crate::keys::Namespace;
use crate::order::Order;
use crate::product::Product;
use crate::types::EntityKind;
use crate::user::User;

/// An entity stored under its own key in world state.
pub trait Record: Serialize + DeserializeOwned {
    /// Which table the record lives in.
    const KIND: EntityKind;

    /// The record's unique id within its table.
    fn id(&self) -> &str;

    /// The namespace holding records of this type.
    fn namespace() -> Namespace {
        Namespace::from(Self::KIND)
    }

    /// The world-state key for this record.
    fn key(&self) -> String {
        Self::namespace().key(self.id())
    }
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Order {
    const KIND: EntityKind = EntityKind::Order;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Encode a record to its stored bytes.
pub fn encode<R: Record>(record: &R) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|source| CodecError::Encode {
        kind: R::KIND,
        source,
    })
}

/// Decode stored bytes into a record.
pub fn decode<R: Record>(bytes: &[u8]) -> Result<R> {
    serde_json::from_slice(bytes).map_err(|source| CodecError::Decode {
        kind: R::KIND,
        source,
    })
}

/// Encode a query result (a record, a list of records, a flag) for return
/// to the caller.
pub fn encode_payload<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(CodecError::Payload)
}
