//! Error types for contract operations.

use thiserror::Error;
use tracechain_core::{CodecError, EntityKind};
use tracechain_store::StoreError;

/// Errors that can occur during contract operations.
///
/// Every error aborts the invocation; the host discards its write-set.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A referenced user, product or order is absent.
    #[error("{kind} {id} does not exist")]
    NotFound { kind: EntityKind, id: String },

    /// A record with this id is already registered.
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: EntityKind, id: String },

    /// Role mismatch, bad input, or a cross-referenced record failed to resolve.
    #[error("{0}")]
    ValidationFailed(String),

    /// Record or payload encoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] CodecError),

    /// World-state error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The dispatcher does not know this function name.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments, or an argument failed to parse.
    #[error("invalid arguments for {function}: {reason}")]
    InvalidArguments { function: String, reason: String },
}

impl ContractError {
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        ContractError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn already_exists(kind: EntityKind, id: &str) -> Self {
        ContractError::AlreadyExists {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContractError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, ContractError::AlreadyExists { .. })
    }

    pub fn is_validation_failed(&self) -> bool {
        matches!(self, ContractError::ValidationFailed(_))
    }
}

/// Result type for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;
