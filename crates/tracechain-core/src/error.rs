//! Error types for the Tracechain core.

use thiserror::Error;

use crate::types::EntityKind;

/// Errors raised while encoding or decoding world-state records.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode {kind} record: {source}")]
    Encode {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {kind} record: {source}")]
    Decode {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode query payload: {0}")]
    Payload(#[source] serde_json::Error),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
