//! Codec error types

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Failures mapping a record to or from its persisted document form
#[derive(Debug, Error)]
pub enum CodecError {
    /// The record could not be rendered as a document
    #[error("failed to encode hash record: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored bytes are not a well-formed record document
    #[error("failed to decode hash record: {0}")]
    Decode(#[source] serde_json::Error),
}
