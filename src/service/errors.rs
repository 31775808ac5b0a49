//! Service error taxonomy
//!
//! Every variant names the offending field or id; there is no opaque
//! catch-all. Single-record operations fail fast with the first error;
//! bulk operations skip-and-log instead of escalating per-item failures.

use thiserror::Error;

use crate::record::CodecError;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the hash record service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller input is structurally or semantically wrong
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Attempted creation of an id that already exists
    #[error("hash record with id '{id}' already exists")]
    Conflict { id: String },

    /// Point lookup for a nonexistent id
    #[error("hash record with id '{id}' does not exist")]
    NotFound { id: String },

    /// The external store failed; `target` is the id or filter being served
    #[error("{operation} failed for '{target}': {source}")]
    Store {
        operation: &'static str,
        target: String,
        #[source]
        source: StoreError,
    },

    /// A stored value could not be encoded or decoded on a single-record path
    #[error("{operation} failed for '{target}': {source}")]
    Codec {
        operation: &'static str,
        target: String,
        #[source]
        source: CodecError,
    },
}

impl ServiceError {
    pub(crate) fn store(operation: &'static str, target: impl Into<String>, source: StoreError) -> Self {
        ServiceError::Store {
            operation,
            target: target.into(),
            source,
        }
    }

    pub(crate) fn codec(operation: &'static str, target: impl Into<String>, source: CodecError) -> Self {
        ServiceError::Codec {
            operation,
            target: target.into(),
            source,
        }
    }

    /// Returns true for the conflict variant (write-once violation)
    pub fn is_conflict(&self) -> bool {
        matches!(self, ServiceError::Conflict { .. })
    }

    /// Returns true for the not-found variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }
}
