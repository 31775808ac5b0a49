//! Field-scoped validation failures

use thiserror::Error;

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A rejection naming exactly one offending field and the reason.
///
/// Surfaced to the invoker verbatim; never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation error in field '{field}': {reason}")]
pub struct ValidationError {
    field: String,
    reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending field
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Human-readable reason for the rejection
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field_and_reason() {
        let err = ValidationError::new("hashValue", "must be a 64-character hex string");
        let display = format!("{}", err);
        assert_eq!(
            display,
            "validation error in field 'hashValue': must be a 64-character hex string"
        );
    }

    #[test]
    fn test_accessors() {
        let err = ValidationError::new("id", "cannot be empty");
        assert_eq!(err.field(), "id");
        assert_eq!(err.reason(), "cannot be empty");
    }
}
