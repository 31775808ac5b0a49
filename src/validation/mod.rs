//! Input validation for hash record creation and queries
//!
//! Validation is pure and deterministic: same inputs, same verdict, no side
//! effects. Rules are evaluated in a fixed order and the first failure wins,
//! naming exactly one offending field.

mod errors;
mod validator;

pub use errors::{ValidationError, ValidationResult};
pub use validator::{
    parse_timestamp, validate_create, validate_device_id, validate_hash_value, validate_id,
    ValidInput,
};
