//! Field validators for record creation
//!
//! Rule order: id, hashValue, timestamp, deviceID, dataType. The first
//! failure wins; failures are never aggregated. Successful validation
//! returns the normalized input so later stages never re-parse.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::errors::{ValidationError, ValidationResult};
use crate::record::DataType;

/// Maximum length of a record id
const MAX_ID_LEN: usize = 64;

fn hash_value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[a-fA-F0-9]{64}$").unwrap())
}

fn device_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[A-Za-z0-9_-]{1,32}$").unwrap())
}

/// Normalized creation input produced by [`validate_create`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidInput {
    pub id: String,
    pub hash_value: String,
    pub timestamp: DateTime<Utc>,
    pub device_id: String,
    pub data_type: DataType,
}

/// Validates all creation fields in rule order and normalizes them.
pub fn validate_create(
    id: &str,
    hash_value: &str,
    timestamp: &str,
    device_id: &str,
    data_type: &str,
) -> ValidationResult<ValidInput> {
    validate_id(id)?;
    validate_hash_value(hash_value)?;
    let parsed_timestamp = parse_timestamp(timestamp, "timestamp")?;
    validate_device_id(device_id)?;
    let parsed_data_type = DataType::parse(data_type)?;

    Ok(ValidInput {
        id: id.to_string(),
        hash_value: hash_value.to_string(),
        timestamp: parsed_timestamp,
        device_id: device_id.to_string(),
        data_type: parsed_data_type,
    })
}

/// Rule 1: id must be non-blank and at most 64 characters.
pub fn validate_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::new("id", "cannot be empty"));
    }
    if id.chars().count() > MAX_ID_LEN {
        return Err(ValidationError::new("id", "must be 64 characters or less"));
    }
    Ok(())
}

/// Rule 2: hashValue must be a 64-character hex string (SHA-256 digest).
pub fn validate_hash_value(hash_value: &str) -> ValidationResult<()> {
    if !hash_value_pattern().is_match(hash_value) {
        return Err(ValidationError::new(
            "hashValue",
            "must be a valid 64-character hex string (SHA256)",
        ));
    }
    Ok(())
}

/// Rule 3: timestamps must be RFC 3339 with offset.
///
/// The same parse backs the `timestamp` creation field and the
/// `startTime`/`endTime` query bounds; `field` scopes the rejection.
pub fn parse_timestamp(input: &str, field: &str) -> ValidationResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| {
            ValidationError::new(
                field,
                "must be in RFC3339 format (e.g., 2024-01-15T10:30:00Z)",
            )
        })
}

/// Rule 4: deviceID must be non-blank, alphanumeric plus hyphen/underscore,
/// 1-32 characters.
pub fn validate_device_id(device_id: &str) -> ValidationResult<()> {
    if device_id.trim().is_empty() {
        return Err(ValidationError::new("deviceID", "cannot be empty"));
    }
    if !device_id_pattern().is_match(device_id) {
        return Err(ValidationError::new(
            "deviceID",
            "must contain only alphanumeric characters, hyphens, and underscores (1-32 chars)",
        ));
    }
    Ok(())
}
