//! Data type classification for hash records
//!
//! A closed set; one case-insensitive parse function is the only entry
//! point, applied uniformly at creation and at every query filter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Kind of energy data a record's hash covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Consumption,
    Production,
    Storage,
    Transmission,
}

impl DataType {
    /// The lowercase wire form, as persisted and as used in selectors
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Consumption => "consumption",
            DataType::Production => "production",
            DataType::Storage => "storage",
            DataType::Transmission => "transmission",
        }
    }

    /// Parses a caller-supplied data type, case-insensitively.
    ///
    /// Rejections are field-scoped to `dataType`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.to_ascii_lowercase().as_str() {
            "consumption" => Ok(DataType::Consumption),
            "production" => Ok(DataType::Production),
            "storage" => Ok(DataType::Storage),
            "transmission" => Ok(DataType::Transmission),
            _ => Err(ValidationError::new(
                "dataType",
                "must be one of: consumption, production, storage, transmission",
            )),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercase() {
        assert_eq!(DataType::parse("consumption").unwrap(), DataType::Consumption);
        assert_eq!(DataType::parse("production").unwrap(), DataType::Production);
        assert_eq!(DataType::parse("storage").unwrap(), DataType::Storage);
        assert_eq!(DataType::parse("transmission").unwrap(), DataType::Transmission);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(DataType::parse("Consumption").unwrap(), DataType::Consumption);
        assert_eq!(DataType::parse("PRODUCTION").unwrap(), DataType::Production);
        assert_eq!(DataType::parse("StOrAgE").unwrap(), DataType::Storage);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = DataType::parse("generation").unwrap_err();
        assert_eq!(err.field(), "dataType");

        assert!(DataType::parse("").is_err());
        assert!(DataType::parse("consumption ").is_err());
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&DataType::Transmission).unwrap();
        assert_eq!(json, "\"transmission\"");
    }

    #[test]
    fn test_display_matches_wire_form() {
        assert_eq!(DataType::Consumption.to_string(), "consumption");
    }
}
