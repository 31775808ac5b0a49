//! The persisted hash record entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::data_type::DataType;

/// A content hash recorded on the ledger.
///
/// Records are write-once: no operation mutates an existing key. The field
/// names below are the persisted document's keys; optional fields are
/// omitted entirely when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashRecord {
    /// Unique key in the store, caller-supplied
    #[serde(rename = "ID")]
    pub id: String,

    /// 256-bit digest as 64 hex characters, computed by the caller
    #[serde(rename = "HashValue")]
    pub hash_value: String,

    /// Caller-asserted event time, normalized to UTC
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Originating device
    #[serde(rename = "DeviceID")]
    pub device_id: String,

    /// Actual energy reading, if the caller chose to disclose it
    #[serde(rename = "EnergyReading", skip_serializing_if = "Option::is_none")]
    pub energy_reading: Option<f64>,

    /// Device location, if supplied
    #[serde(rename = "Location", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Classification of the hashed data
    #[serde(rename = "DataType")]
    pub data_type: DataType,

    /// Ledger entry time, stamped by the service
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,

    /// Reserved for future mutation support; set by no current operation
    #[serde(rename = "UpdatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl HashRecord {
    /// Creates a record with the required fields; optional fields start absent.
    pub fn new(
        id: impl Into<String>,
        hash_value: impl Into<String>,
        timestamp: DateTime<Utc>,
        device_id: impl Into<String>,
        data_type: DataType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            hash_value: hash_value.into(),
            timestamp,
            device_id: device_id.into(),
            energy_reading: None,
            location: None,
            data_type,
            created_at,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> HashRecord {
        HashRecord::new(
            "dev-001-2024-01-15",
            "a".repeat(64),
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            "meter-001",
            DataType::Consumption,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 31, 0).unwrap(),
        )
    }

    #[test]
    fn test_persisted_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let obj = value.as_object().unwrap();

        assert!(obj.contains_key("ID"));
        assert!(obj.contains_key("HashValue"));
        assert!(obj.contains_key("Timestamp"));
        assert!(obj.contains_key("DeviceID"));
        assert!(obj.contains_key("DataType"));
        assert!(obj.contains_key("CreatedAt"));
    }

    #[test]
    fn test_absent_optionals_are_omitted() {
        let value = serde_json::to_value(sample()).unwrap();
        let obj = value.as_object().unwrap();

        assert!(!obj.contains_key("EnergyReading"));
        assert!(!obj.contains_key("Location"));
        assert!(!obj.contains_key("UpdatedAt"));
    }

    #[test]
    fn test_present_optionals_are_encoded() {
        let mut record = sample();
        record.energy_reading = Some(12.5);
        record.location = Some("building-7".into());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["EnergyReading"], 12.5);
        assert_eq!(value["Location"], "building-7");
    }
}
