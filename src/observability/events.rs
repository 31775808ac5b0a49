//! Observable events for the hash record service
//!
//! Events are explicit and typed; every log line carries exactly one of
//! these as its event name.

use std::fmt;

/// Observable events emitted by the service operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Creation
    /// Create operation received
    CreateBegin,
    /// Record persisted
    CreateComplete,
    /// Create rejected (validation or conflict)
    CreateRejected,

    // Point reads
    /// Read returned a record
    ReadComplete,
    /// Read target does not exist
    ReadMissing,
    /// Existence check performed
    ExistsChecked,

    // Queries
    /// Query received
    QueryBegin,
    /// Query executed, results materialized
    QueryComplete,
    /// Stored entry dropped during a bulk scan (lenient decode)
    RecordSkipped,

    // Batch
    /// Batch payload accepted
    BatchBegin,
    /// Batch item missing required keys
    BatchItemSkipped,
    /// Batch item failed validation or conflicted
    BatchItemFailed,
    /// Batch finished
    BatchComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::CreateBegin => "CREATE_BEGIN",
            Event::CreateComplete => "CREATE_COMPLETE",
            Event::CreateRejected => "CREATE_REJECTED",
            Event::ReadComplete => "READ_COMPLETE",
            Event::ReadMissing => "READ_MISSING",
            Event::ExistsChecked => "EXISTS_CHECKED",
            Event::QueryBegin => "QUERY_BEGIN",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::RecordSkipped => "RECORD_SKIPPED",
            Event::BatchBegin => "BATCH_BEGIN",
            Event::BatchItemSkipped => "BATCH_ITEM_SKIPPED",
            Event::BatchItemFailed => "BATCH_ITEM_FAILED",
            Event::BatchComplete => "BATCH_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::CreateBegin,
            Event::CreateComplete,
            Event::CreateRejected,
            Event::ReadComplete,
            Event::ReadMissing,
            Event::ExistsChecked,
            Event::QueryBegin,
            Event::QueryComplete,
            Event::RecordSkipped,
            Event::BatchBegin,
            Event::BatchItemSkipped,
            Event::BatchItemFailed,
            Event::BatchComplete,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            // Verify all uppercase format
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::CreateBegin), "CREATE_BEGIN");
        assert_eq!(format!("{}", Event::RecordSkipped), "RECORD_SKIPPED");
    }
}
