//! Filter translation and query execution
//!
//! Each domain filter becomes a [`Selector`]; execution drives a
//! forward-only cursor, decodes each entry leniently, and materializes the
//! surviving records eagerly. One malformed stored entry is logged and
//! dropped, never failing the whole query.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use crate::observability::{Event, LogSink, Severity};
use crate::record::{decode_lenient, DataType, HashRecord, LenientDecode};
use crate::service::{ServiceError, ServiceResult};
use crate::store::{StateCursor, StateStore, StoreError};
use crate::query::{Predicate, Selector};

fn rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Exact match on the originating device
pub fn selector_by_device(device_id: &str) -> Selector {
    Selector::new().with_predicate(Predicate::eq("DeviceID", json!(device_id)))
}

/// Exact match on the lowercase data type wire form
pub fn selector_by_data_type(data_type: DataType) -> Selector {
    Selector::new().with_predicate(Predicate::eq("DataType", json!(data_type.as_str())))
}

/// Inclusive timestamp range; an inverted range simply matches nothing
pub fn selector_by_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Selector {
    Selector::new()
        .with_predicate(Predicate::gte("Timestamp", json!(rfc3339(start))))
        .with_predicate(Predicate::lte("Timestamp", json!(rfc3339(end))))
}

/// Runs a selector query for `target` and materializes the results.
pub fn query_by_device<S: StateStore>(
    store: &S,
    sink: &dyn LogSink,
    device_id: &str,
) -> ServiceResult<Vec<HashRecord>> {
    run_selector(store, sink, &selector_by_device(device_id), device_id)
}

pub fn query_by_data_type<S: StateStore>(
    store: &S,
    sink: &dyn LogSink,
    data_type: DataType,
) -> ServiceResult<Vec<HashRecord>> {
    run_selector(
        store,
        sink,
        &selector_by_data_type(data_type),
        data_type.as_str(),
    )
}

pub fn query_by_time_range<S: StateStore>(
    store: &S,
    sink: &dyn LogSink,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ServiceResult<Vec<HashRecord>> {
    let target = format!("{}..{}", rfc3339(start), rfc3339(end));
    run_selector(store, sink, &selector_by_time_range(start, end), &target)
}

/// Unconditional full scan. Expensive on large states; diagnostic use only.
pub fn query_all<S: StateStore>(store: &S, sink: &dyn LogSink) -> ServiceResult<Vec<HashRecord>> {
    sink.log(Severity::Info, Event::QueryBegin.as_str(), &[("filter", "all")]);

    let cursor = store
        .scan("", "")
        .map_err(|source| ServiceError::store("scan", "*", source))?;
    let records = collect(cursor, sink, "*")?;

    sink.log(
        Severity::Info,
        Event::QueryComplete.as_str(),
        &[("filter", "all"), ("results", &records.len().to_string())],
    );
    Ok(records)
}

fn run_selector<S: StateStore>(
    store: &S,
    sink: &dyn LogSink,
    selector: &Selector,
    target: &str,
) -> ServiceResult<Vec<HashRecord>> {
    sink.log(Severity::Info, Event::QueryBegin.as_str(), &[("filter", target)]);

    let cursor = store
        .query(selector)
        .map_err(|source| ServiceError::store("query", target, source))?;
    let records = collect(cursor, sink, target)?;

    sink.log(
        Severity::Info,
        Event::QueryComplete.as_str(),
        &[("filter", target), ("results", &records.len().to_string())],
    );
    Ok(records)
}

/// Drains a cursor, dropping entries that fail the lenient decode.
fn collect(
    mut cursor: Box<dyn StateCursor + '_>,
    sink: &dyn LogSink,
    target: &str,
) -> ServiceResult<Vec<HashRecord>> {
    let mut records = Vec::new();
    loop {
        let entry = cursor
            .next_entry()
            .map_err(|source: StoreError| ServiceError::store("query", target, source))?;
        let (key, bytes) = match entry {
            Some(entry) => entry,
            None => break,
        };

        match decode_lenient(&bytes) {
            LenientDecode::Record(record) => records.push(record),
            LenientDecode::Skip(err) => {
                sink.log(
                    Severity::Warn,
                    Event::RecordSkipped.as_str(),
                    &[("key", &key), ("reason", &err.to_string())],
                );
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::NullSink;
    use crate::record::encode;
    use chrono::TimeZone;

    fn record(id: &str, device: &str, data_type: DataType, ts: DateTime<Utc>) -> HashRecord {
        HashRecord::new(id, "c".repeat(64), ts, device, data_type, ts)
    }

    fn seeded_store() -> crate::store::MemoryStore {
        let mut store = crate::store::MemoryStore::new();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 2, 20, 8, 0, 0).unwrap();

        for rec in [
            record("r1", "meter-001", DataType::Consumption, t1),
            record("r2", "meter-002", DataType::Production, t2),
            record("r3", "meter-001", DataType::Production, t2),
        ] {
            store.put(&rec.id, encode(&rec).unwrap()).unwrap();
        }
        store
    }

    #[test]
    fn test_selector_by_device_document() {
        assert_eq!(
            selector_by_device("meter-001").to_document(),
            serde_json::json!({"selector": {"DeviceID": "meter-001"}})
        );
    }

    #[test]
    fn test_selector_by_data_type_is_lowercase() {
        assert_eq!(
            selector_by_data_type(DataType::Transmission).to_document(),
            serde_json::json!({"selector": {"DataType": "transmission"}})
        );
    }

    #[test]
    fn test_selector_by_time_range_document() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            selector_by_time_range(start, end).to_document(),
            serde_json::json!({"selector": {"Timestamp": {
                "$gte": "2024-01-01T00:00:00Z",
                "$lte": "2024-12-31T23:59:59Z"
            }}})
        );
    }

    #[test]
    fn test_query_by_device_returns_matching_set() {
        let store = seeded_store();
        let results = query_by_device(&store, &NullSink, "meter-001").unwrap();
        let mut ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["r1", "r3"]);
    }

    #[test]
    fn test_query_all_sees_everything() {
        let store = seeded_store();
        assert_eq!(query_all(&store, &NullSink).unwrap().len(), 3);
    }

    #[test]
    fn test_malformed_entry_dropped_not_fatal() {
        let mut store = seeded_store();
        // Valid JSON document that matches the selector but is not a record
        store
            .put("broken", br#"{"DeviceID": "meter-001", "ID": 5}"#.to_vec())
            .unwrap();

        let sink = crate::observability::CaptureSink::new();
        let results = query_by_device(&store, &sink, "meter-001").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(sink.count_event(Event::RecordSkipped.as_str()), 1);
    }
}
