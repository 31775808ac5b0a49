//! Record lifecycle operations
//!
//! Create is the only write path: validate, check existence, stamp
//! `CreatedAt`, encode, persist. The check-then-write sequence is not atomic
//! at this layer; racing writers on the same id are resolved by the
//! enclosing ledger's conflict detection at commit time.

use chrono::Utc;

use super::errors::{ServiceError, ServiceResult};
use crate::observability::{Event, JsonLogger, LogSink, Severity};
use crate::query;
use crate::record::{decode, encode, DataType, HashRecord};
use crate::store::StateStore;
use crate::validation::{parse_timestamp, validate_create, validate_device_id, ValidationError};

/// Stateless record-lifecycle and query operations over an external store.
///
/// Holds the store handle for the current transaction plus an injected log
/// sink; it keeps no other state between calls.
pub struct HashRecordService<S: StateStore> {
    store: S,
    sink: Box<dyn LogSink>,
}

impl<S: StateStore> HashRecordService<S> {
    /// Service logging to stdout as JSON lines
    pub fn new(store: S) -> Self {
        Self::with_sink(store, Box::new(JsonLogger::stdout()))
    }

    /// Service with a caller-supplied log sink
    pub fn with_sink(store: S, sink: Box<dyn LogSink>) -> Self {
        Self { store, sink }
    }

    /// The underlying store, for callers that own the transaction boundary
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Records a new hash under `id`.
    ///
    /// Fails with a field-scoped validation error before any store access,
    /// and with [`ServiceError::Conflict`] if the id is already taken. On
    /// success the persisted record carries a service-stamped `CreatedAt`.
    pub fn create(
        &mut self,
        id: &str,
        hash_value: &str,
        timestamp: &str,
        device_id: &str,
        data_type: &str,
    ) -> ServiceResult<()> {
        self.sink.log(
            Severity::Info,
            Event::CreateBegin.as_str(),
            &[("id", id), ("deviceID", device_id), ("dataType", data_type)],
        );

        let input = match validate_create(id, hash_value, timestamp, device_id, data_type) {
            Ok(input) => input,
            Err(err) => {
                self.reject(id, &err);
                return Err(err.into());
            }
        };

        if self.exists(&input.id)? {
            let err = ServiceError::Conflict {
                id: input.id.clone(),
            };
            self.sink.log(
                Severity::Warn,
                Event::CreateRejected.as_str(),
                &[("id", &input.id), ("reason", &err.to_string())],
            );
            return Err(err);
        }

        let record = HashRecord::new(
            input.id.clone(),
            input.hash_value,
            input.timestamp,
            input.device_id,
            input.data_type,
            Utc::now(),
        );

        let bytes = encode(&record)
            .map_err(|source| ServiceError::codec("create", input.id.as_str(), source))?;
        self.store
            .put(&input.id, bytes)
            .map_err(|source| ServiceError::store("create", input.id.as_str(), source))?;

        self.sink
            .log(Severity::Info, Event::CreateComplete.as_str(), &[("id", &input.id)]);
        Ok(())
    }

    /// Legacy create without a data type; defaults to `consumption`.
    ///
    /// Kept for older callers; new callers should pass the type explicitly.
    pub fn create_with_default_type(
        &mut self,
        id: &str,
        hash_value: &str,
        timestamp: &str,
        device_id: &str,
    ) -> ServiceResult<()> {
        self.create(
            id,
            hash_value,
            timestamp,
            device_id,
            DataType::Consumption.as_str(),
        )
    }

    /// Point lookup by id.
    ///
    /// An absent key is [`ServiceError::NotFound`], distinct from store
    /// failures; a value that will not decode is a hard failure here.
    pub fn read(&self, id: &str) -> ServiceResult<HashRecord> {
        if id.trim().is_empty() {
            return Err(ValidationError::new("id", "cannot be empty").into());
        }

        let bytes = self
            .store
            .get(id)
            .map_err(|source| ServiceError::store("read", id, source))?;
        let bytes = match bytes {
            Some(bytes) => bytes,
            None => {
                self.sink
                    .log(Severity::Info, Event::ReadMissing.as_str(), &[("id", id)]);
                return Err(ServiceError::NotFound { id: id.to_string() });
            }
        };

        let record = decode(&bytes).map_err(|source| ServiceError::codec("read", id, source))?;
        self.sink
            .log(Severity::Info, Event::ReadComplete.as_str(), &[("id", id)]);
        Ok(record)
    }

    /// Whether a record exists under `id`.
    pub fn exists(&self, id: &str) -> ServiceResult<bool> {
        if id.trim().is_empty() {
            return Err(ValidationError::new("id", "cannot be empty").into());
        }

        let present = self
            .store
            .get(id)
            .map_err(|source| ServiceError::store("exists", id, source))?
            .is_some();

        self.sink.log(
            Severity::Trace,
            Event::ExistsChecked.as_str(),
            &[("id", id), ("exists", if present { "true" } else { "false" })],
        );
        Ok(present)
    }

    /// All records whose `DeviceID` equals `device_id`.
    pub fn get_by_device(&self, device_id: &str) -> ServiceResult<Vec<HashRecord>> {
        validate_device_id(device_id)?;
        query::query_by_device(&self.store, self.sink.as_ref(), device_id)
    }

    /// All records of the given data type; the type name is validated and
    /// normalized before the query runs.
    pub fn get_by_data_type(&self, data_type: &str) -> ServiceResult<Vec<HashRecord>> {
        let parsed = DataType::parse(data_type)?;
        query::query_by_data_type(&self.store, self.sink.as_ref(), parsed)
    }

    /// All records whose `Timestamp` lies in `[start, end]`, bounds inclusive.
    ///
    /// Each malformed bound is rejected against its own field name before
    /// any query executes. An inverted range yields an empty result.
    pub fn get_by_time_range(&self, start: &str, end: &str) -> ServiceResult<Vec<HashRecord>> {
        let start = parse_timestamp(start, "startTime")?;
        let end = parse_timestamp(end, "endTime")?;
        query::query_by_time_range(&self.store, self.sink.as_ref(), start, end)
    }

    /// Every record in the store. Expensive on large states; diagnostic use.
    pub fn get_all(&self) -> ServiceResult<Vec<HashRecord>> {
        query::query_all(&self.store, self.sink.as_ref())
    }

    /// Number of records of the given data type; costs a full type query.
    pub fn count_by_data_type(&self, data_type: &str) -> ServiceResult<usize> {
        Ok(self.get_by_data_type(data_type)?.len())
    }

    /// Number of records in the inclusive time range; costs a full range query.
    pub fn count_by_time_range(&self, start: &str, end: &str) -> ServiceResult<usize> {
        Ok(self.get_by_time_range(start, end)?.len())
    }

    pub(super) fn sink(&self) -> &dyn LogSink {
        self.sink.as_ref()
    }

    fn reject(&self, id: &str, err: &ValidationError) {
        self.sink.log(
            Severity::Warn,
            Event::CreateRejected.as_str(),
            &[("id", id), ("reason", &err.to_string())],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::NullSink;
    use crate::store::MemoryStore;

    const HASH: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn service() -> HashRecordService<MemoryStore> {
        HashRecordService::with_sink(MemoryStore::new(), Box::new(NullSink))
    }

    #[test]
    fn test_create_then_exists() {
        let mut svc = service();
        svc.create("k1", HASH, "2024-01-15T10:30:00Z", "meter-001", "consumption")
            .unwrap();
        assert!(svc.exists("k1").unwrap());
        assert!(!svc.exists("k2").unwrap());
    }

    #[test]
    fn test_create_rejects_bad_hash_before_store_write() {
        let mut svc = service();
        let err = svc
            .create("k1", "zz", "2024-01-15T10:30:00Z", "meter-001", "consumption")
            .unwrap_err();
        match err {
            ServiceError::Validation(v) => assert_eq!(v.field(), "hashValue"),
            other => panic!("expected validation error, got {}", other),
        }
        assert!(svc.store().is_empty());
    }

    #[test]
    fn test_duplicate_create_conflicts() {
        let mut svc = service();
        svc.create("k1", HASH, "2024-01-15T10:30:00Z", "meter-001", "consumption")
            .unwrap();
        let err = svc
            .create("k1", HASH, "2024-01-16T10:30:00Z", "meter-002", "production")
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_read_round_trip() {
        let mut svc = service();
        svc.create("k1", HASH, "2024-01-15T10:30:00Z", "meter-001", "production")
            .unwrap();

        let record = svc.read("k1").unwrap();
        assert_eq!(record.id, "k1");
        assert_eq!(record.hash_value, HASH);
        assert_eq!(record.device_id, "meter-001");
        assert_eq!(record.data_type, DataType::Production);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let svc = service();
        assert!(svc.read("ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn test_read_empty_id_is_validation_error() {
        let svc = service();
        match svc.read("  ").unwrap_err() {
            ServiceError::Validation(v) => assert_eq!(v.field(), "id"),
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_legacy_create_defaults_to_consumption() {
        let mut svc = service();
        svc.create_with_default_type("k1", HASH, "2024-01-15T10:30:00Z", "meter-001")
            .unwrap();
        assert_eq!(svc.read("k1").unwrap().data_type, DataType::Consumption);
    }
}
