//! Batch creation
//!
//! A batch is a JSON array of string-valued objects. Items are processed in
//! array order; an item missing required keys is skipped outright, an item
//! that fails creation is logged and skipped, and neither aborts the batch
//! or rolls back earlier successes. Only a malformed payload fails whole.

use std::collections::HashMap;

use super::errors::ServiceResult;
use super::lifecycle::HashRecordService;
use crate::observability::{Event, Severity};
use crate::store::StateStore;
use crate::validation::ValidationError;

/// The keys every batch item must carry
const REQUIRED_KEYS: [&str; 5] = ["id", "hashValue", "timestamp", "deviceID", "dataType"];

impl<S: StateStore> HashRecordService<S> {
    /// Creates records from a JSON array payload; returns the success count.
    ///
    /// The payload must parse as an array of objects with string values,
    /// otherwise the whole batch fails before any item is attempted.
    pub fn create_batch(&mut self, payload: &str) -> ServiceResult<usize> {
        let batch: Vec<HashMap<String, String>> = serde_json::from_str(payload)
            .map_err(|err| {
                ValidationError::new("batch", format!("invalid batch data format: {}", err))
            })?;

        self.sink().log(
            Severity::Info,
            Event::BatchBegin.as_str(),
            &[("items", &batch.len().to_string())],
        );

        let submitted = batch.len();
        let mut succeeded = 0usize;
        for (index, item) in batch.iter().enumerate() {
            if REQUIRED_KEYS.iter().any(|key| !item.contains_key(*key)) {
                self.sink().log(
                    Severity::Warn,
                    Event::BatchItemSkipped.as_str(),
                    &[
                        ("index", &index.to_string()),
                        ("reason", "missing required fields"),
                    ],
                );
                continue;
            }

            let id = &item["id"];
            if let Err(err) = self.create(
                id,
                &item["hashValue"],
                &item["timestamp"],
                &item["deviceID"],
                &item["dataType"],
            ) {
                self.sink().log(
                    Severity::Warn,
                    Event::BatchItemFailed.as_str(),
                    &[
                        ("index", &index.to_string()),
                        ("id", id),
                        ("reason", &err.to_string()),
                    ],
                );
                continue;
            }

            succeeded += 1;
        }

        self.sink().log(
            Severity::Info,
            Event::BatchComplete.as_str(),
            &[
                ("submitted", &submitted.to_string()),
                ("succeeded", &succeeded.to_string()),
            ],
        );
        Ok(succeeded)
    }
}
