//! In-process reference state store
//!
//! Backs the test suites and doubles as executable documentation of the
//! collaborator contract. Keys are held in a `BTreeMap` so scans are
//! ordered; the query facility parses each value as a JSON document and
//! evaluates the selector against it, the way an index-backed store would.

use std::collections::BTreeMap;
use std::ops::Bound;

use serde_json::Value;

use super::{Entry, StateCursor, StateStore, StoreResult};
use crate::query::Selector;

/// Ordered in-memory world state
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Raw stored bytes under `key`, without going through a cursor
    pub fn raw(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.state.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.state.insert(key.to_string(), value);
        Ok(())
    }

    fn scan(&self, start: &str, end: &str) -> StoreResult<Box<dyn StateCursor + '_>> {
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };

        let entries: Vec<Entry> = self
            .state
            .range((lower, upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(VecCursor::new(entries)))
    }

    fn query(&self, selector: &Selector) -> StoreResult<Box<dyn StateCursor + '_>> {
        let entries: Vec<Entry> = self
            .state
            .iter()
            .filter(|(_, bytes)| {
                // Values that are not JSON documents are invisible to the
                // rich-query index, matching index-backed store behavior
                match serde_json::from_slice::<Value>(bytes) {
                    Ok(doc) => selector.matches(&doc),
                    Err(_) => false,
                }
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(VecCursor::new(entries)))
    }
}

/// Cursor over a materialized entry list
struct VecCursor {
    entries: std::vec::IntoIter<Entry>,
}

impl VecCursor {
    fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl StateCursor for VecCursor {
    fn next_entry(&mut self) -> StoreResult<Option<Entry>> {
        Ok(self.entries.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Predicate;
    use serde_json::json;

    fn drain(mut cursor: Box<dyn StateCursor + '_>) -> Vec<Entry> {
        let mut out = Vec::new();
        while let Some(entry) = cursor.next_entry().unwrap() {
            out.push(entry);
        }
        out
    }

    #[test]
    fn test_get_absent_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_put_then_get() {
        let mut store = MemoryStore::new();
        store.put("k1", b"v1".to_vec()).unwrap();
        assert_eq!(store.get("k1").unwrap(), Some(b"v1".to_vec()));
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = MemoryStore::new();
        store.put("k1", b"old".to_vec()).unwrap();
        store.put("k1", b"new".to_vec()).unwrap();
        assert_eq!(store.get("k1").unwrap(), Some(b"new".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_scan_is_ordered() {
        let mut store = MemoryStore::new();
        store.put("c", b"3".to_vec()).unwrap();
        store.put("a", b"1".to_vec()).unwrap();
        store.put("b", b"2".to_vec()).unwrap();

        let keys: Vec<String> = drain(store.scan("", "").unwrap())
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_scan_bounds_end_exclusive() {
        let mut store = MemoryStore::new();
        for key in ["a", "b", "c", "d"] {
            store.put(key, b"x".to_vec()).unwrap();
        }

        let keys: Vec<String> = drain(store.scan("b", "d").unwrap())
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_query_filters_by_selector() {
        let mut store = MemoryStore::new();
        store
            .put("r1", br#"{"DeviceID": "meter-001"}"#.to_vec())
            .unwrap();
        store
            .put("r2", br#"{"DeviceID": "meter-002"}"#.to_vec())
            .unwrap();

        let selector =
            Selector::new().with_predicate(Predicate::eq("DeviceID", json!("meter-001")));
        let entries = drain(store.query(&selector).unwrap());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "r1");
    }

    #[test]
    fn test_query_skips_non_document_values() {
        let mut store = MemoryStore::new();
        store.put("bad", b"\x00not json".to_vec()).unwrap();
        store
            .put("good", br#"{"DeviceID": "meter-001"}"#.to_vec())
            .unwrap();

        let selector =
            Selector::new().with_predicate(Predicate::eq("DeviceID", json!("meter-001")));
        let entries = drain(store.query(&selector).unwrap());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "good");
    }
}
