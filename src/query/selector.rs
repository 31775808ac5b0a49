//! Typed selector expressions
//!
//! A [`Selector`] is a conjunction of field predicates. It serializes to the
//! store's rich-query document format (`{"selector": {...}}`) and can also
//! evaluate itself against a JSON document, so translation and matching stay
//! testable without a store.

use chrono::DateTime;
use serde_json::{json, Map, Value};

/// Filter operation types
///
/// Equality and the two inclusive range comparisons are the only operators
/// the service ever emits.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Equality: field = value
    Eq(Value),
    /// Greater than or equal: field >= value
    Gte(Value),
    /// Less than or equal: field <= value
    Lte(Value),
}

impl FilterOp {
    /// Returns true if this is an equality operation
    pub fn is_equality(&self) -> bool {
        matches!(self, FilterOp::Eq(_))
    }

    /// Returns the selector operator name for range operations
    fn range_key(&self) -> Option<&'static str> {
        match self {
            FilterOp::Eq(_) => None,
            FilterOp::Gte(_) => Some("$gte"),
            FilterOp::Lte(_) => Some("$lte"),
        }
    }

    fn value(&self) -> &Value {
        match self {
            FilterOp::Eq(v) | FilterOp::Gte(v) | FilterOp::Lte(v) => v,
        }
    }
}

/// A single predicate (field + operation)
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Field name in the persisted document
    pub field: String,
    /// Filter operation
    pub op: FilterOp,
}

impl Predicate {
    /// Create an equality predicate
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq(value),
        }
    }

    /// Create an inclusive lower-bound predicate
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Gte(value),
        }
    }

    /// Create an inclusive upper-bound predicate
    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Lte(value),
        }
    }

    /// Checks whether a document satisfies this predicate.
    ///
    /// A missing or null field never matches. Equality is exact, with no
    /// type coercion.
    pub fn matches(&self, document: &Value) -> bool {
        let field_value = match document.get(&self.field) {
            Some(v) => v,
            None => return false,
        };
        if field_value.is_null() {
            return false;
        }

        match &self.op {
            FilterOp::Eq(expected) => field_value == expected,
            FilterOp::Gte(bound) => compare(field_value, bound).map_or(false, |o| o.is_ge()),
            FilterOp::Lte(bound) => compare(field_value, bound).map_or(false, |o| o.is_le()),
        }
    }
}

/// Orders two scalar values of matching kind.
///
/// Strings that both parse as RFC 3339 instants are ordered chronologically,
/// so offset spelling differences ("Z" vs "+00:00") cannot reorder a range.
/// Mixed kinds do not order.
fn compare(actual: &Value, bound: &Value) -> Option<std::cmp::Ordering> {
    match (actual, bound) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                return Some(ai.cmp(&bi));
            }
            match (a.as_f64(), b.as_f64()) {
                (Some(af), Some(bf)) => af.partial_cmp(&bf),
                _ => None,
            }
        }
        (Value::String(a), Value::String(b)) => {
            if let (Ok(at), Ok(bt)) = (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                return Some(at.cmp(&bt));
            }
            Some(a.cmp(b))
        }
        _ => None,
    }
}

/// A conjunction of predicates over persisted document fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    predicates: Vec<Predicate>,
}

impl Selector {
    /// Creates an empty selector (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// The predicates in insertion order
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Checks whether a document satisfies every predicate (AND semantics)
    pub fn matches(&self, document: &Value) -> bool {
        self.predicates.iter().all(|p| p.matches(document))
    }

    /// Renders the store's selector document.
    ///
    /// Range predicates on the same field merge into one operator object:
    /// `{"selector": {"Timestamp": {"$gte": "...", "$lte": "..."}}}`.
    pub fn to_document(&self) -> Value {
        let mut fields = Map::new();
        for predicate in &self.predicates {
            match predicate.op.range_key() {
                None => {
                    fields.insert(predicate.field.clone(), predicate.op.value().clone());
                }
                Some(op_key) => {
                    let entry = fields
                        .entry(predicate.field.clone())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if !entry.is_object() {
                        *entry = Value::Object(Map::new());
                    }
                    entry
                        .as_object_mut()
                        .unwrap()
                        .insert(op_key.to_string(), predicate.op.value().clone());
                }
            }
        }
        json!({ "selector": Value::Object(fields) })
    }
}
