//! Domain filters and their translation to store selector documents
//!
//! Filters never reach the store as interpolated strings: they are built as
//! typed predicates and rendered to the selector document at the boundary,
//! which also makes them evaluable in-process without a live backend.

mod selector;
mod translator;

pub use selector::{FilterOp, Predicate, Selector};
pub use translator::{
    query_all, query_by_data_type, query_by_device, query_by_time_range, selector_by_data_type,
    selector_by_device, selector_by_time_range,
};
