//! hashledger - validated, write-once hash records over a ledger state store
//!
//! Records content hashes of meter readings as immutable entries in an
//! externally supplied key-value/query store and translates domain filters
//! into its selector language.

pub mod observability;
pub mod query;
pub mod record;
pub mod service;
pub mod store;
pub mod validation;
