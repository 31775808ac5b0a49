//! Hash record entity and its persisted representation
//!
//! A [`HashRecord`] is the write-once entity stored under its `id` in the
//! external state store. The codec maps it to a self-describing JSON
//! document so deserialization stays forward-tolerant of additive fields.

mod codec;
mod data_type;
mod errors;
mod record;

pub use codec::{decode, decode_lenient, encode, LenientDecode};
pub use data_type::DataType;
pub use errors::{CodecError, CodecResult};
pub use record::HashRecord;
