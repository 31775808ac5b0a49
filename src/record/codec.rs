//! Record codec: entity <-> persisted document bytes
//!
//! The persisted form is a field-name-tagged JSON document, so decoding
//! tolerates additive future fields. Strict decoding is for point reads,
//! where a malformed value is a hard failure; lenient decoding is for bulk
//! scans, where the skip-or-keep outcome must stay visible to the caller.

use super::errors::{CodecError, CodecResult};
use super::record::HashRecord;

/// Serializes a record to its store value bytes.
pub fn encode(record: &HashRecord) -> CodecResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(CodecError::Encode)
}

/// Deserializes store value bytes; any failure is a hard error.
pub fn decode(bytes: &[u8]) -> CodecResult<HashRecord> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}

/// Outcome of a lenient decode during a bulk scan.
#[derive(Debug)]
pub enum LenientDecode {
    /// The entry decoded cleanly
    Record(HashRecord),
    /// The entry is malformed; the scan drops it and continues
    Skip(CodecError),
}

/// Deserializes store value bytes, mapping failure to an explicit skip marker.
pub fn decode_lenient(bytes: &[u8]) -> LenientDecode {
    match decode(bytes) {
        Ok(record) => LenientDecode::Record(record),
        Err(err) => LenientDecode::Skip(err),
    }
}
