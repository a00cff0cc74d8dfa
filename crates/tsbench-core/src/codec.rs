//! Point key and value encoding
//!
//! Keys are 24 bytes: `series_id`, `timestamp_micros` and `sequence`, each a
//! big-endian `i64`. For non-negative components the byte order of encoded
//! keys equals the tuple order, which is what range scans rely on.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Width of an encoded point key
pub const KEY_LEN: usize = 24;

/// An encoded point key
pub type PointKey = [u8; KEY_LEN];

/// Encodes a `(series_id, timestamp_micros, sequence)` triple.
pub fn encode_key(series_id: i64, timestamp_micros: i64, sequence: i64) -> PointKey {
    let mut key = [0u8; KEY_LEN];
    key[0..8].copy_from_slice(&series_id.to_be_bytes());
    key[8..16].copy_from_slice(&timestamp_micros.to_be_bytes());
    key[16..24].copy_from_slice(&sequence.to_be_bytes());
    key
}

/// Decodes a key back into its triple. Returns `None` on a width mismatch.
pub fn decode_key(key: &[u8]) -> Option<(i64, i64, i64)> {
    if key.len() != KEY_LEN {
        return None;
    }
    let field = |at: usize| {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&key[at..at + 8]);
        i64::from_be_bytes(buf)
    };
    Some((field(0), field(8), field(16)))
}

/// Inclusive key range covering every point of one series.
///
/// The upper bound uses `-1` for timestamp and sequence, which encodes as all
/// `0xFF` bytes and therefore sorts after any non-negative component.
pub fn series_range(series_id: i64) -> (PointKey, PointKey) {
    (encode_key(series_id, 0, 0), encode_key(series_id, -1, -1))
}

/// Stored value schema: one optional 64-bit measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    /// The measurement
    pub int64_value: Option<i64>,
}

/// Encodes a measurement into the stored value payload.
pub fn encode_value(measurement: i64) -> Result<Vec<u8>> {
    let value = FieldValue {
        int64_value: Some(measurement),
    };
    bincode::serialize(&value).map_err(|e| Error::Serialization(e.to_string()))
}
