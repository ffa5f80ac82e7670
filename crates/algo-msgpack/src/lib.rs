//! # algo-msgpack
//!
//! Canonical msgpack encoding/decoding for the Algorand encoding core.
//!
//! Values are described as an [`rmpv::Value`] tree, passed through the
//! canonical transforms in [`canonical`], then written with the minimal-width
//! msgpack encoding `rmpv` produces.
//!
//! ## Canonical rules
//!
//! - Map keys sorted bytewise
//! - Map entries holding a zero value (nil, 0, false, "", empty bin/array/map) are omitted, recursively
//! - Integers use the smallest msgpack representation
//! - Byte strings use the `bin` family, text uses the `str` family

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
mod error;
mod map;

pub use canonical::{canonicalize, is_empty_value, omit_empty, sort_keys};
pub use error::MsgpackError;
pub use map::{fixed_value, value_bytes, value_fixed, value_u64, MapBuilder, MapReader};

// Re-export rmpv for direct use
pub use rmpv::{Integer, Value};

/// Write a value exactly as given
pub fn encode(value: &Value) -> Result<Vec<u8>, MsgpackError> {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, value)?;
    Ok(buf)
}

/// Canonicalize a value, then write it
pub fn encode_canonical(value: Value) -> Result<Vec<u8>, MsgpackError> {
    encode(&canonicalize(value))
}

/// Decode exactly one value; trailing bytes are an error
pub fn decode(data: &[u8]) -> Result<Value, MsgpackError> {
    let mut cursor = data;
    let value = rmpv::decode::read_value(&mut cursor)?;
    if !cursor.is_empty() {
        return Err(MsgpackError::TrailingBytes(cursor.len()));
    }
    Ok(value)
}

/// Decode a concatenation of values
pub fn decode_stream(data: &[u8]) -> Result<Vec<Value>, MsgpackError> {
    let mut cursor = data;
    let mut values = Vec::new();
    while !cursor.is_empty() {
        values.push(rmpv::decode::read_value(&mut cursor)?);
    }
    Ok(values)
}
