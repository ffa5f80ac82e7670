//! Msgpack codec errors

use thiserror::Error;

/// Msgpack encoding/decoding error
#[derive(Debug, Error)]
pub enum MsgpackError {
    /// Writer failure while encoding
    #[error("msgpack encode error: {0}")]
    Encode(String),

    /// Malformed msgpack input
    #[error("msgpack decode error: {0}")]
    Decode(String),

    /// Input continued after the decoded value
    #[error("unexpected {0} trailing bytes after msgpack value")]
    TrailingBytes(usize),

    /// A field held a value of the wrong msgpack type
    #[error("field `{field}`: expected {expected}")]
    UnexpectedType {
        /// Field name (map key) or position
        field: String,
        /// Expected msgpack type
        expected: &'static str,
    },

    /// A fixed-width byte field had the wrong length
    #[error("field `{field}`: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Field name
        field: String,
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },
}

impl From<rmpv::encode::Error> for MsgpackError {
    fn from(e: rmpv::encode::Error) -> Self {
        MsgpackError::Encode(e.to_string())
    }
}

impl From<rmpv::decode::Error> for MsgpackError {
    fn from(e: rmpv::decode::Error) -> Self {
        MsgpackError::Decode(e.to_string())
    }
}
