//! Fixed 32-byte values (digests, leases, genesis hashes)

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use data_encoding::BASE32_NOPAD;
use thiserror::Error;

/// Fixed digest parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Byte32Error {
    /// Invalid encoding
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
    /// Invalid length
    #[error("invalid length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// 32-byte fixed value
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Byte32([u8; 32]);

impl Byte32 {
    /// Size in bytes
    pub const LEN: usize = 32;

    /// All-zero value
    pub const ZERO: Byte32 = Byte32([0u8; 32]);

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Byte32(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, Byte32Error> {
        if slice.len() != Self::LEN {
            return Err(Byte32Error::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Byte32(bytes))
    }

    /// Parse from standard base64 (the node's JSON representation)
    pub fn from_base64(s: &str) -> Result<Self, Byte32Error> {
        let bytes = BASE64
            .decode(s)
            .map_err(|e| Byte32Error::InvalidEncoding(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Parse from unpadded base32 (transaction id form)
    pub fn from_base32(s: &str) -> Result<Self, Byte32Error> {
        let bytes = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|e| Byte32Error::InvalidEncoding(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Standard base64 form
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Unpadded base32 form
    pub fn to_base32(&self) -> String {
        BASE32_NOPAD.encode(&self.0)
    }
}

impl fmt::Debug for Byte32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Byte32({})", hex::encode(self.0))
    }
}

impl fmt::Display for Byte32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl From<[u8; 32]> for Byte32 {
    fn from(bytes: [u8; 32]) -> Self {
        Byte32(bytes)
    }
}

impl AsRef<[u8]> for Byte32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Byte32 {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_base64())
        }
    }

    impl<'de> Deserialize<'de> for Byte32 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Byte32::from_base64(&s).map_err(de::Error::custom)
        }
    }
}
