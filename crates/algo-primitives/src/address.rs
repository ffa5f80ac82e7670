//! Algorand address type (32-byte public key + 4-byte checksum, base32)

use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha512_256};
use thiserror::Error;

/// Address parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Invalid base32 string
    #[error("invalid base32 string: {0}")]
    InvalidBase32(String),
    /// Invalid encoded length
    #[error("invalid address length: expected {expected} characters, got {got}")]
    InvalidEncodedLength {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },
    /// Invalid raw length
    #[error("invalid public key length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
    /// Checksum mismatch
    #[error("address checksum mismatch")]
    InvalidChecksum,
}

/// Algorand address: the 32-byte Ed25519 public key of an account
///
/// The string form appends `SHA512_256(pubkey)[28..32]` and base32 encodes the
/// 36 bytes without padding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 32]);

impl Address {
    /// Size of the public key in bytes
    pub const LEN: usize = 32;

    /// Size of the checksum in bytes
    pub const CHECKSUM_LEN: usize = 4;

    /// Length of the base32 string form
    pub const ENCODED_LEN: usize = 58;

    /// Zero address (all-zero public key)
    pub const ZERO: Address = Address([0u8; 32]);

    /// Create address from public key bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }

    /// Create address from a public key (identical to `from_bytes`)
    pub const fn from_public_key(public_key: [u8; 32]) -> Self {
        Address(public_key)
    }

    /// Create address from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        if slice.len() != Self::LEN {
            return Err(AddressError::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Address(bytes))
    }

    /// Parse the base32 string form, verifying the checksum
    pub fn from_string(s: &str) -> Result<Self, AddressError> {
        if s.len() != Self::ENCODED_LEN {
            return Err(AddressError::InvalidEncodedLength {
                expected: Self::ENCODED_LEN,
                got: s.len(),
            });
        }
        let decoded = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|e| AddressError::InvalidBase32(e.to_string()))?;
        if decoded.len() != Self::LEN + Self::CHECKSUM_LEN {
            return Err(AddressError::InvalidLength(decoded.len()));
        }

        let address = Self::from_slice(&decoded[..Self::LEN])?;
        if decoded[Self::LEN..] != address.checksum() {
            return Err(AddressError::InvalidChecksum);
        }
        Ok(address)
    }

    /// Public key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Public key bytes (alias of `as_bytes`)
    pub fn public_key(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Last four bytes of `SHA512_256(pubkey)`
    pub fn checksum(&self) -> [u8; 4] {
        let digest = Sha512_256::digest(self.0);
        let mut checksum = [0u8; 4];
        checksum.copy_from_slice(&digest[28..32]);
        checksum
    }

    /// Convert to the canonical base32 string
    pub fn encode(&self) -> String {
        let mut buf = Vec::with_capacity(Self::LEN + Self::CHECKSUM_LEN);
        buf.extend_from_slice(&self.0);
        buf.extend_from_slice(&self.checksum());
        BASE32_NOPAD.encode(&buf)
    }

    /// Hex form of the public key, for debugging
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Address {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.encode())
        }
    }

    impl<'de> Deserialize<'de> for Address {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Address::from_string(&s).map_err(de::Error::custom)
        }
    }
}
