//! Ed25519 signature operations

use std::fmt;

use algo_primitives::Address;
use ed25519_dalek::{Signer, Verifier};

use crate::CryptoError;

/// Length of an Ed25519 signature in bytes
pub const SIGNATURE_LEN: usize = 64;

/// Public key (32 bytes)
pub type PublicKey = ed25519_dalek::VerifyingKey;

/// Private key (32-byte seed)
pub type PrivateKey = ed25519_dalek::SigningKey;

/// Raw Ed25519 signature
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    /// Create signature from bytes
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Signature(bytes)
    }

    /// Parse from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; SIGNATURE_LEN] = slice.try_into().map_err(|_| {
            CryptoError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LEN,
                slice.len()
            ))
        })?;
        Ok(Signature(bytes))
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Convert to bytes
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Sign a message with a private key
///
/// Ed25519 is deterministic: the same key and message always yield the same bytes.
pub fn sign(message: &[u8], private_key: &PrivateKey) -> Signature {
    Signature(private_key.sign(message).to_bytes())
}

/// Verify a signature over `message` against a public key given as an address
pub fn verify(message: &[u8], signature: &Signature, signer: &Address) -> Result<bool, CryptoError> {
    let public_key = PublicKey::from_bytes(signer.as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    Ok(public_key.verify(message, &sig).is_ok())
}

/// Derive the account address of a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    Address::from_public_key(public_key.to_bytes())
}
