//! # algo-crypto
//!
//! Cryptographic primitives for the Algorand encoding core.
//!
//! - SHA-256 and SHA-512/256 hashing
//! - Domain-separated hashing (`"TX"`, `"TG"`, `"MultisigAddr"`, `"Program"`, `"appID"`)
//! - Ed25519 signing/verification
//! - Public key to address derivation

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod signature;

pub use error::CryptoError;
pub use hash::{
    application_address, hash_with_prefix, sha256, sha512_256, APP_ID_PREFIX,
    MULTISIG_ADDR_PREFIX, PROGRAM_PREFIX, TX_GROUP_PREFIX, TX_PREFIX,
};
pub use signature::{
    public_key_to_address, sign, verify, PrivateKey, PublicKey, Signature, SIGNATURE_LEN,
};
