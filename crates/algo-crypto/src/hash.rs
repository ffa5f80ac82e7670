//! SHA-256 / SHA-512/256 hashing and domain separation

use algo_primitives::{Address, AppId, Byte32};
use sha2::{Digest, Sha256, Sha512_256};

/// Prefix for single transaction hashing and signing
pub const TX_PREFIX: &[u8] = b"TX";

/// Prefix for transaction group hashing
pub const TX_GROUP_PREFIX: &[u8] = b"TG";

/// Prefix for multisig address derivation
pub const MULTISIG_ADDR_PREFIX: &[u8] = b"MultisigAddr";

/// Prefix for logic signature program addresses
pub const PROGRAM_PREFIX: &[u8] = b"Program";

/// Prefix for application account addresses
pub const APP_ID_PREFIX: &[u8] = b"appID";

/// Compute SHA-256 of the input data
pub fn sha256(data: &[u8]) -> Byte32 {
    let digest = Sha256::digest(data);
    Byte32::from_bytes(digest.into())
}

/// Compute SHA-512/256 of the input data
pub fn sha512_256(data: &[u8]) -> Byte32 {
    let digest = Sha512_256::digest(data);
    Byte32::from_bytes(digest.into())
}

/// Compute `SHA512_256(prefix || data)` without concatenating into a new buffer
pub fn hash_with_prefix(prefix: &[u8], data: &[u8]) -> Byte32 {
    let mut hasher = Sha512_256::new();
    hasher.update(prefix);
    hasher.update(data);
    Byte32::from_bytes(hasher.finalize().into())
}

/// Account address of an application: `SHA512_256("appID" || be64(app_id))`
pub fn application_address(app_id: AppId) -> Address {
    Address::from_public_key(*hash_with_prefix(APP_ID_PREFIX, &app_id.to_be_bytes()).as_bytes())
}
