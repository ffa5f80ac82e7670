//! # algo-primitives
//!
//! Primitive types for the Algorand encoding core.
//!
//! This crate provides the fixed-width values every other layer is built on:
//! - [`Address`] - 32-byte Ed25519 public key with a 4-byte checksum, base32 encoded
//! - [`Byte32`] - 32-byte digests (genesis hash, lease, group id, raw transaction id)

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod byte32;
mod error;

pub use address::{Address, AddressError};
pub use byte32::{Byte32, Byte32Error};
pub use error::PrimitiveError;

/// Round number type
pub type Round = u64;

/// Amount in microAlgos or asset base units
pub type MicroAlgos = u64;

/// Asset identifier
pub type AssetId = u64;

/// Application identifier
pub type AppId = u64;
