//! Common error types for primitives

use thiserror::Error;
use crate::address::AddressError;
use crate::byte32::Byte32Error;

/// Primitive operation error
#[derive(Debug, Error)]
pub enum PrimitiveError {
    /// Address error
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Fixed digest error
    #[error("digest error: {0}")]
    Byte32(#[from] Byte32Error),
}
