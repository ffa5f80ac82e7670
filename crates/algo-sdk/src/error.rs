//! SDK error types

use algo_crypto::CryptoError;
use algo_primitives::{AddressError, PrimitiveError};
use algo_types::TransactError;
use thiserror::Error;

/// ABI codec error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbiError {
    /// Malformed ARC-4 type string
    #[error("Invalid ABI type `{type_str}`: {reason}")]
    InvalidType {
        /// Offending type string
        type_str: String,
        /// What is wrong with it
        reason: String,
    },

    /// Value does not match the type it is encoded against
    #[error("Cannot encode {type_name}: {reason}")]
    Encode {
        /// Canonical name of the target type
        type_name: String,
        /// What is wrong with the value
        reason: String,
    },

    /// Bytes do not decode as the requested type
    #[error("Cannot decode {type_name}: {reason}")]
    Decode {
        /// Canonical name of the target type
        type_name: String,
        /// What is wrong with the bytes
        reason: String,
    },

    /// Malformed method signature or description
    #[error("Invalid ABI method: {0}")]
    InvalidMethod(String),
}

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// ABI encoding/decoding error
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// Transaction model error (codec, validation, fees, grouping, multisig)
    #[error(transparent)]
    Transaction(#[from] TransactError),

    /// Method-call argument error
    #[error("Method call error: {0}")]
    MethodCall(String),

    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for SdkError {
    fn from(e: toml::de::Error) -> Self {
        SdkError::Config(e.to_string())
    }
}

impl From<CryptoError> for SdkError {
    fn from(e: CryptoError) -> Self {
        SdkError::SigningFailed(e.to_string())
    }
}

impl From<AddressError> for SdkError {
    fn from(e: AddressError) -> Self {
        SdkError::InvalidAddress(e.to_string())
    }
}

impl From<PrimitiveError> for SdkError {
    fn from(e: PrimitiveError) -> Self {
        SdkError::InvalidAddress(e.to_string())
    }
}
