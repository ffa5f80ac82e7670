//! # algo-types
//!
//! Transaction model for the Algorand encoding core.
//!
//! This crate provides:
//! - [`Transaction`] - unsigned transaction: header plus one typed payload
//! - [`codec`] - canonical msgpack encoder/decoder and transaction ids
//! - [`group`] - group id derivation
//! - [`fee`] - size estimation and fee assignment
//! - [`validation`] - aggregated per-payload validation
//! - [`SignedTransaction`] - signature, multisig or logic signature envelopes
//! - [`multisig`] - multisig address derivation, subsignature application and merge

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
mod error;
pub mod fee;
pub mod group;
pub mod multisig;
pub mod signed;
pub mod transaction;
pub mod validation;

pub use codec::{
    decode_transaction, encode_transaction, encode_transaction_raw, get_transaction_id,
    get_transaction_id_raw, MsgpackCodec,
};
pub use error::{MultisigError, Result, TransactError};
pub use fee::{
    assign_fee, assign_fees, calculate_fee, estimate_transaction_size, FeeParams,
    SIGNATURE_ENVELOPE_OVERHEAD,
};
pub use group::{compute_group_id, group_transactions, MAX_TX_GROUP_SIZE};
pub use multisig::{
    address_from_multisig_signature, apply_multisig_subsignature, merge_multisignatures,
    new_multisig_signature, MultisigSignature, MultisigSubsignature,
};
pub use signed::{
    decode_signed_transaction, decode_signed_transactions, encode_signed_transaction,
    encode_signed_transactions, LogicSignature, SignedTransaction,
};
pub use transaction::{
    AppCallFields, AssetConfigFields, AssetFreezeFields, AssetParams, AssetTransferFields,
    BoxReference, KeyRegistrationFields, OnApplicationComplete, PaymentFields, StateSchema,
    Transaction, TransactionHeader, TransactionPayload, TransactionType,
};
pub use validation::validate_transaction;
