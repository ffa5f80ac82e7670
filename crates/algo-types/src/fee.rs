//! Size estimation and fee assignment

use algo_primitives::MicroAlgos;
use tracing::debug;

use crate::codec::encode_transaction_raw;
use crate::{Result, TransactError, Transaction};

/// Msgpack overhead of wrapping a transaction as `{"sig": <64 bytes>, "txn": ...}`
pub const SIGNATURE_ENVELOPE_OVERHEAD: u64 = 75;

/// Fee parameters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeParams {
    /// Fee per byte of the signed transaction; 0 means flat fee
    pub fee_per_byte: MicroAlgos,
    /// Protocol minimum fee
    pub min_fee: MicroAlgos,
    /// Added on top of the computed fee (e.g. to cover inner transactions)
    pub extra_fee: Option<MicroAlgos>,
    /// Upper bound; exceeding it is an error
    pub max_fee: Option<MicroAlgos>,
}

impl FeeParams {
    /// Flat fee parameters
    pub fn flat(min_fee: MicroAlgos) -> Self {
        Self {
            min_fee,
            ..Default::default()
        }
    }

    /// Set the extra fee
    pub fn with_extra_fee(mut self, extra_fee: MicroAlgos) -> Self {
        self.extra_fee = Some(extra_fee);
        self
    }

    /// Set the maximum fee
    pub fn with_max_fee(mut self, max_fee: MicroAlgos) -> Self {
        self.max_fee = Some(max_fee);
        self
    }
}

/// Upper bound on the signed size of a transaction in bytes
pub fn estimate_transaction_size(txn: &Transaction) -> Result<u64> {
    let raw = encode_transaction_raw(txn)?;
    Ok(raw.len() as u64 + SIGNATURE_ENVELOPE_OVERHEAD)
}

/// Compute the fee for a transaction without assigning it
pub fn calculate_fee(txn: &Transaction, params: &FeeParams) -> Result<MicroAlgos> {
    let base = if params.fee_per_byte == 0 {
        params.min_fee
    } else {
        let size = estimate_transaction_size(txn)?;
        size.checked_mul(params.fee_per_byte)
            .ok_or(TransactError::FeeOverflow)?
            .max(params.min_fee)
    };

    let fee = base
        .checked_add(params.extra_fee.unwrap_or(0))
        .ok_or(TransactError::FeeOverflow)?;

    if let Some(max_fee) = params.max_fee {
        if fee > max_fee {
            return Err(TransactError::FeeTooHigh { fee, max_fee });
        }
    }
    Ok(fee)
}

/// Return a copy of the transaction with its fee set
pub fn assign_fee(txn: &Transaction, params: &FeeParams) -> Result<Transaction> {
    let fee = calculate_fee(txn, params)?;
    debug!(fee, fee_per_byte = params.fee_per_byte, "Assigned transaction fee");
    Ok(txn.with_fee(fee))
}

/// Assign fees to each transaction, preserving order
pub fn assign_fees(txns: &[Transaction], params: &FeeParams) -> Result<Vec<Transaction>> {
    txns.iter().map(|txn| assign_fee(txn, params)).collect()
}
