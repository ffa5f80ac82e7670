//! Transaction builder

use algo_primitives::{Address, AssetId, Byte32, MicroAlgos, Round};
use algo_types::{
    assign_fee, group_transactions, validate_transaction, AppCallFields, AssetConfigFields,
    AssetFreezeFields, AssetParams, AssetTransferFields, FeeParams, KeyRegistrationFields,
    PaymentFields, Transaction, TransactionHeader, TransactionPayload,
};
use bytes::Bytes;

use crate::abi::ABIMethod;
use crate::method_call::{encode_method_call, MethodCallArg};
use crate::{SdkConfig, SdkError, TransactionParams};

/// Transaction builder with fluent API
///
/// Every build assigns the fee and validates the result.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    header: TransactionHeader,
    fee_params: FeeParams,
}

impl TxBuilder {
    /// Create a builder for `sender` with a flat minimum fee
    pub fn new(sender: Address) -> Self {
        Self {
            header: TransactionHeader {
                sender,
                ..Default::default()
            },
            fee_params: SdkConfig::default().fee_params(0, 0),
        }
    }

    /// Create a builder from suggested params
    ///
    /// The validity range starts at the last round and spans the configured window.
    pub fn from_params(sender: Address, params: &TransactionParams, config: &SdkConfig) -> Self {
        Self {
            header: TransactionHeader {
                sender,
                first_valid: params.last_round,
                last_valid: params.last_round.saturating_add(config.validity_window),
                genesis_id: params.genesis_id.clone(),
                genesis_hash: Some(params.genesis_hash),
                ..Default::default()
            },
            fee_params: config.fee_params(params.fee, params.min_fee),
        }
    }

    /// Set the fee parameters
    pub fn fee_params(mut self, params: FeeParams) -> Self {
        self.fee_params = params;
        self
    }

    /// Use a flat fee
    pub fn flat_fee(mut self, fee: MicroAlgos) -> Self {
        self.fee_params = FeeParams::flat(fee);
        self
    }

    /// Set the validity range
    pub fn validity(mut self, first_valid: Round, last_valid: Round) -> Self {
        self.header.first_valid = first_valid;
        self.header.last_valid = last_valid;
        self
    }

    /// Set the genesis id and hash
    pub fn genesis(mut self, genesis_id: impl Into<String>, genesis_hash: Byte32) -> Self {
        self.header.genesis_id = genesis_id.into();
        self.header.genesis_hash = Some(genesis_hash);
        self
    }

    /// Set the note
    pub fn note(mut self, note: impl Into<Bytes>) -> Self {
        self.header.note = note.into();
        self
    }

    /// Set the lease
    pub fn lease(mut self, lease: Byte32) -> Self {
        self.header.lease = Some(lease);
        self
    }

    /// Rekey the sender to a new authorized address
    pub fn rekey_to(mut self, address: Address) -> Self {
        self.header.rekey_to = Some(address);
        self
    }

    /// Header transactions are built with
    pub fn header(&self) -> &TransactionHeader {
        &self.header
    }

    /// Build a transaction with any payload
    pub fn build(&self, payload: TransactionPayload) -> Result<Transaction, SdkError> {
        let txn = Transaction::new(self.header.clone(), payload);
        let txn = assign_fee(&txn, &self.fee_params)?;
        validate_transaction(&txn)?;
        Ok(txn)
    }

    /// Payment
    pub fn payment(&self, receiver: Address, amount: MicroAlgos) -> Result<Transaction, SdkError> {
        self.build(TransactionPayload::Payment(PaymentFields {
            receiver,
            amount,
            close_remainder_to: None,
        }))
    }

    /// Close the sender account, sending the remaining balance to `close_to`
    pub fn close_account(&self, close_to: Address) -> Result<Transaction, SdkError> {
        self.build(TransactionPayload::Payment(PaymentFields {
            receiver: close_to,
            amount: 0,
            close_remainder_to: Some(close_to),
        }))
    }

    /// Asset transfer
    pub fn asset_transfer(
        &self,
        asset_id: AssetId,
        receiver: Address,
        amount: u64,
    ) -> Result<Transaction, SdkError> {
        self.build(TransactionPayload::AssetTransfer(AssetTransferFields {
            asset_id,
            amount,
            receiver,
            ..Default::default()
        }))
    }

    /// Opt the sender in to an asset
    pub fn asset_opt_in(&self, asset_id: AssetId) -> Result<Transaction, SdkError> {
        self.asset_transfer(asset_id, self.header.sender, 0)
    }

    /// Create an asset
    pub fn asset_create(&self, params: AssetParams) -> Result<Transaction, SdkError> {
        self.build(TransactionPayload::AssetConfig(AssetConfigFields {
            asset_id: 0,
            params: Some(params),
        }))
    }

    /// Reconfigure an asset's management addresses
    pub fn asset_config(
        &self,
        asset_id: AssetId,
        params: AssetParams,
    ) -> Result<Transaction, SdkError> {
        self.build(TransactionPayload::AssetConfig(AssetConfigFields {
            asset_id,
            params: Some(params),
        }))
    }

    /// Destroy an asset
    pub fn asset_destroy(&self, asset_id: AssetId) -> Result<Transaction, SdkError> {
        self.build(TransactionPayload::AssetConfig(AssetConfigFields {
            asset_id,
            params: None,
        }))
    }

    /// Freeze or unfreeze an account's holding
    pub fn asset_freeze(
        &self,
        asset_id: AssetId,
        freeze_target: Address,
        frozen: bool,
    ) -> Result<Transaction, SdkError> {
        self.build(TransactionPayload::AssetFreeze(AssetFreezeFields {
            asset_id,
            freeze_target,
            frozen,
        }))
    }

    /// Application call
    pub fn app_call(&self, fields: AppCallFields) -> Result<Transaction, SdkError> {
        self.build(TransactionPayload::AppCall(fields))
    }

    /// Key registration
    pub fn key_registration(&self, fields: KeyRegistrationFields) -> Result<Transaction, SdkError> {
        self.build(TransactionPayload::KeyRegistration(fields))
    }

    /// ARC-4 method call
    ///
    /// Returns the transaction arguments followed by the application call,
    /// grouped when there is more than one.
    pub fn method_call(
        &self,
        method: &ABIMethod,
        args: &[MethodCallArg],
        fields: AppCallFields,
    ) -> Result<Vec<Transaction>, SdkError> {
        let encoded = encode_method_call(method, args, &self.header.sender, fields)?;
        let mut txns = encoded.transactions;
        txns.push(self.app_call(encoded.fields)?);
        if txns.len() == 1 {
            return Ok(txns);
        }
        Ok(group_transactions(&txns)?)
    }
}
