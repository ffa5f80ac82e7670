//! ARC-4 method-call argument encoding
//!
//! Turns an [`ABIMethod`] plus call arguments into application-call fields:
//! the selector, encoded value arguments, resolved reference indices and the
//! transactions that must precede the call in its group.

use algo_primitives::{Address, AppId, AssetId};
use algo_types::{AppCallFields, Transaction};
use bytes::Bytes;
use tracing::debug;

use crate::abi::{
    encode, encode_tuple, ABIMethod, ABIMethodArgType, ABIReferenceType, ABIType, ABIValue,
};
use crate::SdkError;

/// Application arguments available to a call, including the selector
pub const MAX_APP_ARGS: usize = 16;

/// Value arguments encoded one per application argument before packing starts
const MAX_SEPARATE_VALUE_ARGS: usize = MAX_APP_ARGS - 1;

/// One argument of a method call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodCallArg {
    /// Encoded ABI value
    Value(ABIValue),
    /// Transaction placed before the call in the group
    Transaction(Transaction),
    /// Account reference
    Account(Address),
    /// Asset reference
    Asset(AssetId),
    /// Application reference
    Application(AppId),
}

impl From<ABIValue> for MethodCallArg {
    fn from(value: ABIValue) -> Self {
        MethodCallArg::Value(value)
    }
}

impl From<Transaction> for MethodCallArg {
    fn from(txn: Transaction) -> Self {
        MethodCallArg::Transaction(txn)
    }
}

/// Result of encoding a method call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMethodCall {
    /// Application-call fields with arguments and references filled in
    pub fields: AppCallFields,
    /// Transaction arguments, in argument order
    pub transactions: Vec<Transaction>,
}

/// Encode a method call
///
/// `fields` supplies the application id, completion action, programs and any
/// references already present; its `args` are replaced. Account references
/// equal to `sender` and application references equal to `fields.app_id`
/// resolve to index 0. Other references resolve to their position in the
/// foreign arrays (accounts and applications 1-based, assets 0-based) and are
/// appended when missing.
pub fn encode_method_call(
    method: &ABIMethod,
    args: &[MethodCallArg],
    sender: &Address,
    fields: AppCallFields,
) -> Result<EncodedMethodCall, SdkError> {
    if args.len() != method.args.len() {
        return Err(SdkError::MethodCall(format!(
            "{} expects {} arguments, got {}",
            method.signature(),
            method.args.len(),
            args.len()
        )));
    }

    let mut fields = fields;
    let mut transactions = Vec::new();
    let mut values: Vec<(ABIType, ABIValue)> = Vec::new();

    for (position, (declared, arg)) in method.args.iter().zip(args).enumerate() {
        match (&declared.arg_type, arg) {
            (ABIMethodArgType::Value(abi_type), MethodCallArg::Value(value)) => {
                values.push((abi_type.clone(), value.clone()));
            }
            (ABIMethodArgType::Transaction(kind), MethodCallArg::Transaction(txn)) => {
                let txn_type = txn.transaction_type();
                if !kind.accepts(txn_type.as_str()) {
                    return Err(SdkError::MethodCall(format!(
                        "argument {} expects a {} transaction, got {}",
                        position,
                        kind.as_str(),
                        txn_type
                    )));
                }
                transactions.push(txn.clone());
            }
            (ABIMethodArgType::Reference(ABIReferenceType::Account), MethodCallArg::Account(address)) => {
                let index = resolve_account(&mut fields, sender, address);
                values.push(reference_value(position, index)?);
            }
            (ABIMethodArgType::Reference(ABIReferenceType::Asset), MethodCallArg::Asset(asset_id)) => {
                let index = resolve_asset(&mut fields, *asset_id);
                values.push(reference_value(position, index)?);
            }
            (
                ABIMethodArgType::Reference(ABIReferenceType::Application),
                MethodCallArg::Application(app_id),
            ) => {
                let index = resolve_application(&mut fields, *app_id);
                values.push(reference_value(position, index)?);
            }
            (expected, _) => {
                return Err(SdkError::MethodCall(format!(
                    "argument {} of {} expects {}",
                    position,
                    method.signature(),
                    expected
                )));
            }
        }
    }

    let mut app_args = vec![Bytes::copy_from_slice(&method.selector())];
    if values.len() > MAX_SEPARATE_VALUE_ARGS {
        let (separate, packed) = values.split_at(MAX_SEPARATE_VALUE_ARGS - 1);
        for (abi_type, value) in separate {
            app_args.push(Bytes::from(encode(abi_type, value)?));
        }
        let packed_types: Vec<&ABIType> = packed.iter().map(|(t, _)| t).collect();
        let packed_values: Vec<ABIValue> = packed.iter().map(|(_, v)| v.clone()).collect();
        app_args.push(Bytes::from(encode_tuple(&packed_types, &packed_values)?));
        debug!(
            method = %method.name,
            packed = packed.len(),
            "Packed trailing method arguments into a tuple"
        );
    } else {
        for (abi_type, value) in &values {
            app_args.push(Bytes::from(encode(abi_type, value)?));
        }
    }

    fields.args = app_args;
    Ok(EncodedMethodCall {
        fields,
        transactions,
    })
}

fn reference_value(position: usize, index: usize) -> Result<(ABIType, ABIValue), SdkError> {
    let index = u8::try_from(index).map_err(|_| {
        SdkError::MethodCall(format!(
            "reference index {} of argument {} does not fit in a uint8",
            index, position
        ))
    })?;
    Ok((ABIType::Uint(8), ABIValue::Uint(u64::from(index))))
}

fn resolve_account(fields: &mut AppCallFields, sender: &Address, address: &Address) -> usize {
    if address == sender {
        return 0;
    }
    let index = match fields.account_references.iter().position(|a| a == address) {
        Some(existing) => existing + 1,
        None => {
            fields.account_references.push(*address);
            fields.account_references.len()
        }
    };
    debug!(account = %address, index, "Resolved account reference");
    index
}

fn resolve_asset(fields: &mut AppCallFields, asset_id: AssetId) -> usize {
    let index = match fields.asset_references.iter().position(|a| *a == asset_id) {
        Some(existing) => existing,
        None => {
            fields.asset_references.push(asset_id);
            fields.asset_references.len() - 1
        }
    };
    debug!(asset_id, index, "Resolved asset reference");
    index
}

fn resolve_application(fields: &mut AppCallFields, app_id: AppId) -> usize {
    if app_id == fields.app_id && app_id != 0 {
        return 0;
    }
    let index = match fields.app_references.iter().position(|a| *a == app_id) {
        Some(existing) => existing + 1,
        None => {
            fields.app_references.push(app_id);
            fields.app_references.len()
        }
    };
    debug!(app_id, index, "Resolved application reference");
    index
}
