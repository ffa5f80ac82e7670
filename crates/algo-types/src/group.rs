//! Atomic transaction groups

use algo_crypto::{hash_with_prefix, TX_GROUP_PREFIX};
use algo_msgpack::{MapBuilder, Value};
use algo_primitives::Byte32;
use tracing::debug;

use crate::codec::get_transaction_id_raw;
use crate::{Result, TransactError, Transaction};

/// Maximum number of transactions in one group
pub const MAX_TX_GROUP_SIZE: usize = 16;

/// Group id of an ordered list of transactions
///
/// `SHA512_256("TG" || msgpack({"txlist": [raw_id, ...]}))`, where each raw id
/// is taken over the transaction exactly as given.
pub fn compute_group_id(txns: &[Transaction]) -> Result<Byte32> {
    if txns.is_empty() {
        return Err(TransactError::EmptyGroup);
    }
    if txns.len() > MAX_TX_GROUP_SIZE {
        return Err(TransactError::GroupTooLarge {
            size: txns.len(),
            max: MAX_TX_GROUP_SIZE,
        });
    }

    let ids = txns
        .iter()
        .map(|txn| Ok(Value::Binary(get_transaction_id_raw(txn)?.as_bytes().to_vec())))
        .collect::<Result<Vec<_>>>()?;
    let encoded = algo_msgpack::encode_canonical(
        MapBuilder::new().field("txlist", Value::Array(ids)).build(),
    )?;
    Ok(hash_with_prefix(TX_GROUP_PREFIX, &encoded))
}

/// Assign a shared group id to every transaction
///
/// Returns new copies in input order. Input that already carries a group id is
/// rejected rather than regrouped.
pub fn group_transactions(txns: &[Transaction]) -> Result<Vec<Transaction>> {
    if let Some(index) = txns.iter().position(|txn| txn.header.group.is_some()) {
        return Err(TransactError::AlreadyGrouped { index });
    }

    let group = compute_group_id(txns)?;
    debug!(size = txns.len(), group = %group, "Assigned transaction group");
    Ok(txns.iter().map(|txn| txn.with_group(group)).collect())
}
