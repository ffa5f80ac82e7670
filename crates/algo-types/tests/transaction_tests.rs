//! Transaction codec tests for algo-types
//!
//! Round trips for every payload type, determinism, ids and groups.

use algo_primitives::{Address, Byte32};
use algo_types::{
    assign_fee, decode_signed_transaction, decode_signed_transactions, decode_transaction,
    encode_signed_transaction, encode_signed_transactions, encode_transaction,
    encode_transaction_raw, estimate_transaction_size, get_transaction_id_raw,
    group_transactions, validate_transaction, AppCallFields, AssetConfigFields,
    AssetFreezeFields, AssetParams, AssetTransferFields, BoxReference, FeeParams,
    KeyRegistrationFields, LogicSignature, OnApplicationComplete, PaymentFields,
    SignedTransaction, StateSchema, Transaction, TransactionHeader, TransactionPayload,
};
use bytes::Bytes;
use proptest::prelude::*;

// ==================== Strategies ====================

fn arb_address() -> impl Strategy<Value = Address> {
    any::<[u8; 32]>().prop_map(Address::from_bytes)
}

fn arb_nonzero32() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>().prop_filter("non-zero", |b| b.iter().any(|x| *x != 0))
}

fn arb_opt_address() -> impl Strategy<Value = Option<Address>> {
    prop::option::of(arb_nonzero32().prop_map(Address::from_bytes))
}

fn arb_opt_byte32() -> impl Strategy<Value = Option<Byte32>> {
    prop::option::of(arb_nonzero32().prop_map(Byte32::from_bytes))
}

fn arb_bytes(max: usize) -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..max).prop_map(Bytes::from)
}

fn arb_header() -> impl Strategy<Value = TransactionHeader> {
    (
        arb_address(),
        any::<u64>(),
        any::<u64>(),
        any::<u64>(),
        "[a-z0-9.-]{0,16}",
        arb_opt_byte32(),
        arb_bytes(32),
        arb_opt_byte32(),
        arb_opt_address(),
        arb_opt_byte32(),
    )
        .prop_map(
            |(sender, fee, first_valid, last_valid, genesis_id, genesis_hash, note, lease, rekey_to, group)| {
                TransactionHeader {
                    sender,
                    fee,
                    first_valid,
                    last_valid,
                    genesis_id,
                    genesis_hash,
                    note,
                    lease,
                    rekey_to,
                    group,
                }
            },
        )
}

fn arb_payment() -> impl Strategy<Value = TransactionPayload> {
    (arb_address(), any::<u64>(), arb_opt_address()).prop_map(|(receiver, amount, close)| {
        TransactionPayload::Payment(PaymentFields {
            receiver,
            amount,
            close_remainder_to: close,
        })
    })
}

fn arb_asset_transfer() -> impl Strategy<Value = TransactionPayload> {
    (any::<u64>(), any::<u64>(), arb_address(), arb_opt_address(), arb_opt_address()).prop_map(
        |(asset_id, amount, receiver, asset_sender, close_remainder_to)| {
            TransactionPayload::AssetTransfer(AssetTransferFields {
                asset_id,
                amount,
                receiver,
                asset_sender,
                close_remainder_to,
            })
        },
    )
}

fn arb_asset_params() -> impl Strategy<Value = AssetParams> {
    (
        1..u64::MAX,
        0u32..=19,
        any::<bool>(),
        "[A-Z]{0,8}",
        "[a-zA-Z ]{0,32}",
        "[a-z:/.]{0,40}",
        arb_opt_byte32(),
        (arb_opt_address(), arb_opt_address(), arb_opt_address(), arb_opt_address()),
    )
        .prop_map(
            |(total, decimals, default_frozen, unit_name, asset_name, url, metadata_hash, roles)| {
                AssetParams {
                    total,
                    decimals,
                    default_frozen,
                    unit_name,
                    asset_name,
                    url,
                    metadata_hash,
                    manager: roles.0,
                    reserve: roles.1,
                    freeze: roles.2,
                    clawback: roles.3,
                }
            },
        )
}

fn arb_asset_config() -> impl Strategy<Value = TransactionPayload> {
    (any::<u64>(), prop::option::of(arb_asset_params())).prop_map(|(asset_id, params)| {
        TransactionPayload::AssetConfig(AssetConfigFields { asset_id, params })
    })
}

fn arb_asset_freeze() -> impl Strategy<Value = TransactionPayload> {
    (any::<u64>(), arb_address(), any::<bool>()).prop_map(|(asset_id, freeze_target, frozen)| {
        TransactionPayload::AssetFreeze(AssetFreezeFields {
            asset_id,
            freeze_target,
            frozen,
        })
    })
}

fn arb_schema() -> impl Strategy<Value = Option<StateSchema>> {
    prop::option::of((1..64u64, 0..64u64).prop_map(|(num_uints, num_byte_slices)| StateSchema {
        num_uints,
        num_byte_slices,
    }))
}

fn arb_app_call() -> impl Strategy<Value = TransactionPayload> {
    (
        any::<u64>(),
        0u64..=5,
        arb_bytes(64),
        arb_bytes(16),
        arb_schema(),
        arb_schema(),
        0u32..=3,
        prop::collection::vec(arb_bytes(8), 0..4),
        prop::collection::vec(arb_address(), 0..3),
        prop::collection::vec(any::<u64>(), 0..3),
        prop::collection::vec(any::<u64>(), 0..3),
        prop::collection::vec((0u64..4, arb_bytes(8)), 0..3),
    )
        .prop_map(
            |(app_id, apan, approval, clear, global, local, pages, args, accounts, apps, assets, boxes)| {
                TransactionPayload::AppCall(AppCallFields {
                    app_id,
                    on_complete: OnApplicationComplete::try_from(apan).unwrap(),
                    approval_program: approval,
                    clear_state_program: clear,
                    global_state_schema: global,
                    local_state_schema: local,
                    extra_program_pages: pages,
                    args,
                    account_references: accounts,
                    app_references: apps,
                    asset_references: assets,
                    box_references: boxes
                        .into_iter()
                        .map(|(app_index, name)| BoxReference { app_index, name })
                        .collect(),
                })
            },
        )
}

fn arb_key_registration() -> impl Strategy<Value = TransactionPayload> {
    (
        arb_opt_byte32(),
        arb_opt_byte32(),
        prop::option::of(
            prop::collection::vec(1u8..=255, 64).prop_map(|v| {
                let mut key = [0u8; 64];
                key.copy_from_slice(&v);
                key
            }),
        ),
        any::<u64>(),
        any::<u64>(),
        any::<u64>(),
        any::<bool>(),
    )
        .prop_map(
            |(vote_key, selection_key, state_proof_key, vote_first, vote_last, dilution, nonpart)| {
                TransactionPayload::KeyRegistration(KeyRegistrationFields {
                    vote_key,
                    selection_key,
                    state_proof_key,
                    vote_first,
                    vote_last,
                    vote_key_dilution: dilution,
                    non_participation: nonpart,
                })
            },
        )
}

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    let payload = prop_oneof![
        arb_payment(),
        arb_asset_transfer(),
        arb_asset_config(),
        arb_asset_freeze(),
        arb_app_call(),
        arb_key_registration(),
    ];
    (arb_header(), payload).prop_map(|(header, payload)| Transaction::new(header, payload))
}

// ==================== Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn transaction_roundtrip(txn in arb_transaction()) {
        let raw = encode_transaction_raw(&txn).unwrap();
        prop_assert_eq!(decode_transaction(&raw).unwrap(), txn);
    }

    #[test]
    fn encoding_is_deterministic(txn in arb_transaction()) {
        let a = encode_transaction_raw(&txn).unwrap();
        let b = encode_transaction_raw(&txn.clone()).unwrap();
        prop_assert_eq!(&a, &b);
        let reencoded = encode_transaction_raw(&decode_transaction(&a).unwrap()).unwrap();
        prop_assert_eq!(a, reencoded);
    }

    #[test]
    fn signed_roundtrip(txn in arb_transaction(), sig in prop::collection::vec(any::<u8>(), 64)) {
        let signature = algo_crypto::Signature::from_slice(&sig).unwrap();
        let stxn = SignedTransaction::with_signature(txn, signature);
        let bytes = encode_signed_transaction(&stxn).unwrap();
        prop_assert_eq!(decode_signed_transaction(&bytes).unwrap(), stxn);
    }

    #[test]
    fn id_matches_prefixed_hash(txn in arb_transaction()) {
        let prefixed = encode_transaction(&txn).unwrap();
        prop_assert_eq!(get_transaction_id_raw(&txn).unwrap(), algo_crypto::sha512_256(&prefixed));
    }
}

// ==================== Fixed cases ====================

fn header() -> TransactionHeader {
    TransactionHeader {
        sender: Address::from_bytes([0x11; 32]),
        fee: 1000,
        first_valid: 1000,
        last_valid: 2000,
        genesis_id: "testnet-v1.0".into(),
        genesis_hash: Some(Byte32::from_bytes([0x22; 32])),
        ..Default::default()
    }
}

/// Zero values inside a nested object are omitted along with the object
#[test]
fn test_nested_omission() {
    let txn = Transaction::app_call(
        header(),
        AppCallFields {
            app_id: 7,
            global_state_schema: Some(StateSchema::default()),
            ..Default::default()
        },
    );
    let raw = encode_transaction_raw(&txn).unwrap();
    let value = algo_msgpack::decode(&raw).unwrap();
    let map = algo_msgpack::MapReader::new(&value, "txn").unwrap();
    assert!(!map.contains("apgs"));
    assert!(!map.contains("apan"));
    assert_eq!(map.u64("apid").unwrap(), 7);
}

/// Grouping assigns one id to every member and depends on pre-group bytes
#[test]
fn test_group_properties() {
    let txns: Vec<_> = (1..=4u64)
        .map(|amount| {
            Transaction::payment(
                header(),
                PaymentFields {
                    receiver: Address::from_bytes([0x33; 32]),
                    amount,
                    close_remainder_to: None,
                },
            )
        })
        .collect();

    let grouped = group_transactions(&txns).unwrap();
    let group = grouped[0].header.group.unwrap();
    assert!(grouped.iter().all(|t| t.header.group == Some(group)));

    let mut changed = txns.clone();
    changed[3] = changed[3].with_fee(2000);
    let regrouped = group_transactions(&changed).unwrap();
    assert_ne!(regrouped[0].header.group.unwrap(), group);
}

/// Fee formula across flat, extra and per-byte parameters
#[test]
fn test_fee_formula() {
    let txn = Transaction::payment(header(), PaymentFields::default());

    let flat = FeeParams::flat(2000);
    assert_eq!(assign_fee(&txn, &flat).unwrap().header.fee, 2000);

    let extra = FeeParams::flat(2000).with_extra_fee(3000);
    assert_eq!(assign_fee(&txn, &extra).unwrap().header.fee, 5000);

    let per_byte = FeeParams {
        fee_per_byte: 100,
        min_fee: 1000,
        ..Default::default()
    };
    let size = estimate_transaction_size(&txn).unwrap();
    assert_eq!(assign_fee(&txn, &per_byte).unwrap().header.fee, size * 100);
}

/// Encode/decode is total for semantically invalid transactions
#[test]
fn test_codec_independent_of_validation() {
    let txn = Transaction::asset_transfer(header(), AssetTransferFields::default());
    assert!(validate_transaction(&txn).is_err());
    let raw = encode_transaction_raw(&txn).unwrap();
    assert_eq!(decode_transaction(&raw).unwrap(), txn);
}

/// Signed batch stream decodes back in order
#[test]
fn test_signed_batch() {
    let a = SignedTransaction::with_signature(
        Transaction::payment(header(), PaymentFields::default()),
        algo_crypto::Signature::from_bytes([1u8; 64]),
    );
    let b = SignedTransaction::with_logic_signature(
        Transaction::payment(header(), PaymentFields::default()),
        LogicSignature::new(vec![0x06, 0x81, 0x01], vec![]),
    );
    let bytes = encode_signed_transactions(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(decode_signed_transactions(&bytes).unwrap(), vec![a, b]);
}
