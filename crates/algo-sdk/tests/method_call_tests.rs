//! Method-call encoding tests for algo-sdk

use algo_primitives::Address;
use algo_sdk::abi::{decode_tuple, encode, get_abi_method, ABIType, ABIValue};
use algo_sdk::{encode_method_call, MethodCallArg, TxBuilder};
use algo_types::{AppCallFields, PaymentFields, Transaction, TransactionHeader};

fn uint8_method(count: usize) -> String {
    format!("many({})void", vec!["uint8"; count].join(","))
}

fn uint8_args(count: usize) -> Vec<MethodCallArg> {
    (0..count as u64)
        .map(|i| MethodCallArg::Value(ABIValue::Uint(i)))
        .collect()
}

fn app(app_id: u64) -> AppCallFields {
    AppCallFields {
        app_id,
        ..Default::default()
    }
}

#[test]
fn test_fifteen_args_are_not_packed() {
    let method = get_abi_method(&uint8_method(15)).unwrap();
    let call = encode_method_call(&method, &uint8_args(15), &Address::ZERO, app(1)).unwrap();
    assert_eq!(call.fields.args.len(), 16);
    for (i, arg) in call.fields.args[1..].iter().enumerate() {
        assert_eq!(&arg[..], [i as u8]);
    }
}

#[test]
fn test_sixteen_args_pack_the_tail() {
    let method = get_abi_method(&uint8_method(16)).unwrap();
    let call = encode_method_call(&method, &uint8_args(16), &Address::ZERO, app(1)).unwrap();
    assert_eq!(call.fields.args.len(), 16);
    assert_eq!(&call.fields.args[14][..], [13]);
    assert_eq!(&call.fields.args[15][..], [14, 15]);
}

#[test]
fn test_packed_tail_decodes_as_tuple() {
    let method = get_abi_method(
        "big(uint8,uint8,uint8,uint8,uint8,uint8,uint8,uint8,uint8,uint8,uint8,uint8,uint8,uint8,string,bool,uint64)void",
    )
    .unwrap();
    let mut args = uint8_args(14);
    args.push(ABIValue::from("tail").into());
    args.push(ABIValue::Bool(true).into());
    args.push(ABIValue::Uint(99).into());

    let call = encode_method_call(&method, &args, &Address::ZERO, app(1)).unwrap();
    assert_eq!(call.fields.args.len(), 16);

    let types = [ABIType::String, ABIType::Bool, ABIType::Uint(64)];
    let refs: Vec<&ABIType> = types.iter().collect();
    let decoded = decode_tuple(&refs, &call.fields.args[15]).unwrap();
    assert_eq!(
        decoded,
        vec![ABIValue::from("tail"), ABIValue::Bool(true), ABIValue::Uint(99)]
    );
}

#[test]
fn test_references_count_toward_packing() {
    let method = get_abi_method(&format!("refs({},account,account)void", vec!["uint8"; 14].join(",")))
        .unwrap();
    let sender = Address::from_bytes([1u8; 32]);
    let other = Address::from_bytes([2u8; 32]);
    let mut args = uint8_args(14);
    args.push(MethodCallArg::Account(sender));
    args.push(MethodCallArg::Account(other));

    let call = encode_method_call(&method, &args, &sender, app(1)).unwrap();
    assert_eq!(call.fields.args.len(), 16);
    assert_eq!(&call.fields.args[15][..], [0, 1]);
    assert_eq!(call.fields.account_references, vec![other]);
}

#[test]
fn test_existing_references_are_reused() {
    let method = get_abi_method("touch(account,asset,application)void").unwrap();
    let known = Address::from_bytes([5u8; 32]);
    let mut fields = app(1);
    fields.account_references = vec![Address::from_bytes([4u8; 32]), known];
    fields.asset_references = vec![10, 11];
    fields.app_references = vec![7];

    let call = encode_method_call(
        &method,
        &[
            MethodCallArg::Account(known),
            MethodCallArg::Asset(11),
            MethodCallArg::Application(7),
        ],
        &Address::ZERO,
        fields,
    )
    .unwrap();

    let encoded: Vec<Vec<u8>> = call.fields.args[1..].iter().map(|a| a.to_vec()).collect();
    assert_eq!(encoded, vec![vec![2], vec![1], vec![1]]);
    assert_eq!(call.fields.account_references.len(), 2);
    assert_eq!(call.fields.asset_references.len(), 2);
    assert_eq!(call.fields.app_references.len(), 1);
}

#[test]
fn test_builder_groups_transaction_args() {
    let sender = Address::from_bytes([1u8; 32]);
    let builder = TxBuilder::new(sender).validity(100, 200).flat_fee(1000);
    let pay = builder
        .payment(Address::from_bytes([2u8; 32]), 1_000_000)
        .unwrap();
    let method = get_abi_method("deposit(pay,string)uint64").unwrap();

    let txns = builder
        .method_call(
            &method,
            &[pay.clone().into(), ABIValue::from("memo").into()],
            app(42),
        )
        .unwrap();

    assert_eq!(txns.len(), 2);
    let group = txns[0].header.group.unwrap();
    assert_eq!(txns[1].header.group, Some(group));
    assert_eq!(txns[0].payload, pay.payload);

    let algo_types::TransactionPayload::AppCall(fields) = &txns[1].payload else {
        panic!("expected app call");
    };
    assert_eq!(fields.app_id, 42);
    assert_eq!(fields.args.len(), 2);
    assert_eq!(
        &fields.args[1][..],
        encode(&ABIType::String, &ABIValue::from("memo")).unwrap()
    );
}

#[test]
fn test_wrong_transaction_kind() {
    let method = get_abi_method("opt(axfer)void").unwrap();
    let pay = Transaction::payment(TransactionHeader::default(), PaymentFields::default());
    let err = encode_method_call(&method, &[pay.into()], &Address::ZERO, app(1)).unwrap_err();
    assert!(err.to_string().contains("axfer"));
}
