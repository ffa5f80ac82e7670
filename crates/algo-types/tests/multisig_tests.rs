//! Multisig engine tests for algo-types

use algo_crypto::{public_key_to_address, sign, verify, PrivateKey, Signature};
use algo_primitives::Address;
use algo_types::{
    address_from_multisig_signature, apply_multisig_subsignature, encode_transaction,
    merge_multisignatures, new_multisig_signature, MultisigSignature, PaymentFields,
    Transaction, TransactionHeader,
};
use proptest::prelude::*;

fn participants(n: u8) -> Vec<Address> {
    (1..=n).map(|i| Address::from_bytes([i; 32])).collect()
}

/// Sign the slots selected by `mask`
fn signed_subset(base: &MultisigSignature, mask: &[bool], seed: u8) -> MultisigSignature {
    let mut msig = base.clone();
    for (i, selected) in mask.iter().enumerate() {
        if *selected {
            let address = base.subsignatures[i].address;
            let signature = Signature::from_bytes([seed.wrapping_add(i as u8); 64]);
            msig = apply_multisig_subsignature(&msig, &address, signature).unwrap();
        }
    }
    msig
}

proptest! {
    #[test]
    fn address_ignores_signatures(
        mask in prop::collection::vec(any::<bool>(), 4),
        threshold in 1u8..=4,
    ) {
        let base = new_multisig_signature(1, threshold, &participants(4)).unwrap();
        let signed = signed_subset(&base, &mask, 10);
        prop_assert_eq!(
            address_from_multisig_signature(&base),
            address_from_multisig_signature(&signed)
        );
    }

    #[test]
    fn merge_never_regresses(
        mask_a in prop::collection::vec(any::<bool>(), 5),
        mask_b in prop::collection::vec(any::<bool>(), 5),
    ) {
        let base = new_multisig_signature(1, 3, &participants(5)).unwrap();
        let a = signed_subset(&base, &mask_a, 1);
        let b = signed_subset(&base, &mask_b, 100);
        let merged = merge_multisignatures(&a, &b).unwrap();

        for i in 0..5 {
            let slot = &merged.subsignatures[i];
            if b.subsignatures[i].signature.is_some() {
                prop_assert_eq!(slot.signature, b.subsignatures[i].signature);
            } else {
                prop_assert_eq!(slot.signature, a.subsignatures[i].signature);
            }
            if a.subsignatures[i].signature.is_some() {
                prop_assert!(slot.signature.is_some());
            }
        }
        prop_assert_eq!(merged.participants(), base.participants());
    }
}

/// Two signers sign independently, the merged set verifies for both
#[test]
fn test_collect_signatures_from_two_signers() {
    let key_a = PrivateKey::from_bytes(&[1u8; 32]);
    let key_b = PrivateKey::from_bytes(&[2u8; 32]);
    let key_c = PrivateKey::from_bytes(&[3u8; 32]);
    let addrs: Vec<Address> = [&key_a, &key_b, &key_c]
        .iter()
        .map(|k| public_key_to_address(&k.verifying_key()))
        .collect();

    let msig = new_multisig_signature(1, 2, &addrs).unwrap();
    let txn = Transaction::payment(
        TransactionHeader {
            sender: msig.address(),
            fee: 1000,
            first_valid: 1,
            last_valid: 100,
            ..Default::default()
        },
        PaymentFields {
            receiver: addrs[2],
            amount: 10,
            close_remainder_to: None,
        },
    );
    let bytes = encode_transaction(&txn).unwrap();

    let from_a = apply_multisig_subsignature(&msig, &addrs[0], sign(&bytes, &key_a)).unwrap();
    let from_b = apply_multisig_subsignature(&msig, &addrs[1], sign(&bytes, &key_b)).unwrap();
    let merged = merge_multisignatures(&from_a, &from_b).unwrap();

    assert_eq!(merged.signed_count(), 2);
    assert!(merged.meets_threshold());
    for sub in merged.subsignatures.iter().filter(|s| s.signature.is_some()) {
        let signature = sub.signature.unwrap();
        assert!(verify(&bytes, &signature, &sub.address).unwrap());
    }
}

/// Weighted multisig: one key in two slots is filled by a single apply
#[test]
fn test_weighted_participant() {
    let p = participants(2);
    let weighted = vec![p[0], p[1], p[0]];
    let msig = new_multisig_signature(1, 2, &weighted).unwrap();
    let signed =
        apply_multisig_subsignature(&msig, &p[0], Signature::from_bytes([9u8; 64])).unwrap();
    assert_eq!(signed.signed_count(), 2);
    assert!(signed.meets_threshold());
    assert_ne!(msig.address(), new_multisig_signature(1, 2, &p).unwrap().address());
}
