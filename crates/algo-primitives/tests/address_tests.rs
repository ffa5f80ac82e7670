//! Address and digest property tests

use algo_primitives::{Address, AddressError, Byte32};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn address_string_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
        let addr = Address::from_bytes(bytes);
        let encoded = addr.encode();
        prop_assert_eq!(encoded.len(), Address::ENCODED_LEN);
        prop_assert_eq!(Address::from_string(&encoded).unwrap(), addr);
    }

    #[test]
    fn address_rejects_other_checksum(
        a in prop::array::uniform32(any::<u8>()),
        b in prop::array::uniform32(any::<u8>()),
    ) {
        let left = Address::from_bytes(a);
        let right = Address::from_bytes(b);
        prop_assume!(left.checksum() != right.checksum());

        // Splice right's checksum onto left's key
        let mut raw = a.to_vec();
        raw.extend_from_slice(&right.checksum());
        let forged = data_encoding::BASE32_NOPAD.encode(&raw);
        prop_assert_eq!(Address::from_string(&forged), Err(AddressError::InvalidChecksum));
    }

    #[test]
    fn byte32_base32_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
        let value = Byte32::from_bytes(bytes);
        prop_assert_eq!(Byte32::from_base32(&value.to_base32()).unwrap(), value);
    }
}

#[test]
fn test_address_ordering_follows_bytes() {
    let low = Address::from_bytes([0u8; 32]);
    let high = Address::from_bytes([1u8; 32]);
    assert!(low < high);
}
