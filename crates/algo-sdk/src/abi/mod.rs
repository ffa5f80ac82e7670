//! ARC-4 ABI encoding and decoding
//!
//! This module provides functionality for:
//! - Parsing type strings into [`ABIType`]
//! - Encoding and decoding [`ABIValue`]s with the head/tail layout
//! - Method signatures, selectors and return-value logs
//!
//! # Example
//!
//! ```rust
//! use algo_sdk::abi::{decode, encode, get_abi_method, ABIType, ABIValue};
//!
//! let ty: ABIType = "(uint64,string)".parse().unwrap();
//! let value = ABIValue::Array(vec![ABIValue::Uint(1), ABIValue::from("hi")]);
//! let bytes = encode(&ty, &value).unwrap();
//! assert_eq!(decode(&ty, &bytes).unwrap(), value);
//!
//! let add = get_abi_method("add(uint64,uint64)uint64").unwrap();
//! assert_eq!(add.selector(), [0xfe, 0x6b, 0xdf, 0x69]);
//! ```

mod decode;
mod encode;
mod method;
mod structs;
mod types;

pub use decode::{decode, decode_tuple};
pub use encode::{encode, encode_tuple};
pub use method::{
    get_abi_method, get_abi_method_selector, ABIContract, ABIMethod, ABIMethodArg,
    ABIMethodArgType, ABIReferenceType, ABITransactionType, RETURN_PREFIX,
};
pub use structs::{get_struct_value_from_tuple_value, get_tuple_value_from_struct_value};
pub use types::{
    ABIType, ABIValue, MAX_ARRAY_LEN, MAX_BIT_SIZE, MAX_NESTING_DEPTH, MAX_PRECISION,
};

/// Encode a value against a type string
pub fn encode_abi_value(type_str: &str, value: &ABIValue) -> Result<Vec<u8>, crate::AbiError> {
    encode(&ABIType::parse(type_str)?, value)
}

/// Decode bytes against a type string
pub fn decode_abi_value(type_str: &str, data: &[u8]) -> Result<ABIValue, crate::AbiError> {
    decode(&ABIType::parse(type_str)?, data)
}
