//! ARC-4 encoding

use primitive_types::U512;

use super::structs::unknown_field;
use super::types::{ABIType, ABIValue, MAX_ARRAY_LEN};
use crate::AbiError;

/// Encode a value against an ARC-4 type
pub fn encode(abi_type: &ABIType, value: &ABIValue) -> Result<Vec<u8>, AbiError> {
    let fail = |reason: String| AbiError::Encode {
        type_name: abi_type.to_string(),
        reason,
    };

    match abi_type {
        ABIType::Uint(bits) | ABIType::Ufixed(bits, _) => {
            let number = value
                .as_u512()
                .ok_or_else(|| fail(format!("expected an integer, got {}", value.kind())))?;
            if number.bits() > usize::from(*bits) {
                return Err(fail(format!("value does not fit in {} bits", bits)));
            }
            Ok(encode_uint(&number, usize::from(*bits) / 8))
        }
        ABIType::Byte => match value {
            ABIValue::Byte(b) => Ok(vec![*b]),
            ABIValue::Uint(v) => u8::try_from(*v)
                .map(|b| vec![b])
                .map_err(|_| fail("value does not fit in a byte".into())),
            other => Err(fail(format!("expected a byte, got {}", other.kind()))),
        },
        ABIType::Bool => match value {
            ABIValue::Bool(b) => Ok(vec![if *b { 0x80 } else { 0x00 }]),
            other => Err(fail(format!("expected a bool, got {}", other.kind()))),
        },
        ABIType::Address => match value {
            ABIValue::Address(addr) => Ok(addr.as_bytes().to_vec()),
            other => Err(fail(format!("expected an address, got {}", other.kind()))),
        },
        ABIType::String => match value {
            ABIValue::String(s) => {
                let mut out = encode_length(s.len()).map_err(fail)?;
                out.extend_from_slice(s.as_bytes());
                Ok(out)
            }
            other => Err(fail(format!("expected a string, got {}", other.kind()))),
        },
        ABIType::StaticArray(child, len) => {
            let elements = array_elements(child, value).map_err(fail)?;
            if elements.len() != *len {
                return Err(fail(format!(
                    "expected {} elements, got {}",
                    len,
                    elements.len()
                )));
            }
            let types = vec![child.as_ref(); *len];
            encode_tuple(&types, &elements)
        }
        ABIType::DynamicArray(child) => {
            let elements = array_elements(child, value).map_err(fail)?;
            let mut out = encode_length(elements.len()).map_err(fail)?;
            let types = vec![child.as_ref(); elements.len()];
            out.extend(encode_tuple(&types, &elements)?);
            Ok(out)
        }
        ABIType::Tuple(children) => {
            let elements = value
                .as_array()
                .ok_or_else(|| fail(format!("expected a tuple, got {}", value.kind())))?;
            if elements.len() != children.len() {
                return Err(fail(format!(
                    "expected {} elements, got {}",
                    children.len(),
                    elements.len()
                )));
            }
            let types: Vec<&ABIType> = children.iter().collect();
            encode_tuple(&types, elements)
        }
        ABIType::Struct { fields, .. } => {
            let elements = match value {
                ABIValue::Struct(map) => {
                    if let Some(key) = unknown_field(fields, map) {
                        return Err(fail(format!("unknown field `{}`", key)));
                    }
                    fields
                        .iter()
                        .map(|(name, _)| {
                            map.get(name)
                                .cloned()
                                .ok_or_else(|| fail(format!("missing field `{}`", name)))
                        })
                        .collect::<Result<Vec<_>, _>>()?
                }
                ABIValue::Array(items) if items.len() == fields.len() => items.clone(),
                other => return Err(fail(format!("expected a struct, got {}", other.kind()))),
            };
            let types: Vec<&ABIType> = fields.iter().map(|(_, t)| t).collect();
            encode_tuple(&types, &elements)
        }
    }
}

/// Encode a sequence of values with the tuple head/tail layout
///
/// Consecutive bools share bytes, eight per byte, most significant bit first.
/// Dynamic elements leave a 2-byte offset in the head and their bytes in the tail.
pub fn encode_tuple(types: &[&ABIType], values: &[ABIValue]) -> Result<Vec<u8>, AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::Encode {
            type_name: tuple_name(types),
            reason: format!("expected {} elements, got {}", types.len(), values.len()),
        });
    }

    let mut heads: Vec<Vec<u8>> = Vec::new();
    let mut tails: Vec<Option<Vec<u8>>> = Vec::new();

    let mut i = 0;
    while i < types.len() {
        if *types[i] == ABIType::Bool {
            let run = bool_run(&types[i..]);
            let mut packed = 0u8;
            for (bit, value) in values[i..i + run].iter().enumerate() {
                match value {
                    ABIValue::Bool(true) => packed |= 0x80 >> bit,
                    ABIValue::Bool(false) => {}
                    other => {
                        return Err(AbiError::Encode {
                            type_name: "bool".into(),
                            reason: format!("expected a bool, got {}", other.kind()),
                        })
                    }
                }
            }
            heads.push(vec![packed]);
            tails.push(None);
            i += run;
            continue;
        }

        let encoded = encode(types[i], &values[i])?;
        if types[i].is_dynamic() {
            heads.push(vec![0, 0]);
            tails.push(Some(encoded));
        } else {
            heads.push(encoded);
            tails.push(None);
        }
        i += 1;
    }

    let head_len: usize = heads.iter().map(Vec::len).sum();
    let mut offset = head_len;
    for (head, tail) in heads.iter_mut().zip(&tails) {
        if let Some(tail) = tail {
            let pointer = u16::try_from(offset).map_err(|_| AbiError::Encode {
                type_name: tuple_name(types),
                reason: "encoding exceeds the 2-byte offset range".into(),
            })?;
            head.copy_from_slice(&pointer.to_be_bytes());
            offset += tail.len();
        }
    }

    let mut out = Vec::with_capacity(offset);
    for head in heads {
        out.extend(head);
    }
    for tail in tails.into_iter().flatten() {
        out.extend(tail);
    }
    Ok(out)
}

/// Length of the run of bools at the start of `types`, capped at 8
pub(crate) fn bool_run(types: &[&ABIType]) -> usize {
    types
        .iter()
        .take(8)
        .take_while(|t| ***t == ABIType::Bool)
        .count()
}

pub(crate) fn tuple_name(types: &[&ABIType]) -> String {
    ABIType::Tuple(types.iter().map(|t| (*t).clone()).collect()).to_string()
}

fn encode_uint(number: &U512, width: usize) -> Vec<u8> {
    let mut buf = [0u8; 64];
    number.to_big_endian(&mut buf);
    buf[64 - width..].to_vec()
}

fn encode_length(len: usize) -> Result<Vec<u8>, String> {
    if len > MAX_ARRAY_LEN {
        return Err(format!("length {} exceeds 65535", len));
    }
    Ok((len as u16).to_be_bytes().to_vec())
}

fn array_elements(child: &ABIType, value: &ABIValue) -> Result<Vec<ABIValue>, String> {
    match value {
        ABIValue::Array(items) => Ok(items.clone()),
        ABIValue::Bytes(bytes) if *child == ABIType::Byte => {
            Ok(bytes.iter().map(|b| ABIValue::Byte(*b)).collect())
        }
        ABIValue::String(s) if *child == ABIType::Byte => {
            Ok(s.bytes().map(ABIValue::Byte).collect())
        }
        other => Err(format!("expected an array, got {}", other.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algo_primitives::Address;

    fn ty(s: &str) -> ABIType {
        ABIType::parse(s).unwrap()
    }

    #[test]
    fn test_encode_uint() {
        assert_eq!(encode(&ty("uint64"), &ABIValue::Uint(1)).unwrap(), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(encode(&ty("uint8"), &ABIValue::Uint(255)).unwrap(), [255]);
        assert!(encode(&ty("uint8"), &ABIValue::Uint(256)).is_err());
        let wide = encode(&ty("uint512"), &ABIValue::BigUint(U512::MAX)).unwrap();
        assert_eq!(wide, vec![0xff; 64]);
    }

    #[test]
    fn test_encode_bool_array_packing() {
        let pattern = [true, false, false, true, false, false, true, false, true];
        let value = ABIValue::Array(pattern.iter().map(|b| ABIValue::Bool(*b)).collect());
        assert_eq!(encode(&ty("bool[9]"), &value).unwrap(), [146, 128]);

        let all_true = ABIValue::Array(vec![ABIValue::Bool(true); 8]);
        assert_eq!(encode(&ty("bool[8]"), &all_true).unwrap(), [255]);
    }

    #[test]
    fn test_encode_dynamic_bool_array() {
        let value = ABIValue::Array(vec![ABIValue::Bool(false), ABIValue::Bool(true)]);
        assert_eq!(encode(&ty("bool[]"), &value).unwrap(), [0, 2, 0x40]);
    }

    #[test]
    fn test_encode_string() {
        assert_eq!(
            encode(&ty("string"), &ABIValue::from("abc")).unwrap(),
            [0, 3, b'a', b'b', b'c']
        );
    }

    #[test]
    fn test_encode_tuple_head_tail() {
        // (uint16,string,bool,bool)
        let value = ABIValue::Array(vec![
            ABIValue::Uint(7),
            ABIValue::from("hi"),
            ABIValue::Bool(true),
            ABIValue::Bool(true),
        ]);
        let out = encode(&ty("(uint16,string,bool,bool)"), &value).unwrap();
        // head: uint16 (2) + offset (2) + packed bools (1) = 5
        assert_eq!(out, [0, 7, 0, 5, 0xc0, 0, 2, b'h', b'i']);
    }

    #[test]
    fn test_encode_byte_array_from_bytes() {
        let out = encode(&ty("byte[]"), &ABIValue::Bytes(vec![1, 2, 3])).unwrap();
        assert_eq!(out, [0, 3, 1, 2, 3]);
    }

    #[test]
    fn test_encode_address() {
        let addr = Address::from_bytes([7u8; 32]);
        assert_eq!(encode(&ty("address"), &ABIValue::Address(addr)).unwrap(), vec![7u8; 32]);
    }

    #[test]
    fn test_encode_mismatch_names_type() {
        let err = encode(&ty("uint64[2]"), &ABIValue::Array(vec![ABIValue::Uint(1)])).unwrap_err();
        assert!(err.to_string().contains("uint64[2]"));
        let err = encode(&ty("bool"), &ABIValue::Uint(1)).unwrap_err();
        assert!(err.to_string().contains("bool"));
    }

    #[test]
    fn test_encode_struct_rejects_unknown_field() {
        let point = ABIType::Struct {
            name: "P".into(),
            fields: vec![("x".into(), ABIType::Uint(8))],
        };
        let exact = ABIValue::Struct([("x".to_string(), ABIValue::Uint(1))].into());
        assert_eq!(encode(&point, &exact).unwrap(), [1]);

        let extra = ABIValue::Struct(
            [("x".to_string(), ABIValue::Uint(1)), ("junk".to_string(), ABIValue::Uint(9))].into(),
        );
        let err = encode(&point, &extra).unwrap_err();
        assert!(err.to_string().contains("`junk`"));
    }
}
