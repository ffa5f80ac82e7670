//! ARC-4 decoding

use std::collections::BTreeMap;

use algo_primitives::Address;
use primitive_types::U512;

use super::encode::{bool_run, tuple_name};
use super::types::{count_values, ABIType, ABIValue, MAX_ARRAY_LEN};
use crate::AbiError;

/// Decode bytes against an ARC-4 type
///
/// The input must hold exactly one encoding of `abi_type`; trailing bytes are an error.
pub fn decode(abi_type: &ABIType, data: &[u8]) -> Result<ABIValue, AbiError> {
    let fail = |reason: String| AbiError::Decode {
        type_name: abi_type.to_string(),
        reason,
    };

    match abi_type {
        ABIType::Uint(bits) | ABIType::Ufixed(bits, _) => {
            let width = usize::from(*bits) / 8;
            expect_len(data, width).map_err(fail)?;
            if *bits <= 64 {
                let mut buf = [0u8; 8];
                buf[8 - width..].copy_from_slice(data);
                Ok(ABIValue::Uint(u64::from_be_bytes(buf)))
            } else {
                Ok(ABIValue::BigUint(U512::from_big_endian(data)))
            }
        }
        ABIType::Byte => {
            expect_len(data, 1).map_err(fail)?;
            Ok(ABIValue::Byte(data[0]))
        }
        ABIType::Bool => {
            expect_len(data, 1).map_err(fail)?;
            match data[0] {
                0x80 => Ok(ABIValue::Bool(true)),
                0x00 => Ok(ABIValue::Bool(false)),
                other => Err(fail(format!("invalid bool byte {:#04x}", other))),
            }
        }
        ABIType::Address => {
            expect_len(data, Address::LEN).map_err(fail)?;
            Address::from_slice(data)
                .map(ABIValue::Address)
                .map_err(|e| fail(e.to_string()))
        }
        ABIType::String => {
            let (len, body) = split_length(data).map_err(fail)?;
            expect_len(body, len).map_err(fail)?;
            String::from_utf8(body.to_vec())
                .map(ABIValue::String)
                .map_err(|e| fail(e.to_string()))
        }
        ABIType::StaticArray(child, len) => {
            let types = vec![child.as_ref(); *len];
            let elements = decode_tuple(&types, data)?;
            Ok(array_value(child, elements))
        }
        ABIType::DynamicArray(child) => {
            let (len, body) = split_length(data).map_err(fail)?;
            let types = vec![child.as_ref(); len];
            let elements = decode_tuple(&types, body)?;
            Ok(array_value(child, elements))
        }
        ABIType::Tuple(children) => {
            let types: Vec<&ABIType> = children.iter().collect();
            decode_tuple(&types, data).map(ABIValue::Array)
        }
        ABIType::Struct { fields, .. } => {
            let types: Vec<&ABIType> = fields.iter().map(|(_, t)| t).collect();
            let elements = decode_tuple(&types, data)?;
            Ok(ABIValue::Struct(
                fields
                    .iter()
                    .map(|(name, _)| name.clone())
                    .zip(elements)
                    .collect::<BTreeMap<_, _>>(),
            ))
        }
    }
}

/// Decode a sequence of values laid out with the tuple head/tail layout
pub fn decode_tuple(types: &[&ABIType], data: &[u8]) -> Result<Vec<ABIValue>, AbiError> {
    let fail = |reason: String| AbiError::Decode {
        type_name: tuple_name(types),
        reason,
    };

    enum Slot<'a> {
        Ready(ABIValue),
        Static(&'a [u8]),
        Dynamic(usize),
    }

    // Zero-width elements decode without consuming input, so cap what one call may build
    let budget = data.len().saturating_mul(8).saturating_add(MAX_ARRAY_LEN);
    match count_values(types.iter().copied()) {
        Some(count) if count <= budget => {}
        _ => return Err(fail("type expands to more values than the input can hold".into())),
    }

    let mut slots: Vec<Slot<'_>> = Vec::with_capacity(types.len());
    let mut pos = 0;
    let mut i = 0;

    while i < types.len() {
        if *types[i] == ABIType::Bool {
            let run = bool_run(&types[i..]);
            let byte = *data
                .get(pos)
                .ok_or_else(|| fail("unexpected end of input".into()))?;
            if run < 8 && byte & (0xffu8 >> run) != 0 {
                return Err(fail(format!("non-zero padding bits in bool byte {:#04x}", byte)));
            }
            for bit in 0..run {
                slots.push(Slot::Ready(ABIValue::Bool(byte & (0x80 >> bit) != 0)));
            }
            pos += 1;
            i += run;
            continue;
        }

        if types[i].is_dynamic() {
            let pointer = data
                .get(pos..pos + 2)
                .ok_or_else(|| fail("unexpected end of input".into()))?;
            slots.push(Slot::Dynamic(usize::from(u16::from_be_bytes([pointer[0], pointer[1]]))));
            pos += 2;
        } else {
            let width = types[i]
                .byte_len()
                .ok_or_else(|| fail("static element without a fixed width".into()))?;
            let bytes = data
                .get(pos..pos + width)
                .ok_or_else(|| fail("unexpected end of input".into()))?;
            slots.push(Slot::Static(bytes));
            pos += width;
        }
        i += 1;
    }

    let offsets: Vec<usize> = slots
        .iter()
        .filter_map(|s| match s {
            Slot::Dynamic(offset) => Some(*offset),
            _ => None,
        })
        .collect();

    match offsets.first() {
        None if pos != data.len() => {
            return Err(fail(format!("{} trailing bytes", data.len() - pos)));
        }
        Some(first) if *first != pos => {
            return Err(fail(format!(
                "first dynamic offset {} does not follow the head ending at {}",
                first, pos
            )));
        }
        _ => {}
    }
    if offsets.windows(2).any(|w| w[0] > w[1]) {
        return Err(fail("dynamic offsets are not in order".into()));
    }
    if offsets.last().is_some_and(|last| *last > data.len()) {
        return Err(fail("dynamic offset points past the end".into()));
    }

    let mut values = Vec::with_capacity(types.len());
    let mut dynamic_index = 0;
    let mut type_index = 0;
    for slot in slots {
        let value = match slot {
            Slot::Ready(value) => value,
            Slot::Static(bytes) => decode(types[type_index], bytes)?,
            Slot::Dynamic(start) => {
                let end = offsets
                    .get(dynamic_index + 1)
                    .copied()
                    .unwrap_or(data.len());
                dynamic_index += 1;
                decode(types[type_index], &data[start..end])?
            }
        };
        values.push(value);
        type_index += 1;
    }
    Ok(values)
}

/// Arrays of `byte` decode to a byte sequence
fn array_value(child: &ABIType, elements: Vec<ABIValue>) -> ABIValue {
    if *child == ABIType::Byte {
        return ABIValue::Bytes(
            elements
                .into_iter()
                .filter_map(|v| match v {
                    ABIValue::Byte(b) => Some(b),
                    _ => None,
                })
                .collect(),
        );
    }
    ABIValue::Array(elements)
}

fn expect_len(data: &[u8], expected: usize) -> Result<(), String> {
    if data.len() != expected {
        return Err(format!("expected {} bytes, got {}", expected, data.len()));
    }
    Ok(())
}

fn split_length(data: &[u8]) -> Result<(usize, &[u8]), String> {
    if data.len() < 2 {
        return Err("missing length prefix".into());
    }
    let len = usize::from(u16::from_be_bytes([data[0], data[1]]));
    Ok((len, &data[2..]))
}
