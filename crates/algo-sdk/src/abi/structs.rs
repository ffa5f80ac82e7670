//! Struct and tuple value conversion
//!
//! A struct encodes exactly like the tuple of its field types, so converting
//! between the two is a renaming over the value tree.

use std::collections::BTreeMap;

use super::types::{ABIType, ABIValue};
use crate::AbiError;

/// First key of a struct value that names no field of the struct type
pub(crate) fn unknown_field<'a>(
    fields: &[(String, ABIType)],
    map: &'a BTreeMap<String, ABIValue>,
) -> Option<&'a str> {
    map.keys()
        .find(|key| !fields.iter().any(|(name, _)| name == *key))
        .map(String::as_str)
}

/// Convert a struct value (possibly nested) into its positional tuple form
pub fn get_tuple_value_from_struct_value(
    abi_type: &ABIType,
    value: &ABIValue,
) -> Result<ABIValue, AbiError> {
    let fail = |reason: String| AbiError::Encode {
        type_name: abi_type.to_string(),
        reason,
    };

    match (abi_type, value) {
        (ABIType::Struct { fields, .. }, ABIValue::Struct(map)) => {
            if let Some(key) = unknown_field(fields, map) {
                return Err(fail(format!("unknown field `{}`", key)));
            }
            fields
                .iter()
                .map(|(name, field_type)| {
                    let field = map
                        .get(name)
                        .ok_or_else(|| fail(format!("missing field `{}`", name)))?;
                    get_tuple_value_from_struct_value(field_type, field)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ABIValue::Array)
        }
        (ABIType::Struct { .. }, other) => {
            Err(fail(format!("expected a struct, got {}", other.kind())))
        }
        (ABIType::Tuple(children), ABIValue::Array(items)) => {
            if children.len() != items.len() {
                return Err(fail(format!(
                    "expected {} elements, got {}",
                    children.len(),
                    items.len()
                )));
            }
            children
                .iter()
                .zip(items)
                .map(|(t, v)| get_tuple_value_from_struct_value(t, v))
                .collect::<Result<Vec<_>, _>>()
                .map(ABIValue::Array)
        }
        (ABIType::StaticArray(child, _) | ABIType::DynamicArray(child), ABIValue::Array(items)) => {
            items
                .iter()
                .map(|v| get_tuple_value_from_struct_value(child, v))
                .collect::<Result<Vec<_>, _>>()
                .map(ABIValue::Array)
        }
        _ => Ok(value.clone()),
    }
}

/// Convert a positional tuple value into named struct form wherever the type names a struct
pub fn get_struct_value_from_tuple_value(
    abi_type: &ABIType,
    value: &ABIValue,
) -> Result<ABIValue, AbiError> {
    let fail = |reason: String| AbiError::Decode {
        type_name: abi_type.to_string(),
        reason,
    };

    match (abi_type, value) {
        (ABIType::Struct { fields, .. }, ABIValue::Array(items)) => {
            if fields.len() != items.len() {
                return Err(fail(format!(
                    "expected {} fields, got {}",
                    fields.len(),
                    items.len()
                )));
            }
            let mut map = BTreeMap::new();
            for ((name, field_type), item) in fields.iter().zip(items) {
                map.insert(name.clone(), get_struct_value_from_tuple_value(field_type, item)?);
            }
            Ok(ABIValue::Struct(map))
        }
        (ABIType::Struct { .. }, ABIValue::Struct(_)) => Ok(value.clone()),
        (ABIType::Struct { .. }, other) => {
            Err(fail(format!("expected a tuple, got {}", other.kind())))
        }
        (ABIType::Tuple(children), ABIValue::Array(items)) => {
            if children.len() != items.len() {
                return Err(fail(format!(
                    "expected {} elements, got {}",
                    children.len(),
                    items.len()
                )));
            }
            children
                .iter()
                .zip(items)
                .map(|(t, v)| get_struct_value_from_tuple_value(t, v))
                .collect::<Result<Vec<_>, _>>()
                .map(ABIValue::Array)
        }
        (ABIType::StaticArray(child, _) | ABIType::DynamicArray(child), ABIValue::Array(items)) => {
            items
                .iter()
                .map(|v| get_struct_value_from_tuple_value(child, v))
                .collect::<Result<Vec<_>, _>>()
                .map(ABIValue::Array)
        }
        _ => Ok(value.clone()),
    }
}
