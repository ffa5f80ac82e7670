//! Canonical form: recursive omission of zero values and sorted map keys
//!
//! The ledger's codec never writes a map entry whose value is the zero value of
//! its type, and always writes map keys in lexicographic order. Both rules are
//! applied here as tree transforms over [`Value`], before any bytes are written,
//! so individual encoders only describe which fields exist.

use std::cmp::Ordering;

use rmpv::Value;

/// Whether a value is the zero value of its msgpack type
///
/// Maps and arrays count as empty only when they have no entries; nested zero
/// values are removed by [`omit_empty`] first.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Nil => true,
        Value::Boolean(b) => !*b,
        Value::Integer(i) => i.as_u64() == Some(0) || i.as_i64() == Some(0),
        Value::F32(f) => *f == 0.0,
        Value::F64(f) => *f == 0.0,
        Value::String(s) => s.as_bytes().is_empty(),
        Value::Binary(b) => b.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Map(entries) => entries.is_empty(),
        Value::Ext(_, data) => data.is_empty(),
    }
}

/// Drop every map entry whose value is empty, bottom-up
///
/// Array elements are kept even when empty: their position is meaningful.
pub fn omit_empty(value: Value) -> Value {
    match value {
        Value::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k, omit_empty(v)))
                .filter(|(_, v)| !is_empty_value(v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(omit_empty).collect()),
        other => other,
    }
}

/// Sort the keys of every map in the tree
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Map(entries) => {
            let mut entries: Vec<(Value, Value)> = entries
                .into_iter()
                .map(|(k, v)| (k, sort_keys(v)))
                .collect();
            entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
            Value::Map(entries)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Apply both canonical transforms
pub fn canonicalize(value: Value) -> Value {
    sort_keys(omit_empty(value))
}

fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.as_bytes().cmp(b.as_bytes()),
        (Value::Integer(a), Value::Integer(b)) => match (a.as_u64(), b.as_u64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a.as_i64().cmp(&b.as_i64()),
        },
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, Value)>) -> Value {
        Value::Map(entries.into_iter().map(|(k, v)| (Value::from(k), v)).collect())
    }

    #[test]
    fn test_empty_scalars() {
        assert!(is_empty_value(&Value::Nil));
        assert!(is_empty_value(&Value::from(0u64)));
        assert!(is_empty_value(&Value::from(false)));
        assert!(is_empty_value(&Value::from("")));
        assert!(is_empty_value(&Value::Binary(vec![])));
        assert!(!is_empty_value(&Value::Binary(vec![0])));
        assert!(!is_empty_value(&Value::from(true)));
        assert!(!is_empty_value(&Value::from(1u64)));
    }

    #[test]
    fn test_omit_nested_map_collapses() {
        let value = map(vec![
            ("keep", Value::from(5u64)),
            ("nested", map(vec![("a", Value::from(0u64)), ("b", Value::from(""))])),
        ]);
        assert_eq!(omit_empty(value), map(vec![("keep", Value::from(5u64))]));
    }

    #[test]
    fn test_omit_keeps_array_positions() {
        let value = map(vec![(
            "list",
            Value::Array(vec![Value::Binary(vec![]), map(vec![("x", Value::from(0u64))])]),
        )]);
        assert_eq!(
            omit_empty(value),
            map(vec![(
                "list",
                Value::Array(vec![Value::Binary(vec![]), Value::Map(vec![])])
            )])
        );
    }

    #[test]
    fn test_sort_keys_recursive() {
        let value = map(vec![
            ("snd", Value::from(1u64)),
            ("amt", map(vec![("z", Value::from(1u64)), ("b", Value::from(2u64))])),
        ]);
        let sorted = sort_keys(value);
        assert_eq!(
            sorted,
            map(vec![
                ("amt", map(vec![("b", Value::from(2u64)), ("z", Value::from(1u64))])),
                ("snd", Value::from(1u64)),
            ])
        );
    }

    #[test]
    fn test_sort_is_bytewise() {
        // "apaa" < "apan" < "apap" < "apat"
        let value = map(vec![
            ("apat", Value::from(1u64)),
            ("apap", Value::from(1u64)),
            ("apaa", Value::from(1u64)),
            ("apan", Value::from(1u64)),
        ]);
        let keys: Vec<String> = match sort_keys(value) {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, _)| k.as_str().unwrap_or_default().to_string())
                .collect(),
            _ => unreachable!(),
        };
        assert_eq!(keys, vec!["apaa", "apan", "apap", "apat"]);
    }
}
