//! Typed helpers for building and reading msgpack maps

use algo_primitives::Address;
use rmpv::Value;

use crate::MsgpackError;

/// Builder for a msgpack map with string keys
///
/// Entries may hold zero values; they are removed by the canonical pass.
#[derive(Debug, Default, Clone)]
pub struct MapBuilder {
    entries: Vec<(Value, Value)>,
}

impl MapBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.entries.push((Value::from(key), value.into()));
        self
    }

    /// Add a byte-string field
    pub fn bytes(self, key: &str, value: &[u8]) -> Self {
        self.field(key, Value::Binary(value.to_vec()))
    }

    /// Add a fixed-width byte field; all-zero values are written as nil
    pub fn fixed(self, key: &str, value: Option<&[u8]>) -> Self {
        self.field(key, fixed_value(value))
    }

    /// Add an address field; the zero address is written as nil
    pub fn address(self, key: &str, value: Option<&Address>) -> Self {
        self.fixed(key, value.map(|a| a.as_bytes().as_slice()))
    }

    /// Add an optional nested value
    pub fn optional(self, key: &str, value: Option<Value>) -> Self {
        self.field(key, value.unwrap_or(Value::Nil))
    }

    /// Finish the map
    pub fn build(self) -> Value {
        Value::Map(self.entries)
    }
}

/// Project a fixed-width byte value, mapping absent or all-zero to nil
pub fn fixed_value(value: Option<&[u8]>) -> Value {
    match value {
        Some(bytes) if bytes.iter().any(|b| *b != 0) => Value::Binary(bytes.to_vec()),
        _ => Value::Nil,
    }
}

/// Read-only view over a decoded msgpack map
///
/// Missing keys read as the zero value of the requested type, mirroring the
/// omission rule used on encode.
#[derive(Debug, Clone, Copy)]
pub struct MapReader<'a> {
    entries: &'a [(Value, Value)],
}

impl<'a> MapReader<'a> {
    /// Wrap a value that must be a map
    pub fn new(value: &'a Value, context: &str) -> Result<Self, MsgpackError> {
        match value {
            Value::Map(entries) => Ok(Self { entries }),
            _ => Err(unexpected(context, "map")),
        }
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Look up a key, treating nil as absent
    pub fn present(&self, key: &str) -> Option<&'a Value> {
        self.get(key).filter(|v| !v.is_nil())
    }

    /// Whether a key holds a non-nil value
    pub fn contains(&self, key: &str) -> bool {
        self.present(key).is_some()
    }

    /// Keys present in the map
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        let entries = self.entries;
        entries.iter().filter_map(|(k, _)| k.as_str())
    }

    /// Read an unsigned integer, zero when absent
    pub fn u64(&self, key: &str) -> Result<u64, MsgpackError> {
        self.present(key).map_or(Ok(0), |v| value_u64(v, key))
    }

    /// Read a boolean, false when absent
    pub fn bool(&self, key: &str) -> Result<bool, MsgpackError> {
        match self.present(key) {
            None => Ok(false),
            Some(v) => v.as_bool().ok_or_else(|| unexpected(key, "bool")),
        }
    }

    /// Read a string, empty when absent
    pub fn string(&self, key: &str) -> Result<String, MsgpackError> {
        match self.present(key) {
            None => Ok(String::new()),
            Some(v) => v
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| unexpected(key, "utf-8 string")),
        }
    }

    /// Read a byte string, empty when absent
    pub fn bytes(&self, key: &str) -> Result<Vec<u8>, MsgpackError> {
        self.present(key).map_or(Ok(Vec::new()), |v| value_bytes(v, key))
    }

    /// Read a fixed-width byte field
    pub fn fixed<const N: usize>(&self, key: &str) -> Result<Option<[u8; N]>, MsgpackError> {
        self.present(key).map(|v| value_fixed::<N>(v, key)).transpose()
    }

    /// Read an address field
    pub fn address(&self, key: &str) -> Result<Option<Address>, MsgpackError> {
        Ok(self.fixed::<32>(key)?.map(Address::from_bytes))
    }

    /// Read an array, empty when absent
    pub fn array(&self, key: &str) -> Result<&'a [Value], MsgpackError> {
        match self.present(key) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(unexpected(key, "array")),
        }
    }

    /// Read a nested map
    pub fn map(&self, key: &str) -> Result<Option<MapReader<'a>>, MsgpackError> {
        self.present(key).map(|v| MapReader::new(v, key)).transpose()
    }
}

/// Interpret a value as an unsigned integer
pub fn value_u64(value: &Value, context: &str) -> Result<u64, MsgpackError> {
    value.as_u64().ok_or_else(|| unexpected(context, "unsigned integer"))
}

/// Interpret a value as a byte string
pub fn value_bytes(value: &Value, context: &str) -> Result<Vec<u8>, MsgpackError> {
    value
        .as_slice()
        .map(<[u8]>::to_vec)
        .ok_or_else(|| unexpected(context, "byte string"))
}

/// Interpret a value as a fixed-width byte string
pub fn value_fixed<const N: usize>(value: &Value, context: &str) -> Result<[u8; N], MsgpackError> {
    let bytes = value
        .as_slice()
        .ok_or_else(|| unexpected(context, "byte string"))?;
    bytes.try_into().map_err(|_| MsgpackError::InvalidLength {
        field: context.to_string(),
        expected: N,
        got: bytes.len(),
    })
}

fn unexpected(field: &str, expected: &'static str) -> MsgpackError {
    MsgpackError::UnexpectedType {
        field: field.to_string(),
        expected,
    }
}
