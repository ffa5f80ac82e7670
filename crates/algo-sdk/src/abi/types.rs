//! ARC-4 type and value definitions

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use algo_primitives::Address;
use primitive_types::U512;

use crate::AbiError;

/// Largest static array length and dynamic length prefix
pub const MAX_ARRAY_LEN: usize = u16::MAX as usize;

/// Largest integer bit size
pub const MAX_BIT_SIZE: u16 = 512;

/// Largest ufixed precision
pub const MAX_PRECISION: u8 = 160;

/// Deepest array/tuple nesting accepted by the type parser
pub const MAX_NESTING_DEPTH: usize = 32;

/// Parsed ARC-4 type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ABIType {
    /// `uint<N>`, N in 8..=512, multiple of 8
    Uint(u16),
    /// `ufixed<N>x<M>`, M in 1..=160
    Ufixed(u16, u8),
    /// `byte` (alias of uint8 with byte-sequence decoding in arrays)
    Byte,
    /// `bool`
    Bool,
    /// `address` (32 bytes)
    Address,
    /// `string` (dynamic UTF-8)
    String,
    /// `T[N]`
    StaticArray(Box<ABIType>, usize),
    /// `T[]`
    DynamicArray(Box<ABIType>),
    /// `(T1,T2,...)`
    Tuple(Vec<ABIType>),
    /// Named tuple; same byte layout as the tuple of its field types
    Struct {
        /// Struct name
        name: String,
        /// Ordered named fields
        fields: Vec<(String, ABIType)>,
    },
}

impl ABIType {
    /// Parse an ARC-4 type string
    pub fn parse(s: &str) -> Result<Self, AbiError> {
        Self::parse_nested(s, 0)
    }

    fn parse_nested(s: &str, depth: usize) -> Result<Self, AbiError> {
        let invalid = |reason: &str| AbiError::InvalidType {
            type_str: s.to_string(),
            reason: reason.to_string(),
        };
        if depth > MAX_NESTING_DEPTH {
            return Err(invalid("nesting too deep"));
        }

        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(ABIType::DynamicArray(Box::new(Self::parse_nested(inner, depth + 1)?)));
        }
        if s.ends_with(']') {
            let open = s.rfind('[').ok_or_else(|| invalid("unbalanced brackets"))?;
            let len_str = &s[open + 1..s.len() - 1];
            if len_str.is_empty() || !len_str.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("array length must be a decimal number"));
            }
            let len: usize = len_str
                .parse()
                .map_err(|_| invalid("array length out of range"))?;
            if len > MAX_ARRAY_LEN {
                return Err(invalid("array length exceeds 65535"));
            }
            let child = Self::parse_nested(&s[..open], depth + 1)?;
            return Ok(ABIType::StaticArray(Box::new(child), len));
        }
        if s.starts_with('(') {
            if !s.ends_with(')') {
                return Err(invalid("unbalanced parentheses"));
            }
            let children = split_tuple(&s[1..s.len() - 1]).map_err(|reason| invalid(&reason))?;
            return Ok(ABIType::Tuple(
                children
                    .into_iter()
                    .map(|child| Self::parse_nested(child, depth + 1))
                    .collect::<Result<_, _>>()?,
            ));
        }

        match s {
            "byte" => return Ok(ABIType::Byte),
            "bool" => return Ok(ABIType::Bool),
            "address" => return Ok(ABIType::Address),
            "string" => return Ok(ABIType::String),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix("ufixed") {
            let (bits, precision) = rest
                .split_once('x')
                .ok_or_else(|| invalid("expected ufixed<N>x<M>"))?;
            let bits = parse_bit_size(bits).map_err(|r| invalid(&r))?;
            let precision: u8 = parse_decimal(precision)
                .and_then(|p| u8::try_from(p).ok())
                .ok_or_else(|| invalid("invalid precision"))?;
            if precision == 0 || precision > MAX_PRECISION {
                return Err(invalid("precision must be in 1..=160"));
            }
            return Ok(ABIType::Ufixed(bits, precision));
        }
        if let Some(rest) = s.strip_prefix("uint") {
            return Ok(ABIType::Uint(parse_bit_size(rest).map_err(|r| invalid(&r))?));
        }

        Err(invalid("unknown type"))
    }

    /// Whether the encoding has a variable length
    pub fn is_dynamic(&self) -> bool {
        match self {
            ABIType::String | ABIType::DynamicArray(_) => true,
            ABIType::StaticArray(child, _) => child.is_dynamic(),
            ABIType::Tuple(children) => children.iter().any(ABIType::is_dynamic),
            ABIType::Struct { fields, .. } => fields.iter().any(|(_, t)| t.is_dynamic()),
            _ => false,
        }
    }

    /// Encoded length of a static type
    ///
    /// `None` for dynamic types and for static types whose width overflows `usize`.
    pub fn byte_len(&self) -> Option<usize> {
        match self {
            ABIType::Uint(bits) | ABIType::Ufixed(bits, _) => Some(usize::from(*bits) / 8),
            ABIType::Byte | ABIType::Bool => Some(1),
            ABIType::Address => Some(Address::LEN),
            ABIType::String | ABIType::DynamicArray(_) => None,
            ABIType::StaticArray(child, len) => match child.as_ref() {
                ABIType::Bool => Some(len.div_ceil(8)),
                other => other.byte_len()?.checked_mul(*len),
            },
            ABIType::Tuple(children) => tuple_byte_len(children.iter()),
            ABIType::Struct { fields, .. } => tuple_byte_len(fields.iter().map(|(_, t)| t)),
        }
    }

    /// Number of values a decode of this type materializes, counting containers
    ///
    /// Dynamic types count as one since their size is bounded by the input.
    pub(crate) fn value_count(&self) -> Option<usize> {
        match self {
            ABIType::StaticArray(child, len) => {
                child.value_count()?.checked_mul(*len)?.checked_add(1)
            }
            ABIType::Tuple(children) => count_values(children.iter())?.checked_add(1),
            ABIType::Struct { fields, .. } => {
                count_values(fields.iter().map(|(_, t)| t))?.checked_add(1)
            }
            _ => Some(1),
        }
    }

    /// Equivalent tuple type, with struct names removed recursively
    pub fn to_tuple_type(&self) -> ABIType {
        match self {
            ABIType::Struct { fields, .. } => {
                ABIType::Tuple(fields.iter().map(|(_, t)| t.to_tuple_type()).collect())
            }
            ABIType::Tuple(children) => {
                ABIType::Tuple(children.iter().map(ABIType::to_tuple_type).collect())
            }
            ABIType::StaticArray(child, len) => {
                ABIType::StaticArray(Box::new(child.to_tuple_type()), *len)
            }
            ABIType::DynamicArray(child) => ABIType::DynamicArray(Box::new(child.to_tuple_type())),
            other => other.clone(),
        }
    }
}

fn tuple_byte_len<'a>(children: impl Iterator<Item = &'a ABIType>) -> Option<usize> {
    let mut total: usize = 0;
    let mut bool_run: usize = 0;
    for child in children {
        if *child == ABIType::Bool {
            bool_run += 1;
            continue;
        }
        total = total
            .checked_add(bool_run.div_ceil(8))?
            .checked_add(child.byte_len()?)?;
        bool_run = 0;
    }
    total.checked_add(bool_run.div_ceil(8))
}

pub(crate) fn count_values<'a>(mut types: impl Iterator<Item = &'a ABIType>) -> Option<usize> {
    types.try_fold(0usize, |total, t| total.checked_add(t.value_count()?))
}

fn parse_decimal(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_bit_size(s: &str) -> Result<u16, String> {
    let bits = parse_decimal(s).ok_or_else(|| "invalid bit size".to_string())?;
    if bits == 0 || bits > u64::from(MAX_BIT_SIZE) || bits % 8 != 0 {
        return Err("bit size must be a multiple of 8 in 8..=512".to_string());
    }
    Ok(bits as u16)
}

/// Split the inside of a tuple at top-level commas
pub(crate) fn split_tuple(s: &str) -> Result<Vec<&str>, String> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced parentheses".to_string())?
            }
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced parentheses".to_string());
    }
    parts.push(&s[start..]);
    if parts.iter().any(|p| p.is_empty()) {
        return Err("empty tuple element".to_string());
    }
    Ok(parts)
}

impl fmt::Display for ABIType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ABIType::Uint(bits) => write!(f, "uint{}", bits),
            ABIType::Ufixed(bits, precision) => write!(f, "ufixed{}x{}", bits, precision),
            ABIType::Byte => f.write_str("byte"),
            ABIType::Bool => f.write_str("bool"),
            ABIType::Address => f.write_str("address"),
            ABIType::String => f.write_str("string"),
            ABIType::StaticArray(child, len) => write!(f, "{}[{}]", child, len),
            ABIType::DynamicArray(child) => write!(f, "{}[]", child),
            ABIType::Tuple(children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
            ABIType::Struct { .. } => write!(f, "{}", self.to_tuple_type()),
        }
    }
}

impl FromStr for ABIType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ABIType::parse(s)
    }
}

/// ARC-4 value
///
/// Integers of at most 64 bits decode as [`ABIValue::Uint`], wider ones as
/// [`ABIValue::BigUint`]; arrays of `byte` decode as [`ABIValue::Bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ABIValue {
    /// `bool`
    Bool(bool),
    /// Integer that fits in 64 bits
    Uint(u64),
    /// Integer wider than 64 bits
    BigUint(U512),
    /// `byte`
    Byte(u8),
    /// `string`
    String(String),
    /// Array of `byte`
    Bytes(Vec<u8>),
    /// `address`
    Address(Address),
    /// Array or tuple
    Array(Vec<ABIValue>),
    /// Struct, keyed by field name
    Struct(BTreeMap<String, ABIValue>),
}

impl ABIValue {
    /// Integer value, widened
    pub fn as_u512(&self) -> Option<U512> {
        match self {
            ABIValue::Uint(v) => Some(U512::from(*v)),
            ABIValue::BigUint(v) => Some(*v),
            ABIValue::Byte(v) => Some(U512::from(*v)),
            _ => None,
        }
    }

    /// Integer value, if it fits in 64 bits
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ABIValue::Uint(v) => Some(*v),
            ABIValue::Byte(v) => Some(u64::from(*v)),
            ABIValue::BigUint(v) if v.bits() <= 64 => Some(v.low_u64()),
            _ => None,
        }
    }

    /// Boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ABIValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ABIValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Array or tuple elements
    pub fn as_array(&self) -> Option<&[ABIValue]> {
        match self {
            ABIValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Short description of the value's shape, for error messages
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ABIValue::Bool(_) => "bool",
            ABIValue::Uint(_) | ABIValue::BigUint(_) => "integer",
            ABIValue::Byte(_) => "byte",
            ABIValue::String(_) => "string",
            ABIValue::Bytes(_) => "bytes",
            ABIValue::Address(_) => "address",
            ABIValue::Array(_) => "array",
            ABIValue::Struct(_) => "struct",
        }
    }
}

impl From<bool> for ABIValue {
    fn from(v: bool) -> Self {
        ABIValue::Bool(v)
    }
}

impl From<u64> for ABIValue {
    fn from(v: u64) -> Self {
        ABIValue::Uint(v)
    }
}

impl From<U512> for ABIValue {
    fn from(v: U512) -> Self {
        ABIValue::BigUint(v)
    }
}

impl From<&str> for ABIValue {
    fn from(v: &str) -> Self {
        ABIValue::String(v.to_string())
    }
}

impl From<String> for ABIValue {
    fn from(v: String) -> Self {
        ABIValue::String(v)
    }
}

impl From<Vec<u8>> for ABIValue {
    fn from(v: Vec<u8>) -> Self {
        ABIValue::Bytes(v)
    }
}

impl From<Address> for ABIValue {
    fn from(v: Address) -> Self {
        ABIValue::Address(v)
    }
}

impl From<Vec<ABIValue>> for ABIValue {
    fn from(v: Vec<ABIValue>) -> Self {
        ABIValue::Array(v)
    }
}
