//! ARC-4 method descriptions

use std::fmt;
use std::str::FromStr;

use algo_crypto::sha512_256;
use serde::Deserialize;

use super::decode::decode;
use super::types::{split_tuple, ABIType, ABIValue};
use crate::AbiError;

/// Prefix of the log entry carrying a method's return value
pub const RETURN_PREFIX: [u8; 4] = [0x15, 0x1f, 0x7c, 0x75];

/// Transaction argument kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ABITransactionType {
    /// Any transaction type
    Any,
    /// Payment
    Payment,
    /// Key registration
    KeyRegistration,
    /// Asset configuration
    AssetConfig,
    /// Asset transfer
    AssetTransfer,
    /// Asset freeze
    AssetFreeze,
    /// Application call
    AppCall,
}

impl ABITransactionType {
    /// Literal token used in method signatures
    pub fn as_str(&self) -> &'static str {
        match self {
            ABITransactionType::Any => "txn",
            ABITransactionType::Payment => "pay",
            ABITransactionType::KeyRegistration => "keyreg",
            ABITransactionType::AssetConfig => "acfg",
            ABITransactionType::AssetTransfer => "axfer",
            ABITransactionType::AssetFreeze => "afrz",
            ABITransactionType::AppCall => "appl",
        }
    }

    fn from_token(s: &str) -> Option<Self> {
        Some(match s {
            "txn" => ABITransactionType::Any,
            "pay" => ABITransactionType::Payment,
            "keyreg" => ABITransactionType::KeyRegistration,
            "acfg" => ABITransactionType::AssetConfig,
            "axfer" => ABITransactionType::AssetTransfer,
            "afrz" => ABITransactionType::AssetFreeze,
            "appl" => ABITransactionType::AppCall,
            _ => return None,
        })
    }

    /// Whether a transaction of type `txn_type` (its `type` tag) is accepted
    pub fn accepts(&self, txn_type: &str) -> bool {
        *self == ABITransactionType::Any || self.as_str() == txn_type
    }
}

/// Reference argument kinds, resolved to foreign-array indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ABIReferenceType {
    /// Account reference
    Account,
    /// Asset reference
    Asset,
    /// Application reference
    Application,
}

impl ABIReferenceType {
    /// Literal token used in method signatures
    pub fn as_str(&self) -> &'static str {
        match self {
            ABIReferenceType::Account => "account",
            ABIReferenceType::Asset => "asset",
            ABIReferenceType::Application => "application",
        }
    }

    fn from_token(s: &str) -> Option<Self> {
        Some(match s {
            "account" => ABIReferenceType::Account,
            "asset" => ABIReferenceType::Asset,
            "application" => ABIReferenceType::Application,
            _ => return None,
        })
    }
}

/// Type of one method argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ABIMethodArgType {
    /// Encoded value
    Value(ABIType),
    /// Preceding transaction in the group
    Transaction(ABITransactionType),
    /// Index into a foreign array
    Reference(ABIReferenceType),
}

impl ABIMethodArgType {
    /// Parse an argument type token
    pub fn parse(s: &str) -> Result<Self, AbiError> {
        if let Some(txn) = ABITransactionType::from_token(s) {
            return Ok(ABIMethodArgType::Transaction(txn));
        }
        if let Some(reference) = ABIReferenceType::from_token(s) {
            return Ok(ABIMethodArgType::Reference(reference));
        }
        ABIType::parse(s).map(ABIMethodArgType::Value)
    }
}

impl fmt::Display for ABIMethodArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ABIMethodArgType::Value(t) => write!(f, "{}", t),
            ABIMethodArgType::Transaction(t) => f.write_str(t.as_str()),
            ABIMethodArgType::Reference(r) => f.write_str(r.as_str()),
        }
    }
}

/// Method argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ABIMethodArg {
    /// Argument type
    pub arg_type: ABIMethodArgType,
    /// Optional name
    pub name: Option<String>,
    /// Optional description
    pub desc: Option<String>,
}

/// ARC-4 method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ABIMethod {
    /// Method name
    pub name: String,
    /// Arguments in call order
    pub args: Vec<ABIMethodArg>,
    /// Return type, `None` for `void`
    pub returns: Option<ABIType>,
    /// Optional description
    pub desc: Option<String>,
}

impl ABIMethod {
    /// Parse a method signature such as `add(uint64,uint64)uint64`
    pub fn from_signature(signature: &str) -> Result<Self, AbiError> {
        let invalid = |reason: &str| AbiError::InvalidMethod(format!("{}: {}", signature, reason));

        let open = signature
            .find('(')
            .ok_or_else(|| invalid("missing argument list"))?;
        let name = &signature[..open];
        if name.is_empty() {
            return Err(invalid("empty method name"));
        }

        let mut depth = 0usize;
        let mut close = None;
        for (i, c) in signature[open..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let close = close.ok_or_else(|| invalid("unbalanced parentheses"))?;

        let args = split_tuple(&signature[open + 1..close])
            .map_err(|reason| invalid(&reason))?
            .into_iter()
            .map(|token| {
                Ok(ABIMethodArg {
                    arg_type: ABIMethodArgType::parse(token)?,
                    name: None,
                    desc: None,
                })
            })
            .collect::<Result<Vec<_>, AbiError>>()?;

        let returns = parse_return(&signature[close + 1..])?;

        Ok(ABIMethod {
            name: name.to_string(),
            args,
            returns,
            desc: None,
        })
    }

    /// Parse an ARC-4 JSON method description
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let raw: MethodJson =
            serde_json::from_str(json).map_err(|e| AbiError::InvalidMethod(e.to_string()))?;
        raw.try_into()
    }

    /// Canonical signature: `name(arg1,arg2,...)ret`
    pub fn signature(&self) -> String {
        let args: Vec<String> = self.args.iter().map(|a| a.arg_type.to_string()).collect();
        let returns = self
            .returns
            .as_ref()
            .map_or_else(|| "void".to_string(), ABIType::to_string);
        format!("{}({}){}", self.name, args.join(","), returns)
    }

    /// First 4 bytes of SHA-512/256 of the signature
    pub fn selector(&self) -> [u8; 4] {
        selector_of(&self.signature())
    }

    /// Number of transaction arguments
    pub fn transaction_arg_count(&self) -> usize {
        self.args
            .iter()
            .filter(|a| matches!(a.arg_type, ABIMethodArgType::Transaction(_)))
            .count()
    }

    /// Decode the return value from a log entry
    ///
    /// Returns `None` for `void` methods.
    pub fn decode_return_log(&self, log: &[u8]) -> Result<Option<ABIValue>, AbiError> {
        let Some(returns) = &self.returns else {
            return Ok(None);
        };
        let body = log.strip_prefix(&RETURN_PREFIX[..]).ok_or_else(|| AbiError::Decode {
            type_name: returns.to_string(),
            reason: "log entry lacks the return prefix".into(),
        })?;
        decode(returns, body).map(Some)
    }
}

impl fmt::Display for ABIMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

impl FromStr for ABIMethod {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ABIMethod::from_signature(s)
    }
}

/// Parse a method from its signature
pub fn get_abi_method(signature: &str) -> Result<ABIMethod, AbiError> {
    ABIMethod::from_signature(signature)
}

/// Selector of a method signature, after checking that it parses
pub fn get_abi_method_selector(signature: &str) -> Result<[u8; 4], AbiError> {
    ABIMethod::from_signature(signature).map(|m| m.selector())
}

/// ARC-4 contract description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ABIContract {
    /// Contract name
    pub name: String,
    /// Optional description
    pub desc: Option<String>,
    /// Methods
    pub methods: Vec<ABIMethod>,
}

impl ABIContract {
    /// Parse an ARC-4 JSON contract description
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let raw: ContractJson =
            serde_json::from_str(json).map_err(|e| AbiError::InvalidMethod(e.to_string()))?;
        Ok(ABIContract {
            name: raw.name,
            desc: raw.desc,
            methods: raw
                .methods
                .into_iter()
                .map(ABIMethod::try_from)
                .collect::<Result<_, _>>()?,
        })
    }

    /// Look up a method by name, failing if the name is overloaded
    pub fn method_by_name(&self, name: &str) -> Result<&ABIMethod, AbiError> {
        let mut matches = self.methods.iter().filter(|m| m.name == name);
        match (matches.next(), matches.next()) {
            (Some(method), None) => Ok(method),
            (None, _) => Err(AbiError::InvalidMethod(format!("no method named `{}`", name))),
            (Some(_), Some(_)) => Err(AbiError::InvalidMethod(format!(
                "method name `{}` is overloaded, use a signature",
                name
            ))),
        }
    }

    /// Look up a method by selector
    pub fn method_by_selector(&self, selector: [u8; 4]) -> Option<&ABIMethod> {
        self.methods.iter().find(|m| m.selector() == selector)
    }
}

fn selector_of(signature: &str) -> [u8; 4] {
    let hash = sha512_256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

fn parse_return(s: &str) -> Result<Option<ABIType>, AbiError> {
    if s == "void" {
        return Ok(None);
    }
    ABIType::parse(s).map(Some)
}

// ==================== ARC-4 JSON ====================

#[derive(Deserialize)]
struct ArgJson {
    #[serde(rename = "type")]
    arg_type: String,
    name: Option<String>,
    desc: Option<String>,
}

#[derive(Deserialize)]
struct ReturnsJson {
    #[serde(rename = "type")]
    return_type: String,
}

#[derive(Deserialize)]
struct MethodJson {
    name: String,
    #[serde(default)]
    args: Vec<ArgJson>,
    returns: ReturnsJson,
    desc: Option<String>,
}

#[derive(Deserialize)]
struct ContractJson {
    name: String,
    desc: Option<String>,
    #[serde(default)]
    methods: Vec<MethodJson>,
}

impl TryFrom<MethodJson> for ABIMethod {
    type Error = AbiError;

    fn try_from(raw: MethodJson) -> Result<Self, Self::Error> {
        let args = raw
            .args
            .into_iter()
            .map(|arg| {
                Ok(ABIMethodArg {
                    arg_type: ABIMethodArgType::parse(&arg.arg_type)?,
                    name: arg.name,
                    desc: arg.desc,
                })
            })
            .collect::<Result<Vec<_>, AbiError>>()?;
        Ok(ABIMethod {
            name: raw.name,
            args,
            returns: parse_return(&raw.returns.return_type)?,
            desc: raw.desc,
        })
    }
}
