//! Signed transaction envelopes and logic signatures

use algo_crypto::{hash_with_prefix, Signature, PROGRAM_PREFIX};
use algo_msgpack::{value_bytes, MapBuilder, MapReader, Value};
use algo_primitives::Address;
use bytes::Bytes;

use crate::codec::{get_transaction_id, MsgpackCodec};
use crate::{MultisigSignature, Result, TransactError, Transaction};

/// Logic signature: a program authorizing transactions, optionally delegated
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LogicSignature {
    /// Compiled program bytes
    pub logic: Bytes,
    /// Arguments passed to the program
    pub args: Vec<Bytes>,
    /// Delegating account's signature over the program
    pub signature: Option<Signature>,
    /// Delegating multisig account's signatures over the program
    pub multisig: Option<MultisigSignature>,
}

impl LogicSignature {
    /// Create an escrow (contract account) logic signature
    pub fn new(logic: impl Into<Bytes>, args: Vec<Bytes>) -> Self {
        Self {
            logic: logic.into(),
            args,
            ..Default::default()
        }
    }

    /// Contract account address: `SHA512_256("Program" || logic)`
    pub fn address(&self) -> Address {
        Address::from_public_key(*hash_with_prefix(PROGRAM_PREFIX, &self.logic).as_bytes())
    }

    /// Bytes a delegating account signs: `"Program" || logic`
    pub fn bytes_to_sign(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PROGRAM_PREFIX.len() + self.logic.len());
        buf.extend_from_slice(PROGRAM_PREFIX);
        buf.extend_from_slice(&self.logic);
        buf
    }

    /// Whether an account has delegated its authority to this program
    pub fn is_delegated(&self) -> bool {
        self.signature.is_some() || self.multisig.is_some()
    }
}

impl MsgpackCodec for LogicSignature {
    fn to_msgpack(&self) -> Value {
        let args = self.args.iter().map(|a| Value::Binary(a.to_vec())).collect();
        MapBuilder::new()
            .bytes("l", &self.logic)
            .field("arg", Value::Array(args))
            .optional("sig", self.signature.map(|s| Value::Binary(s.to_bytes().to_vec())))
            .optional("msig", self.multisig.as_ref().map(MultisigSignature::to_msgpack))
            .build()
    }

    fn from_msgpack(value: &Value) -> Result<Self> {
        let map = MapReader::new(value, "lsig")?;
        let args = map
            .array("arg")?
            .iter()
            .map(|v| value_bytes(v, "arg").map(Bytes::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(LogicSignature {
            logic: Bytes::from(map.bytes("l")?),
            args,
            signature: map.fixed::<64>("sig")?.map(Signature::from_bytes),
            multisig: map
                .present("msig")
                .map(MultisigSignature::from_msgpack)
                .transpose()?,
        })
    }
}

/// A transaction plus its authorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The transaction
    pub transaction: Transaction,
    /// Single-key signature
    pub signature: Option<Signature>,
    /// Authorizing address when it differs from the sender (after rekey)
    pub auth_address: Option<Address>,
    /// Multisig signature set
    pub multisig: Option<MultisigSignature>,
    /// Logic signature
    pub logic_signature: Option<LogicSignature>,
}

impl SignedTransaction {
    /// Wrap a transaction with no authorization yet
    pub fn new(transaction: Transaction) -> Self {
        Self {
            transaction,
            signature: None,
            auth_address: None,
            multisig: None,
            logic_signature: None,
        }
    }

    /// Wrap a transaction with a single-key signature
    pub fn with_signature(transaction: Transaction, signature: Signature) -> Self {
        Self {
            signature: Some(signature),
            ..Self::new(transaction)
        }
    }

    /// Wrap a transaction with a multisig signature set
    pub fn with_multisig(transaction: Transaction, multisig: MultisigSignature) -> Self {
        Self {
            multisig: Some(multisig),
            ..Self::new(transaction)
        }
    }

    /// Wrap a transaction with a logic signature
    pub fn with_logic_signature(transaction: Transaction, lsig: LogicSignature) -> Self {
        Self {
            logic_signature: Some(lsig),
            ..Self::new(transaction)
        }
    }

    /// Set the authorizing address
    pub fn auth_address(mut self, address: Address) -> Self {
        self.auth_address = Some(address);
        self
    }

    /// Exactly one authorization kind is present
    pub fn is_authorized(&self) -> bool {
        let kinds = [
            self.signature.is_some(),
            self.multisig.is_some(),
            self.logic_signature.is_some(),
        ];
        kinds.iter().filter(|present| **present).count() == 1
    }

    /// Id of the wrapped transaction
    pub fn id(&self) -> Result<String> {
        get_transaction_id(&self.transaction)
    }
}

impl MsgpackCodec for SignedTransaction {
    fn to_msgpack(&self) -> Value {
        MapBuilder::new()
            .field("txn", self.transaction.to_msgpack())
            .optional("sig", self.signature.map(|s| Value::Binary(s.to_bytes().to_vec())))
            .optional("msig", self.multisig.as_ref().map(MultisigSignature::to_msgpack))
            .optional("lsig", self.logic_signature.as_ref().map(LogicSignature::to_msgpack))
            .address("sgnr", self.auth_address.as_ref())
            .build()
    }

    fn from_msgpack(value: &Value) -> Result<Self> {
        let map = MapReader::new(value, "stxn")?;
        let txn = map
            .present("txn")
            .ok_or_else(|| TransactError::Decode("signed transaction without `txn`".into()))?;
        Ok(SignedTransaction {
            transaction: Transaction::from_msgpack(txn)?,
            signature: map.fixed::<64>("sig")?.map(Signature::from_bytes),
            auth_address: map.address("sgnr")?,
            multisig: map
                .present("msig")
                .map(MultisigSignature::from_msgpack)
                .transpose()?,
            logic_signature: map
                .present("lsig")
                .map(LogicSignature::from_msgpack)
                .transpose()?,
        })
    }
}

/// Canonical msgpack bytes of a signed transaction
pub fn encode_signed_transaction(stxn: &SignedTransaction) -> Result<Vec<u8>> {
    stxn.encode_msgpack()
}

/// Decode a signed transaction
pub fn decode_signed_transaction(bytes: &[u8]) -> Result<SignedTransaction> {
    SignedTransaction::decode_msgpack(bytes)
}

/// Concatenated encodings, the form submitted to the network
pub fn encode_signed_transactions(stxns: &[SignedTransaction]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for stxn in stxns {
        buf.extend(encode_signed_transaction(stxn)?);
    }
    Ok(buf)
}

/// Decode a concatenation of signed transactions
pub fn decode_signed_transactions(bytes: &[u8]) -> Result<Vec<SignedTransaction>> {
    algo_msgpack::decode_stream(bytes)?
        .iter()
        .map(SignedTransaction::from_msgpack)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new_multisig_signature, PaymentFields, TransactionHeader};

    fn payment() -> Transaction {
        Transaction::payment(
            TransactionHeader {
                sender: Address::from_bytes([1u8; 32]),
                fee: 1000,
                first_valid: 5,
                last_valid: 10,
                ..Default::default()
            },
            PaymentFields {
                receiver: Address::from_bytes([2u8; 32]),
                amount: 42,
                close_remainder_to: None,
            },
        )
    }

    #[test]
    fn test_signed_layout() {
        let stxn = SignedTransaction::with_signature(payment(), Signature::from_bytes([7u8; 64]));
        let bytes = encode_signed_transaction(&stxn).unwrap();
        // fixmap(2) "sig" bin8(64) ...
        assert_eq!(&bytes[..7], &[0x82, 0xa3, b's', b'i', b'g', 0xc4, 0x40]);
        assert_eq!(decode_signed_transaction(&bytes).unwrap(), stxn);
    }

    #[test]
    fn test_envelope_overhead_matches_estimate() {
        let txn = payment();
        let stxn = SignedTransaction::with_signature(txn.clone(), Signature::from_bytes([7u8; 64]));
        let signed_len = encode_signed_transaction(&stxn).unwrap().len() as u64;
        assert_eq!(crate::estimate_transaction_size(&txn).unwrap(), signed_len);
    }

    #[test]
    fn test_auth_address_roundtrip() {
        let stxn = SignedTransaction::with_signature(payment(), Signature::from_bytes([7u8; 64]))
            .auth_address(Address::from_bytes([3u8; 32]));
        let bytes = encode_signed_transaction(&stxn).unwrap();
        assert_eq!(decode_signed_transaction(&bytes).unwrap(), stxn);
    }

    #[test]
    fn test_multisig_roundtrip() {
        let msig = new_multisig_signature(
            1,
            1,
            &[Address::from_bytes([4u8; 32]), Address::from_bytes([5u8; 32])],
        )
        .unwrap();
        let stxn = SignedTransaction::with_multisig(payment(), msig);
        assert!(stxn.is_authorized());
        let bytes = encode_signed_transaction(&stxn).unwrap();
        assert_eq!(decode_signed_transaction(&bytes).unwrap(), stxn);
    }

    #[test]
    fn test_logic_signature_roundtrip() {
        let lsig = LogicSignature::new(vec![0x06, 0x81, 0x01], vec![Bytes::from_static(b"arg")]);
        let stxn = SignedTransaction::with_logic_signature(payment(), lsig);
        let bytes = encode_signed_transaction(&stxn).unwrap();
        assert_eq!(decode_signed_transaction(&bytes).unwrap(), stxn);
    }

    #[test]
    fn test_logic_signature_address() {
        let lsig = LogicSignature::new(vec![0x06, 0x81, 0x01], vec![]);
        let expected = algo_crypto::sha512_256(b"Program\x06\x81\x01");
        assert_eq!(lsig.address().as_bytes(), expected.as_bytes());
        assert!(!lsig.is_delegated());
        assert_eq!(lsig.bytes_to_sign(), b"Program\x06\x81\x01".to_vec());
    }

    #[test]
    fn test_authorization_count() {
        let unsigned = SignedTransaction::new(payment());
        assert!(!unsigned.is_authorized());
        let mut both =
            SignedTransaction::with_signature(payment(), Signature::from_bytes([1u8; 64]));
        both.logic_signature = Some(LogicSignature::new(vec![1u8], vec![]));
        assert!(!both.is_authorized());
    }

    #[test]
    fn test_batch_roundtrip() {
        let a = SignedTransaction::with_signature(payment(), Signature::from_bytes([1u8; 64]));
        let b = SignedTransaction::with_signature(
            payment().with_fee(2000),
            Signature::from_bytes([2u8; 64]),
        );
        let bytes = encode_signed_transactions(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(decode_signed_transactions(&bytes).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_missing_txn() {
        let value = MapBuilder::new().field("sig", Value::Binary(vec![1u8; 64])).build();
        let bytes = algo_msgpack::encode(&value).unwrap();
        assert!(matches!(decode_signed_transaction(&bytes), Err(TransactError::Decode(_))));
    }
}
