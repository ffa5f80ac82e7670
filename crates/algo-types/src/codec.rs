//! Canonical msgpack encoding/decoding for transactions.
//!
//! Every transaction is projected into a flat map keyed by the ledger's field
//! tags, canonicalized by [`algo_msgpack::canonicalize`] and written with the
//! minimal msgpack encoding. Decoding reads the same tags back, treating
//! absent keys as the zero value of the field.

use algo_crypto::{hash_with_prefix, TX_PREFIX};
use algo_msgpack::{value_bytes, value_u64, MapBuilder, MapReader, Value};
use algo_primitives::{Address, Byte32};
use bytes::Bytes;

use crate::transaction::*;
use crate::{Result, TransactError};

/// Conversion between a domain value and its msgpack value tree
pub trait MsgpackCodec: Sized {
    /// Project into a (not yet canonical) value tree
    fn to_msgpack(&self) -> Value;

    /// Read back from a value tree
    fn from_msgpack(value: &Value) -> Result<Self>;

    /// Canonical msgpack bytes
    fn encode_msgpack(&self) -> Result<Vec<u8>> {
        Ok(algo_msgpack::encode_canonical(self.to_msgpack())?)
    }

    /// Decode from msgpack bytes
    fn decode_msgpack(bytes: &[u8]) -> Result<Self> {
        Self::from_msgpack(&algo_msgpack::decode(bytes)?)
    }
}

pub(crate) fn byte32_slice(value: &Option<Byte32>) -> Option<&[u8]> {
    value.as_ref().map(|b| b.as_bytes().as_slice())
}

pub(crate) fn address_value(address: &Address) -> Value {
    Value::Binary(address.as_bytes().to_vec())
}

fn decode_err(message: impl Into<String>) -> TransactError {
    TransactError::Decode(message.into())
}

// ============================================================================
// Encoding
// ============================================================================

impl MsgpackCodec for Transaction {
    fn to_msgpack(&self) -> Value {
        let header = &self.header;
        let map = MapBuilder::new()
            .field("type", self.transaction_type().as_str())
            .address("snd", Some(&header.sender))
            .field("fee", header.fee)
            .field("fv", header.first_valid)
            .field("lv", header.last_valid)
            .field("gen", header.genesis_id.as_str())
            .fixed("gh", byte32_slice(&header.genesis_hash))
            .bytes("note", &header.note)
            .fixed("lx", byte32_slice(&header.lease))
            .address("rekey", header.rekey_to.as_ref())
            .fixed("grp", byte32_slice(&header.group));

        match &self.payload {
            TransactionPayload::Payment(fields) => encode_payment(map, fields),
            TransactionPayload::AssetTransfer(fields) => encode_asset_transfer(map, fields),
            TransactionPayload::AssetConfig(fields) => encode_asset_config(map, fields),
            TransactionPayload::AssetFreeze(fields) => encode_asset_freeze(map, fields),
            TransactionPayload::AppCall(fields) => encode_app_call(map, fields),
            TransactionPayload::KeyRegistration(fields) => encode_key_registration(map, fields),
        }
        .build()
    }

    fn from_msgpack(value: &Value) -> Result<Self> {
        let map = MapReader::new(value, "txn")?;
        let type_name = map.string("type")?;
        if type_name.is_empty() {
            return Err(decode_err("missing transaction type"));
        }
        let tx_type: TransactionType = type_name.parse()?;

        let header = TransactionHeader {
            sender: map.address("snd")?.unwrap_or_default(),
            fee: map.u64("fee")?,
            first_valid: map.u64("fv")?,
            last_valid: map.u64("lv")?,
            genesis_id: map.string("gen")?,
            genesis_hash: map.fixed::<32>("gh")?.map(Byte32::from_bytes),
            note: Bytes::from(map.bytes("note")?),
            lease: map.fixed::<32>("lx")?.map(Byte32::from_bytes),
            rekey_to: map.address("rekey")?,
            group: map.fixed::<32>("grp")?.map(Byte32::from_bytes),
        };

        let payload = match tx_type {
            TransactionType::Payment => TransactionPayload::Payment(decode_payment(&map)?),
            TransactionType::AssetTransfer => {
                TransactionPayload::AssetTransfer(decode_asset_transfer(&map)?)
            }
            TransactionType::AssetConfig => {
                TransactionPayload::AssetConfig(decode_asset_config(&map)?)
            }
            TransactionType::AssetFreeze => {
                TransactionPayload::AssetFreeze(decode_asset_freeze(&map)?)
            }
            TransactionType::AppCall => TransactionPayload::AppCall(decode_app_call(&map)?),
            TransactionType::KeyRegistration => {
                TransactionPayload::KeyRegistration(decode_key_registration(&map)?)
            }
        };

        Ok(Transaction { header, payload })
    }
}

fn encode_payment(map: MapBuilder, fields: &PaymentFields) -> MapBuilder {
    map.address("rcv", Some(&fields.receiver))
        .field("amt", fields.amount)
        .address("close", fields.close_remainder_to.as_ref())
}

fn encode_asset_transfer(map: MapBuilder, fields: &AssetTransferFields) -> MapBuilder {
    map.field("xaid", fields.asset_id)
        .field("aamt", fields.amount)
        .address("arcv", Some(&fields.receiver))
        .address("asnd", fields.asset_sender.as_ref())
        .address("aclose", fields.close_remainder_to.as_ref())
}

fn encode_asset_config(map: MapBuilder, fields: &AssetConfigFields) -> MapBuilder {
    map.field("caid", fields.asset_id)
        .optional("apar", fields.params.as_ref().map(encode_asset_params))
}

fn encode_asset_params(params: &AssetParams) -> Value {
    MapBuilder::new()
        .field("t", params.total)
        .field("dc", u64::from(params.decimals))
        .field("df", params.default_frozen)
        .field("un", params.unit_name.as_str())
        .field("an", params.asset_name.as_str())
        .field("au", params.url.as_str())
        .fixed("am", byte32_slice(&params.metadata_hash))
        .address("m", params.manager.as_ref())
        .address("r", params.reserve.as_ref())
        .address("f", params.freeze.as_ref())
        .address("c", params.clawback.as_ref())
        .build()
}

fn encode_asset_freeze(map: MapBuilder, fields: &AssetFreezeFields) -> MapBuilder {
    map.field("faid", fields.asset_id)
        .address("fadd", Some(&fields.freeze_target))
        .field("afrz", fields.frozen)
}

fn encode_schema(schema: &StateSchema) -> Value {
    MapBuilder::new()
        .field("nui", schema.num_uints)
        .field("nbs", schema.num_byte_slices)
        .build()
}

fn encode_app_call(map: MapBuilder, fields: &AppCallFields) -> MapBuilder {
    let args = fields
        .args
        .iter()
        .map(|arg| Value::Binary(arg.to_vec()))
        .collect::<Vec<_>>();
    let accounts = fields.account_references.iter().map(address_value).collect::<Vec<_>>();
    let apps = fields.app_references.iter().map(|id| Value::from(*id)).collect::<Vec<_>>();
    let assets = fields.asset_references.iter().map(|id| Value::from(*id)).collect::<Vec<_>>();
    let boxes = fields
        .box_references
        .iter()
        .map(|b| {
            MapBuilder::new()
                .field("i", b.app_index)
                .bytes("n", &b.name)
                .build()
        })
        .collect::<Vec<_>>();

    map.field("apid", fields.app_id)
        .field("apan", fields.on_complete as u64)
        .bytes("apap", &fields.approval_program)
        .bytes("apsu", &fields.clear_state_program)
        .optional("apgs", fields.global_state_schema.as_ref().map(encode_schema))
        .optional("apls", fields.local_state_schema.as_ref().map(encode_schema))
        .field("apep", u64::from(fields.extra_program_pages))
        .field("apaa", Value::Array(args))
        .field("apat", Value::Array(accounts))
        .field("apfa", Value::Array(apps))
        .field("apas", Value::Array(assets))
        .field("apbx", Value::Array(boxes))
}

fn encode_key_registration(map: MapBuilder, fields: &KeyRegistrationFields) -> MapBuilder {
    map.fixed("votekey", byte32_slice(&fields.vote_key))
        .fixed("selkey", byte32_slice(&fields.selection_key))
        .fixed("sprfkey", fields.state_proof_key.as_ref().map(|k| k.as_slice()))
        .field("votefst", fields.vote_first)
        .field("votelst", fields.vote_last)
        .field("votekd", fields.vote_key_dilution)
        .field("nonpart", fields.non_participation)
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_payment(map: &MapReader<'_>) -> Result<PaymentFields> {
    Ok(PaymentFields {
        receiver: map.address("rcv")?.unwrap_or_default(),
        amount: map.u64("amt")?,
        close_remainder_to: map.address("close")?,
    })
}

fn decode_asset_transfer(map: &MapReader<'_>) -> Result<AssetTransferFields> {
    Ok(AssetTransferFields {
        asset_id: map.u64("xaid")?,
        amount: map.u64("aamt")?,
        receiver: map.address("arcv")?.unwrap_or_default(),
        asset_sender: map.address("asnd")?,
        close_remainder_to: map.address("aclose")?,
    })
}

fn decode_asset_config(map: &MapReader<'_>) -> Result<AssetConfigFields> {
    let params = match map.map("apar")? {
        Some(apar) => Some(AssetParams {
            total: apar.u64("t")?,
            decimals: u32::try_from(apar.u64("dc")?)
                .map_err(|_| decode_err("asset decimals out of range"))?,
            default_frozen: apar.bool("df")?,
            unit_name: apar.string("un")?,
            asset_name: apar.string("an")?,
            url: apar.string("au")?,
            metadata_hash: apar.fixed::<32>("am")?.map(Byte32::from_bytes),
            manager: apar.address("m")?,
            reserve: apar.address("r")?,
            freeze: apar.address("f")?,
            clawback: apar.address("c")?,
        }),
        None => None,
    };
    Ok(AssetConfigFields {
        asset_id: map.u64("caid")?,
        params,
    })
}

fn decode_asset_freeze(map: &MapReader<'_>) -> Result<AssetFreezeFields> {
    Ok(AssetFreezeFields {
        asset_id: map.u64("faid")?,
        freeze_target: map.address("fadd")?.unwrap_or_default(),
        frozen: map.bool("afrz")?,
    })
}

fn decode_schema(map: &MapReader<'_>, key: &str) -> Result<Option<StateSchema>> {
    Ok(match map.map(key)? {
        Some(schema) => Some(StateSchema {
            num_uints: schema.u64("nui")?,
            num_byte_slices: schema.u64("nbs")?,
        }),
        None => None,
    })
}

fn decode_app_call(map: &MapReader<'_>) -> Result<AppCallFields> {
    let args = map
        .array("apaa")?
        .iter()
        .map(|v| value_bytes(v, "apaa").map(Bytes::from))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let account_references = map
        .array("apat")?
        .iter()
        .map(|v| algo_msgpack::value_fixed::<32>(v, "apat").map(Address::from_bytes))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let app_references = map
        .array("apfa")?
        .iter()
        .map(|v| value_u64(v, "apfa"))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let asset_references = map
        .array("apas")?
        .iter()
        .map(|v| value_u64(v, "apas"))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let box_references = map
        .array("apbx")?
        .iter()
        .map(|v| {
            let entry = MapReader::new(v, "apbx")?;
            Ok(BoxReference {
                app_index: entry.u64("i")?,
                name: Bytes::from(entry.bytes("n")?),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AppCallFields {
        app_id: map.u64("apid")?,
        on_complete: OnApplicationComplete::try_from(map.u64("apan")?)?,
        approval_program: Bytes::from(map.bytes("apap")?),
        clear_state_program: Bytes::from(map.bytes("apsu")?),
        global_state_schema: decode_schema(map, "apgs")?,
        local_state_schema: decode_schema(map, "apls")?,
        extra_program_pages: u32::try_from(map.u64("apep")?)
            .map_err(|_| decode_err("extra program pages out of range"))?,
        args,
        account_references,
        app_references,
        asset_references,
        box_references,
    })
}

fn decode_key_registration(map: &MapReader<'_>) -> Result<KeyRegistrationFields> {
    Ok(KeyRegistrationFields {
        vote_key: map.fixed::<32>("votekey")?.map(Byte32::from_bytes),
        selection_key: map.fixed::<32>("selkey")?.map(Byte32::from_bytes),
        state_proof_key: map.fixed::<64>("sprfkey")?,
        vote_first: map.u64("votefst")?,
        vote_last: map.u64("votelst")?,
        vote_key_dilution: map.u64("votekd")?,
        non_participation: map.bool("nonpart")?,
    })
}

// ============================================================================
// Public helpers
// ============================================================================

/// Canonical msgpack bytes of a transaction, without the `"TX"` prefix
pub fn encode_transaction_raw(txn: &Transaction) -> Result<Vec<u8>> {
    txn.encode_msgpack()
}

/// `"TX"` followed by the canonical bytes; this is what gets hashed and signed
pub fn encode_transaction(txn: &Transaction) -> Result<Vec<u8>> {
    let raw = encode_transaction_raw(txn)?;
    let mut buf = Vec::with_capacity(TX_PREFIX.len() + raw.len());
    buf.extend_from_slice(TX_PREFIX);
    buf.extend_from_slice(&raw);
    Ok(buf)
}

/// Decode a transaction, accepting input with or without the `"TX"` prefix
pub fn decode_transaction(bytes: &[u8]) -> Result<Transaction> {
    let body = bytes.strip_prefix(TX_PREFIX).unwrap_or(bytes);
    Transaction::decode_msgpack(body)
}

/// Raw 32-byte transaction id: `SHA512_256("TX" || raw)`
pub fn get_transaction_id_raw(txn: &Transaction) -> Result<Byte32> {
    let raw = encode_transaction_raw(txn)?;
    Ok(hash_with_prefix(TX_PREFIX, &raw))
}

/// Transaction id as unpadded base32 (52 characters)
pub fn get_transaction_id(txn: &Transaction) -> Result<String> {
    Ok(get_transaction_id_raw(txn)?.to_base32())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> TransactionHeader {
        TransactionHeader {
            sender: Address::from_bytes([1u8; 32]),
            fee: 1000,
            first_valid: 100,
            last_valid: 1100,
            genesis_id: "testnet-v1.0".into(),
            genesis_hash: Some(Byte32::from_bytes([2u8; 32])),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_payment_bytes() {
        // Only `snd` and `type` survive omission
        let txn = Transaction::payment(
            TransactionHeader {
                sender: Address::from_bytes([1u8; 32]),
                ..Default::default()
            },
            PaymentFields::default(),
        );
        let mut expected = vec![0x82, 0xa3, b's', b'n', b'd', 0xc4, 0x20];
        expected.extend_from_slice(&[1u8; 32]);
        expected.extend_from_slice(&[0xa4, b't', b'y', b'p', b'e', 0xa3, b'p', b'a', b'y']);
        assert_eq!(encode_transaction_raw(&txn).unwrap(), expected);
    }

    #[test]
    fn test_prefix() {
        let txn = Transaction::payment(header(), PaymentFields::default());
        let raw = encode_transaction_raw(&txn).unwrap();
        let prefixed = encode_transaction(&txn).unwrap();
        assert_eq!(&prefixed[..2], b"TX");
        assert_eq!(&prefixed[2..], &raw[..]);
    }

    #[test]
    fn test_decode_with_and_without_prefix() {
        let txn = Transaction::payment(
            header(),
            PaymentFields {
                receiver: Address::from_bytes([3u8; 32]),
                amount: 5_000_000,
                close_remainder_to: None,
            },
        );
        let raw = encode_transaction_raw(&txn).unwrap();
        let prefixed = encode_transaction(&txn).unwrap();
        assert_eq!(decode_transaction(&raw).unwrap(), txn);
        assert_eq!(decode_transaction(&prefixed).unwrap(), txn);
    }

    #[test]
    fn test_keys_sorted() {
        let txn = Transaction::payment(
            header(),
            PaymentFields {
                receiver: Address::from_bytes([3u8; 32]),
                amount: 1,
                close_remainder_to: None,
            },
        );
        let value = algo_msgpack::decode(&encode_transaction_raw(&txn).unwrap()).unwrap();
        let keys: Vec<_> = MapReader::new(&value, "txn").unwrap().keys().collect();
        assert_eq!(keys, vec!["amt", "fee", "fv", "gen", "gh", "lv", "rcv", "snd", "type"]);
    }

    #[test]
    fn test_zero_receiver_omitted() {
        let txn = Transaction::payment(header(), PaymentFields::default());
        let value = algo_msgpack::decode(&encode_transaction_raw(&txn).unwrap()).unwrap();
        let map = MapReader::new(&value, "txn").unwrap();
        assert!(!map.contains("rcv"));
        assert!(!map.contains("amt"));
    }

    #[test]
    fn test_transaction_id_shape() {
        let txn = Transaction::payment(header(), PaymentFields::default());
        let id = get_transaction_id(&txn).unwrap();
        assert_eq!(id.len(), 52);
        let raw = get_transaction_id_raw(&txn).unwrap();
        assert_eq!(Byte32::from_base32(&id).unwrap(), raw);
        assert_eq!(raw, algo_crypto::sha512_256(&encode_transaction(&txn).unwrap()));
    }

    #[test]
    fn test_id_changes_with_fee() {
        let txn = Transaction::payment(header(), PaymentFields::default());
        let other = txn.with_fee(2000);
        assert_ne!(get_transaction_id(&txn).unwrap(), get_transaction_id(&other).unwrap());
    }

    #[test]
    fn test_decode_missing_type() {
        let bytes = algo_msgpack::encode_canonical(MapBuilder::new().field("fee", 1u64).build())
            .unwrap();
        assert!(matches!(decode_transaction(&bytes), Err(TransactError::Decode(_))));
    }

    #[test]
    fn test_decode_unknown_type() {
        let bytes =
            algo_msgpack::encode_canonical(MapBuilder::new().field("type", "hb").build()).unwrap();
        assert!(matches!(decode_transaction(&bytes), Err(TransactError::Decode(_))));
    }

    #[test]
    fn test_decode_not_a_map() {
        let bytes = algo_msgpack::encode(&Value::from(7u64)).unwrap();
        assert!(matches!(decode_transaction(&bytes), Err(TransactError::Msgpack(_))));
    }

    #[test]
    fn test_app_call_array_elements_kept() {
        let txn = Transaction::app_call(
            header(),
            AppCallFields {
                app_id: 12,
                args: vec![Bytes::new(), Bytes::from_static(b"x")],
                app_references: vec![0, 5],
                box_references: vec![BoxReference::default()],
                ..Default::default()
            },
        );
        let decoded = decode_transaction(&encode_transaction_raw(&txn).unwrap()).unwrap();
        assert_eq!(decoded, txn);
    }

    #[test]
    fn test_asset_destroy_has_no_params() {
        let txn = Transaction::asset_config(
            header(),
            AssetConfigFields {
                asset_id: 77,
                params: None,
            },
        );
        let value = algo_msgpack::decode(&encode_transaction_raw(&txn).unwrap()).unwrap();
        assert!(!MapReader::new(&value, "txn").unwrap().contains("apar"));
    }
}
