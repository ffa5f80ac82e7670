//! Multisig signature engine
//!
//! A multisig account is identified by its version, threshold and ordered
//! participant list. Signatures are collected per participant slot; every
//! operation returns a new [`MultisigSignature`] and leaves its inputs intact.

use algo_crypto::{hash_with_prefix, Signature, MULTISIG_ADDR_PREFIX};
use algo_msgpack::{MapBuilder, MapReader, Value};
use algo_primitives::Address;
use tracing::debug;

use crate::codec::{address_value, MsgpackCodec};
use crate::{MultisigError, Result, TransactError};

/// One participant slot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigSubsignature {
    /// Participant address (its public key)
    pub address: Address,
    /// Signature, once the participant has signed
    pub signature: Option<Signature>,
}

/// Threshold signature set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigSignature {
    /// Multisig version
    pub version: u8,
    /// Signatures required
    pub threshold: u8,
    /// Participant slots in identity order
    pub subsignatures: Vec<MultisigSubsignature>,
}

impl MultisigSignature {
    /// Participant addresses in order
    pub fn participants(&self) -> Vec<Address> {
        self.subsignatures.iter().map(|s| s.address).collect()
    }

    /// Number of populated slots
    pub fn signed_count(&self) -> usize {
        self.subsignatures.iter().filter(|s| s.signature.is_some()).count()
    }

    /// Whether enough slots are populated to meet the threshold
    pub fn meets_threshold(&self) -> bool {
        self.signed_count() >= usize::from(self.threshold)
    }

    /// Multisig account address
    pub fn address(&self) -> Address {
        address_from_multisig_signature(self)
    }
}

/// Create an unsigned multisig signature with one empty slot per participant
pub fn new_multisig_signature(
    version: u8,
    threshold: u8,
    participants: &[Address],
) -> Result<MultisigSignature> {
    if version == 0 {
        return Err(MultisigError::InvalidVersion.into());
    }
    if participants.is_empty() {
        return Err(MultisigError::EmptyParticipants.into());
    }
    if participants.len() > usize::from(u8::MAX) {
        return Err(MultisigError::TooManyParticipants(participants.len()).into());
    }
    if threshold == 0 || usize::from(threshold) > participants.len() {
        return Err(MultisigError::InvalidThreshold {
            threshold,
            participants: participants.len(),
        }
        .into());
    }

    Ok(MultisigSignature {
        version,
        threshold,
        subsignatures: participants
            .iter()
            .map(|address| MultisigSubsignature {
                address: *address,
                signature: None,
            })
            .collect(),
    })
}

/// Multisig account address
///
/// `SHA512_256("MultisigAddr" || version || threshold || pk_1 || ... || pk_n)`;
/// signatures do not take part.
pub fn address_from_multisig_signature(msig: &MultisigSignature) -> Address {
    let mut buf = Vec::with_capacity(2 + msig.subsignatures.len() * Address::LEN);
    buf.push(msig.version);
    buf.push(msig.threshold);
    for sub in &msig.subsignatures {
        buf.extend_from_slice(sub.address.public_key());
    }
    Address::from_public_key(*hash_with_prefix(MULTISIG_ADDR_PREFIX, &buf).as_bytes())
}

/// Apply a signature to every slot belonging to `participant`
///
/// A key may occupy several slots (weighted multisig); Ed25519 signatures are
/// deterministic so one signature fills them all.
pub fn apply_multisig_subsignature(
    msig: &MultisigSignature,
    participant: &Address,
    signature: Signature,
) -> Result<MultisigSignature> {
    let mut applied = 0usize;
    let subsignatures = msig
        .subsignatures
        .iter()
        .map(|sub| {
            if sub.address == *participant {
                applied += 1;
                MultisigSubsignature {
                    address: sub.address,
                    signature: Some(signature),
                }
            } else {
                sub.clone()
            }
        })
        .collect::<Vec<_>>();

    if applied == 0 {
        return Err(MultisigError::AddressNotFound(participant.to_string()).into());
    }
    debug!(participant = %participant, slots = applied, "Applied multisig subsignature");

    Ok(MultisigSignature {
        version: msig.version,
        threshold: msig.threshold,
        subsignatures,
    })
}

/// Merge two signature sets for the same multisig account
///
/// Each slot takes `b`'s signature when present, otherwise `a`'s.
pub fn merge_multisignatures(
    a: &MultisigSignature,
    b: &MultisigSignature,
) -> Result<MultisigSignature> {
    if a.version != b.version {
        return Err(MultisigError::VersionMismatch.into());
    }
    if a.threshold != b.threshold {
        return Err(MultisigError::ThresholdMismatch.into());
    }
    if a.participants() != b.participants() {
        return Err(MultisigError::ParticipantsMismatch.into());
    }

    let subsignatures = a
        .subsignatures
        .iter()
        .zip(&b.subsignatures)
        .map(|(sa, sb)| MultisigSubsignature {
            address: sa.address,
            signature: sb.signature.or(sa.signature),
        })
        .collect::<Vec<_>>();

    let merged = MultisigSignature {
        version: a.version,
        threshold: a.threshold,
        subsignatures,
    };
    debug!(signed = merged.signed_count(), "Merged multisig signatures");
    Ok(merged)
}

impl MsgpackCodec for MultisigSignature {
    fn to_msgpack(&self) -> Value {
        let subsigs = self
            .subsignatures
            .iter()
            .map(|sub| {
                MapBuilder::new()
                    .field("pk", address_value(&sub.address))
                    .optional("s", sub.signature.map(|s| Value::Binary(s.to_bytes().to_vec())))
                    .build()
            })
            .collect::<Vec<_>>();
        MapBuilder::new()
            .field("v", u64::from(self.version))
            .field("thr", u64::from(self.threshold))
            .field("subsig", Value::Array(subsigs))
            .build()
    }

    fn from_msgpack(value: &Value) -> Result<Self> {
        let map = MapReader::new(value, "msig")?;
        let version = u8::try_from(map.u64("v")?)
            .map_err(|_| TransactError::Decode("multisig version out of range".into()))?;
        let threshold = u8::try_from(map.u64("thr")?)
            .map_err(|_| TransactError::Decode("multisig threshold out of range".into()))?;
        let subsignatures = map
            .array("subsig")?
            .iter()
            .map(|entry| {
                let entry = MapReader::new(entry, "subsig")?;
                let signature = match entry.fixed::<64>("s")? {
                    Some(bytes) => Some(Signature::from_bytes(bytes)),
                    None => None,
                };
                Ok(MultisigSubsignature {
                    address: entry.address("pk")?.unwrap_or_default(),
                    signature,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MultisigSignature {
            version,
            threshold,
            subsignatures,
        })
    }
}
