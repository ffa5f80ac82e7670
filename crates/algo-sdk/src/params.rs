//! Suggested transaction parameters

use algo_primitives::{Byte32, MicroAlgos, Round};
use serde::{Deserialize, Serialize};

use crate::SdkError;

/// Network parameters a transaction is built against, as served by a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionParams {
    /// Fee per byte
    pub fee: MicroAlgos,
    /// Protocol minimum fee
    pub min_fee: MicroAlgos,
    /// Latest round
    pub last_round: Round,
    /// Genesis id
    pub genesis_id: String,
    /// Genesis hash, base64
    pub genesis_hash: Byte32,
    /// Consensus protocol version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_version: Option<String>,
}

impl TransactionParams {
    /// Parse the node's JSON response
    pub fn from_json(json: &str) -> Result<Self, SdkError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS_JSON: &str = r#"{
        "consensus-version": "future",
        "fee": 0,
        "genesis-hash": "SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=",
        "genesis-id": "testnet-v1.0",
        "last-round": 42,
        "min-fee": 1000
    }"#;

    #[test]
    fn test_from_json() {
        let params = TransactionParams::from_json(PARAMS_JSON).unwrap();
        assert_eq!(params.fee, 0);
        assert_eq!(params.min_fee, 1000);
        assert_eq!(params.last_round, 42);
        assert_eq!(params.genesis_id, "testnet-v1.0");
        assert_eq!(
            params.genesis_hash.to_base64(),
            "SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI="
        );
        assert_eq!(params.consensus_version.as_deref(), Some("future"));
    }

    #[test]
    fn test_from_json_rejects_bad_hash() {
        let json = PARAMS_JSON.replace("SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=", "AAAA");
        assert!(matches!(
            TransactionParams::from_json(&json),
            Err(SdkError::Serialization(_))
        ));
    }
}
