//! SDK configuration

use std::path::Path;

use algo_primitives::{MicroAlgos, Round};
use algo_types::FeeParams;
use serde::{Deserialize, Serialize};

use crate::SdkError;

/// SDK configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Rounds between first and last valid
    #[serde(default = "default_validity_window")]
    pub validity_window: Round,
    /// Fee settings
    #[serde(default)]
    pub fee: FeeConfig,
}

/// Fee settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Minimum fee, also the flat fee when `flat_fee` is set
    #[serde(default = "default_min_fee")]
    pub min_fee: MicroAlgos,
    /// Refuse to build transactions with a higher fee
    #[serde(default)]
    pub max_fee: Option<MicroAlgos>,
    /// Added on top of the computed fee
    #[serde(default)]
    pub extra_fee: Option<MicroAlgos>,
    /// Ignore the per-byte fee from suggested params
    #[serde(default)]
    pub flat_fee: bool,
}

fn default_validity_window() -> Round {
    10
}

fn default_min_fee() -> MicroAlgos {
    1000
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            validity_window: default_validity_window(),
            fee: FeeConfig::default(),
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            min_fee: default_min_fee(),
            max_fee: None,
            extra_fee: None,
            flat_fee: false,
        }
    }
}

impl SdkConfig {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, SdkError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SdkError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Fee parameters for a network fee per byte
    ///
    /// The network minimum wins over the configured one when it is higher.
    pub fn fee_params(&self, fee_per_byte: MicroAlgos, network_min_fee: MicroAlgos) -> FeeParams {
        FeeParams {
            fee_per_byte: if self.fee.flat_fee { 0 } else { fee_per_byte },
            min_fee: self.fee.min_fee.max(network_min_fee),
            extra_fee: self.fee.extra_fee,
            max_fee: self.fee.max_fee,
        }
    }
}
