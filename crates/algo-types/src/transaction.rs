//! Transaction types

use std::fmt;
use std::str::FromStr;

use algo_primitives::{Address, AppId, AssetId, Byte32, MicroAlgos, Round};
use bytes::Bytes;

use crate::TransactError;

/// Transaction type identifier (the `type` field on the wire)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Algo transfer
    Payment,
    /// Asset transfer, opt-in, opt-out or clawback
    AssetTransfer,
    /// Asset create, reconfigure or destroy
    AssetConfig,
    /// Asset freeze or unfreeze
    AssetFreeze,
    /// Application call
    AppCall,
    /// Participation key registration
    KeyRegistration,
}

impl TransactionType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Payment => "pay",
            TransactionType::AssetTransfer => "axfer",
            TransactionType::AssetConfig => "acfg",
            TransactionType::AssetFreeze => "afrz",
            TransactionType::AppCall => "appl",
            TransactionType::KeyRegistration => "keyreg",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pay" => Ok(TransactionType::Payment),
            "axfer" => Ok(TransactionType::AssetTransfer),
            "acfg" => Ok(TransactionType::AssetConfig),
            "afrz" => Ok(TransactionType::AssetFreeze),
            "appl" => Ok(TransactionType::AppCall),
            "keyreg" => Ok(TransactionType::KeyRegistration),
            other => Err(TransactError::Decode(format!("unknown transaction type `{}`", other))),
        }
    }
}

/// Fields shared by every transaction type
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TransactionHeader {
    /// Sending account
    pub sender: Address,
    /// Fee in microAlgos
    pub fee: MicroAlgos,
    /// First round the transaction is valid in
    pub first_valid: Round,
    /// Last round the transaction is valid in
    pub last_valid: Round,
    /// Genesis id of the target network
    pub genesis_id: String,
    /// Genesis hash of the target network
    pub genesis_hash: Option<Byte32>,
    /// Arbitrary note bytes
    pub note: Bytes,
    /// Mutual-exclusion lease
    pub lease: Option<Byte32>,
    /// New authorized signer for the sender account
    pub rekey_to: Option<Address>,
    /// Group id, set by grouping
    pub group: Option<Byte32>,
}

/// Payment (`pay`) fields
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PaymentFields {
    /// Receiving account
    pub receiver: Address,
    /// Amount in microAlgos
    pub amount: MicroAlgos,
    /// Close the sender account and send the remainder here
    pub close_remainder_to: Option<Address>,
}

/// Asset transfer (`axfer`) fields
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AssetTransferFields {
    /// Asset being transferred
    pub asset_id: AssetId,
    /// Amount in base units
    pub amount: u64,
    /// Receiving account
    pub receiver: Address,
    /// Clawback source; set only by the clawback account
    pub asset_sender: Option<Address>,
    /// Close the holding and send the remainder here
    pub close_remainder_to: Option<Address>,
}

/// Asset parameters (`apar`)
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AssetParams {
    /// Total number of base units
    pub total: u64,
    /// Digits after the decimal point for display
    pub decimals: u32,
    /// Whether holdings start frozen
    pub default_frozen: bool,
    /// Short unit name
    pub unit_name: String,
    /// Asset name
    pub asset_name: String,
    /// URL with more information
    pub url: String,
    /// Commitment to asset metadata
    pub metadata_hash: Option<Byte32>,
    /// Manager account
    pub manager: Option<Address>,
    /// Reserve account
    pub reserve: Option<Address>,
    /// Freeze account
    pub freeze: Option<Address>,
    /// Clawback account
    pub clawback: Option<Address>,
}

/// Asset configuration (`acfg`) fields
///
/// `asset_id == 0` creates an asset; otherwise `params` reconfigures it, and
/// absent params destroy it.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AssetConfigFields {
    /// Asset being configured, 0 on create
    pub asset_id: AssetId,
    /// New parameters
    pub params: Option<AssetParams>,
}

/// Asset freeze (`afrz`) fields
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AssetFreezeFields {
    /// Asset being frozen
    pub asset_id: AssetId,
    /// Account whose holding is frozen
    pub freeze_target: Address,
    /// New frozen state
    pub frozen: bool,
}

/// Application call completion action (`apan`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum OnApplicationComplete {
    /// Only execute the approval program
    #[default]
    NoOp = 0,
    /// Opt the sender into the application
    OptIn = 1,
    /// Close out the sender's local state
    CloseOut = 2,
    /// Clear the sender's local state
    ClearState = 3,
    /// Replace the application's programs
    UpdateApplication = 4,
    /// Delete the application
    DeleteApplication = 5,
}

impl TryFrom<u64> for OnApplicationComplete {
    type Error = TransactError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OnApplicationComplete::NoOp),
            1 => Ok(OnApplicationComplete::OptIn),
            2 => Ok(OnApplicationComplete::CloseOut),
            3 => Ok(OnApplicationComplete::ClearState),
            4 => Ok(OnApplicationComplete::UpdateApplication),
            5 => Ok(OnApplicationComplete::DeleteApplication),
            other => Err(TransactError::Decode(format!("invalid on-complete value {}", other))),
        }
    }
}

/// Storage schema (`apgs` / `apls`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StateSchema {
    /// Number of uint64 slots
    pub num_uints: u64,
    /// Number of byte-slice slots
    pub num_byte_slices: u64,
}

/// Box reference (`apbx` entry)
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BoxReference {
    /// 0 for the called app, otherwise a 1-based index into `app_references`
    pub app_index: u64,
    /// Box name
    pub name: Bytes,
}

/// Application call (`appl`) fields
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppCallFields {
    /// Called application, 0 on create
    pub app_id: AppId,
    /// Completion action
    pub on_complete: OnApplicationComplete,
    /// Approval program (create and update only)
    pub approval_program: Bytes,
    /// Clear state program (create and update only)
    pub clear_state_program: Bytes,
    /// Global schema (create only)
    pub global_state_schema: Option<StateSchema>,
    /// Local schema (create only)
    pub local_state_schema: Option<StateSchema>,
    /// Additional program pages (create only)
    pub extra_program_pages: u32,
    /// Application arguments
    pub args: Vec<Bytes>,
    /// Referenced accounts
    pub account_references: Vec<Address>,
    /// Referenced applications
    pub app_references: Vec<AppId>,
    /// Referenced assets
    pub asset_references: Vec<AssetId>,
    /// Referenced boxes
    pub box_references: Vec<BoxReference>,
}

/// Key registration (`keyreg`) fields
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct KeyRegistrationFields {
    /// Root participation public key
    pub vote_key: Option<Byte32>,
    /// VRF public key
    pub selection_key: Option<Byte32>,
    /// State proof public key (64 bytes)
    pub state_proof_key: Option<[u8; 64]>,
    /// First round the participation key is valid
    pub vote_first: Round,
    /// Last round the participation key is valid
    pub vote_last: Round,
    /// Dilution of the two-level participation key
    pub vote_key_dilution: u64,
    /// Permanently mark the account non-participating
    pub non_participation: bool,
}

impl KeyRegistrationFields {
    /// Whether any participation field is set
    pub fn is_online(&self) -> bool {
        self.vote_key.is_some()
            || self.selection_key.is_some()
            || self.state_proof_key.is_some()
            || self.vote_first != 0
            || self.vote_last != 0
            || self.vote_key_dilution != 0
    }
}

/// Type-specific part of a transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionPayload {
    /// `pay`
    Payment(PaymentFields),
    /// `axfer`
    AssetTransfer(AssetTransferFields),
    /// `acfg`
    AssetConfig(AssetConfigFields),
    /// `afrz`
    AssetFreeze(AssetFreezeFields),
    /// `appl`
    AppCall(AppCallFields),
    /// `keyreg`
    KeyRegistration(KeyRegistrationFields),
}

impl TransactionPayload {
    /// Transaction type of this payload
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionPayload::Payment(_) => TransactionType::Payment,
            TransactionPayload::AssetTransfer(_) => TransactionType::AssetTransfer,
            TransactionPayload::AssetConfig(_) => TransactionType::AssetConfig,
            TransactionPayload::AssetFreeze(_) => TransactionType::AssetFreeze,
            TransactionPayload::AppCall(_) => TransactionType::AppCall,
            TransactionPayload::KeyRegistration(_) => TransactionType::KeyRegistration,
        }
    }
}

/// Unsigned transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Common header
    pub header: TransactionHeader,
    /// Type-specific fields
    pub payload: TransactionPayload,
}

impl Transaction {
    /// Create a transaction from its parts
    pub fn new(header: TransactionHeader, payload: TransactionPayload) -> Self {
        Self { header, payload }
    }

    /// Create a payment transaction
    pub fn payment(header: TransactionHeader, fields: PaymentFields) -> Self {
        Self::new(header, TransactionPayload::Payment(fields))
    }

    /// Create an asset transfer transaction
    pub fn asset_transfer(header: TransactionHeader, fields: AssetTransferFields) -> Self {
        Self::new(header, TransactionPayload::AssetTransfer(fields))
    }

    /// Create an asset config transaction
    pub fn asset_config(header: TransactionHeader, fields: AssetConfigFields) -> Self {
        Self::new(header, TransactionPayload::AssetConfig(fields))
    }

    /// Create an asset freeze transaction
    pub fn asset_freeze(header: TransactionHeader, fields: AssetFreezeFields) -> Self {
        Self::new(header, TransactionPayload::AssetFreeze(fields))
    }

    /// Create an application call transaction
    pub fn app_call(header: TransactionHeader, fields: AppCallFields) -> Self {
        Self::new(header, TransactionPayload::AppCall(fields))
    }

    /// Create a key registration transaction
    pub fn key_registration(header: TransactionHeader, fields: KeyRegistrationFields) -> Self {
        Self::new(header, TransactionPayload::KeyRegistration(fields))
    }

    /// Transaction type
    pub fn transaction_type(&self) -> TransactionType {
        self.payload.transaction_type()
    }

    /// Sender address
    pub fn sender(&self) -> &Address {
        &self.header.sender
    }

    /// Copy with a different fee
    pub fn with_fee(&self, fee: MicroAlgos) -> Self {
        let mut txn = self.clone();
        txn.header.fee = fee;
        txn
    }

    /// Copy with a group id
    pub fn with_group(&self, group: Byte32) -> Self {
        let mut txn = self.clone();
        txn.header.group = Some(group);
        txn
    }
}
