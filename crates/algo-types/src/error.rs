//! Transaction error types

use algo_msgpack::MsgpackError;
use thiserror::Error;

/// Multisig structural error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultisigError {
    /// Version must be non-zero
    #[error("multisig version must be non-zero")]
    InvalidVersion,

    /// No participants given
    #[error("multisig requires at least one participant")]
    EmptyParticipants,

    /// Threshold outside `1..=participants`
    #[error("invalid multisig threshold {threshold} for {participants} participants")]
    InvalidThreshold {
        /// Requested threshold
        threshold: u8,
        /// Number of participants
        participants: usize,
    },

    /// Too many participants for the one-byte count
    #[error("too many multisig participants: {0}")]
    TooManyParticipants(usize),

    /// Address is not a participant
    #[error("address {0} is not a multisig participant")]
    AddressNotFound(String),

    /// Merge operands disagree on version
    #[error("cannot merge multisig signatures: version mismatch")]
    VersionMismatch,

    /// Merge operands disagree on threshold
    #[error("cannot merge multisig signatures: threshold mismatch")]
    ThresholdMismatch,

    /// Merge operands disagree on participants or their order
    #[error("cannot merge multisig signatures: participant list mismatch")]
    ParticipantsMismatch,
}

/// Transaction model error
#[derive(Debug, Error)]
pub enum TransactError {
    /// Underlying msgpack failure
    #[error(transparent)]
    Msgpack(#[from] MsgpackError),

    /// Structurally invalid encoded transaction
    #[error("transaction decode error: {0}")]
    Decode(String),

    /// One or more validation rules failed; the message joins every violation
    #[error("{}", .errors.join("\n"))]
    Validation {
        /// Individual violations, each prefixed by the payload kind
        errors: Vec<String>,
    },

    /// Assigned fee exceeds the caller's maximum
    #[error("transaction fee {fee} is greater than max fee {max_fee}")]
    FeeTooHigh {
        /// Computed fee
        fee: u64,
        /// Caller-supplied maximum
        max_fee: u64,
    },

    /// Fee arithmetic overflowed u64
    #[error("transaction fee overflow")]
    FeeOverflow,

    /// Grouping was asked for zero transactions
    #[error("cannot group an empty transaction list")]
    EmptyGroup,

    /// Grouping exceeds the protocol group size
    #[error("transaction group size {size} exceeds maximum {max}")]
    GroupTooLarge {
        /// Requested size
        size: usize,
        /// Protocol maximum
        max: usize,
    },

    /// Input transaction already carries a group id
    #[error("transaction {index} already has a group id")]
    AlreadyGrouped {
        /// Position in the input list
        index: usize,
    },

    /// Multisig structural error
    #[error(transparent)]
    Multisig(#[from] MultisigError),
}

impl TransactError {
    /// Individual validation violations, empty for other kinds
    pub fn violations(&self) -> &[String] {
        match self {
            TransactError::Validation { errors } => errors,
            _ => &[],
        }
    }
}

/// Result type for transaction operations
pub type Result<T> = std::result::Result<T, TransactError>;
