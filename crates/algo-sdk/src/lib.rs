//! # algo-sdk
//!
//! ARC-4 ABI codec and transaction tooling for the Algorand encoding core.
//!
//! ## Features
//!
//! - **ABI**: ARC-4 type parsing, value encoding/decoding, method selectors
//! - **Method calls**: argument encoding with reference resolution and tuple packing
//! - **TxBuilder**: Fluent API for building fee-assigned, validated transactions
//! - **Account**: Ed25519 key pair implementing [`TransactionSigner`]
//! - **SdkConfig**: TOML configuration for validity windows and fees
//!
//! ## Quick Start
//!
//! ```rust
//! use algo_sdk::{Account, TxBuilder};
//!
//! let account = Account::from_seed(&[7u8; 32]);
//! let receiver = Account::from_seed(&[8u8; 32]).address();
//!
//! let txn = TxBuilder::new(account.address())
//!     .validity(1000, 2000)
//!     .flat_fee(1000)
//!     .payment(receiver, 250_000)
//!     .unwrap();
//! let signed = account.sign(&txn).unwrap();
//! assert!(signed.is_authorized());
//! ```
//!
//! ## Method Calls
//!
//! ```rust
//! use algo_sdk::abi::{get_abi_method, ABIValue};
//! use algo_sdk::{Account, MethodCallArg, TxBuilder};
//! use algo_types::AppCallFields;
//!
//! let account = Account::from_seed(&[7u8; 32]);
//! let add = get_abi_method("add(uint64,uint64)uint64").unwrap();
//! let txns = TxBuilder::new(account.address())
//!     .validity(1000, 2000)
//!     .method_call(
//!         &add,
//!         &[MethodCallArg::Value(ABIValue::Uint(1)), MethodCallArg::Value(ABIValue::Uint(2))],
//!         AppCallFields { app_id: 1234, ..Default::default() },
//!     )
//!     .unwrap();
//! assert_eq!(txns.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod config;
mod error;
pub mod method_call;
mod params;
mod signer;
mod tx_builder;

pub use config::{FeeConfig, SdkConfig};
pub use error::{AbiError, SdkError};
pub use method_call::{encode_method_call, EncodedMethodCall, MethodCallArg};
pub use params::TransactionParams;
pub use signer::{sign_multisig_transaction, sign_transactions, Account, TransactionSigner};
pub use tx_builder::TxBuilder;

// Re-export primitives for convenience
pub use algo_primitives::{Address, AppId, AssetId, Byte32, MicroAlgos, Round};
pub use algo_types::{SignedTransaction, Transaction};
