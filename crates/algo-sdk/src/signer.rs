//! Accounts and transaction signing

use algo_crypto::{public_key_to_address, sign, PrivateKey, PublicKey, Signature};
use algo_primitives::Address;
use algo_types::{
    apply_multisig_subsignature, encode_transaction, LogicSignature, MultisigSignature,
    SignedTransaction, Transaction,
};
use async_trait::async_trait;
use rand::rngs::OsRng;
use tracing::debug;
use zeroize::Zeroize;

use crate::SdkError;

/// Produces authorized transactions for one address
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Address whose authority the signatures carry
    fn address(&self) -> Address;

    /// Sign one transaction
    async fn sign_transaction(&self, txn: &Transaction) -> Result<SignedTransaction, SdkError>;
}

/// Ed25519 key pair
///
/// Clone is not implemented so the key is never duplicated by accident.
pub struct Account {
    private_key: PrivateKey,
    address: Address,
}

impl Account {
    /// Generate a random account
    pub fn new_random() -> Self {
        Self::from_private_key(PrivateKey::generate(&mut OsRng))
    }

    /// Create an account from a 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_private_key(PrivateKey::from_bytes(seed))
    }

    /// Create an account from a hex-encoded 32-byte seed
    pub fn from_seed_hex(hex: &str) -> Result<Self, SdkError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut bytes = hex::decode(hex)?;
        if bytes.len() != 32 {
            let len = bytes.len();
            bytes.zeroize();
            return Err(SdkError::InvalidPrivateKey(format!(
                "Expected 32 bytes, got {}",
                len
            )));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes);
        bytes.zeroize();

        let account = Self::from_seed(&seed);
        seed.zeroize();
        Ok(account)
    }

    fn from_private_key(private_key: PrivateKey) -> Self {
        let address = public_key_to_address(&private_key.verifying_key());
        Self {
            private_key,
            address,
        }
    }

    /// Account address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Public key
    pub fn public_key(&self) -> PublicKey {
        self.private_key.verifying_key()
    }

    /// Sign arbitrary bytes
    pub fn sign_bytes(&self, message: &[u8]) -> Signature {
        sign(message, &self.private_key)
    }

    /// Sign a transaction, setting the authorizing address when it is not the sender
    pub fn sign(&self, txn: &Transaction) -> Result<SignedTransaction, SdkError> {
        let bytes = encode_transaction(txn)?;
        let signed = SignedTransaction::with_signature(txn.clone(), self.sign_bytes(&bytes));
        if *txn.sender() != self.address {
            debug!(sender = %txn.sender(), signer = %self.address, "Signing for rekeyed sender");
            return Ok(signed.auth_address(self.address));
        }
        Ok(signed)
    }

    /// Delegate this account's authority to a logic signature
    pub fn sign_program(&self, lsig: &LogicSignature) -> LogicSignature {
        LogicSignature {
            signature: Some(self.sign_bytes(&lsig.bytes_to_sign())),
            ..lsig.clone()
        }
    }

    /// Add this account's subsignature to a multisig set
    pub fn sign_multisig(
        &self,
        txn: &Transaction,
        msig: &MultisigSignature,
    ) -> Result<MultisigSignature, SdkError> {
        let bytes = encode_transaction(txn)?;
        Ok(apply_multisig_subsignature(
            msig,
            &self.address,
            self.sign_bytes(&bytes),
        )?)
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TransactionSigner for Account {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_transaction(&self, txn: &Transaction) -> Result<SignedTransaction, SdkError> {
        self.sign(txn)
    }
}

/// Sign every transaction with one signer, preserving order
pub async fn sign_transactions(
    signer: &dyn TransactionSigner,
    txns: &[Transaction],
) -> Result<Vec<SignedTransaction>, SdkError> {
    let mut signed = Vec::with_capacity(txns.len());
    for txn in txns {
        signed.push(signer.sign_transaction(txn).await?);
    }
    Ok(signed)
}

/// Sign a transaction with several multisig participants
///
/// The envelope carries the authorizing address when the multisig account is
/// not the sender.
pub fn sign_multisig_transaction(
    txn: &Transaction,
    msig: &MultisigSignature,
    accounts: &[&Account],
) -> Result<SignedTransaction, SdkError> {
    let mut signed = msig.clone();
    for account in accounts {
        signed = account.sign_multisig(txn, &signed)?;
    }
    let address = signed.address();
    let stxn = SignedTransaction::with_multisig(txn.clone(), signed);
    if *txn.sender() != address {
        return Ok(stxn.auth_address(address));
    }
    Ok(stxn)
}
