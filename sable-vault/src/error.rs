//! Vault error taxonomy.
//!
//! Decryption failures of any kind collapse into the single
//! [`VaultError::Authentication`] variant so callers cannot distinguish a
//! wrong PIN from tampered ciphertext. No variant carries secret payloads.

use thiserror::Error;

/// Error from a key-value storage backend.
#[derive(Debug, Error)]
#[error("storage backend error: {message}")]
pub struct StorageError {
    message: String,
}

impl StorageError {
    /// Create a new storage error with a backend-provided message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur during vault and wallet-manager operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VaultError {
    /// PIN does not satisfy the vault's policy.
    #[error("invalid PIN: {0}")]
    InvalidPin(&'static str),

    /// Mnemonic failed BIP-39 validation.
    #[error("invalid mnemonic")]
    InvalidMnemonic,

    /// Decryption failed: wrong PIN or tampered record.
    #[error("authentication failed")]
    Authentication,

    /// The vault slot is already occupied.
    #[error("a wallet already exists in the vault")]
    WalletAlreadyExists,

    /// The vault slot is empty.
    #[error("no wallet found in the vault")]
    WalletNotFound,

    /// A persisted record could not be interpreted.
    #[error("malformed vault record")]
    MalformedRecord,

    /// Storage backend failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Record (de)serialization failure.
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key derivation or cipher primitive failure.
    #[error("cryptographic operation failed")]
    Crypto,

    /// Error from key derivation or signing.
    #[error(transparent)]
    Key(#[from] sable_eth::Error),
}
