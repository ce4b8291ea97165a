//! # Sable-vault - PIN-protected mnemonic storage
//!
//! The vault is the only persisted form of a wallet mnemonic: the phrase is
//! encrypted under a PIN-derived AES-256-GCM key and written as a single
//! JSON record through a pluggable key-value storage boundary. At most one
//! wallet occupies the vault at a time.
//!
//! [`WalletManager`] composes the vault with account derivation and
//! transaction signing from [`sable_eth`].

#![warn(missing_docs, rust_2018_idioms, clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]
#![forbid(unsafe_code)]

mod cipher;
mod error;
mod manager;
mod record;
mod storage;
mod vault;

pub use cipher::{EncryptedPayload, PinPolicy};
pub use error::{StorageError, VaultError};
pub use manager::{NewWallet, WalletManager};
pub use record::VaultRecord;
pub use storage::{KeyValueStore, MemoryStore};
pub use vault::MnemonicVault;

/// A convenient Result type alias for vault operations.
pub type Result<T> = core::result::Result<T, VaultError>;
