//! # Sable-eth - EVM key material and transaction signing
//!
//! Derives secp256k1 accounts from a [`sable::Wallet`] along the standard
//! BIP-44 Ethereum path and signs EIP-155 legacy transactions.
//!
//! # Usage
//!
//! ```
//! use sable::Wallet;
//! use sable_eth::Deriver;
//!
//! let wallet = Wallet::generate(None).unwrap();
//!
//! // Derive the first account at m/44'/60'/0'/0/0
//! let deriver = Deriver::new(&wallet);
//! let account = deriver.derive_account(0).unwrap();
//! println!("Address: {}", account.address);
//! ```

#![warn(missing_docs, rust_2018_idioms, clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]
#![forbid(unsafe_code)]

mod address;
mod deriver;
mod error;
mod extended_key;
mod private_key;
mod public_key;
mod transaction;

pub use address::EvmAddress;
pub use deriver::{DerivedAccount, Deriver};
pub use error::Error;
pub use extended_key::ExtendedPrivateKey;
pub use private_key::{EvmPrivateKey, Signature};
pub use public_key::EvmPublicKey;
pub use transaction::{EvmTransaction, SignedTransaction, TxId};

/// A convenient Result type alias for sable-eth operations.
pub type Result<T> = core::result::Result<T, Error>;
