//! # Sable - EVM Wallet Core Primitives
//!
//! Core building blocks for a deterministic Ethereum-style wallet:
//!
//! - BIP-39 mnemonic encoding, validation, and seed derivation
//! - BIP-32 derivation path parsing and construction
//! - Cryptographic hash functions (SHA-256, Keccak-256, HASH160)
//! - Zeroized secret byte containers
//!
//! Key material produced by this crate is held in [`zeroize`]-backed
//! containers and wiped when dropped.

#![warn(missing_docs, rust_2018_idioms, clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]
#![forbid(unsafe_code)]

pub mod error;
pub mod hash;
pub mod hdpath;
pub mod mnemonic;
pub mod seed;
pub mod types;
pub mod wallet;
pub mod wordlist;

pub use error::{Error, Result};
pub use hdpath::{ChildIndex, DerivationPath};
pub use types::SecretBytes;
pub use wallet::Wallet;
