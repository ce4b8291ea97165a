//! Error types for core wallet operations.

use core::fmt;

/// Errors that can occur in core wallet primitives.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Mnemonic does not have exactly 24 words.
    InvalidWordCount(usize),
    /// Word is not part of the BIP-39 English wordlist.
    UnknownWord(String),
    /// Mnemonic checksum does not match its entropy.
    InvalidChecksum,
    /// Entropy buffer has the wrong length.
    InvalidEntropyLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },
    /// Derivation path component could not be parsed.
    InvalidDerivationPath,
    /// PBKDF2 key derivation failed.
    KeyDerivation,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWordCount(n) => {
                write!(f, "invalid word count {n}, expected 24")
            }
            Self::UnknownWord(w) => write!(f, "word \"{w}\" is not a BIP-39 word"),
            Self::InvalidChecksum => write!(f, "mnemonic checksum mismatch"),
            Self::InvalidEntropyLength { expected, actual } => {
                write!(f, "invalid entropy length {actual}, expected {expected}")
            }
            Self::InvalidDerivationPath => write!(f, "invalid derivation path"),
            Self::KeyDerivation => write!(f, "PBKDF2 key derivation failed"),
        }
    }
}

impl std::error::Error for Error {}

/// A convenient Result type alias for core operations.
pub type Result<T> = core::result::Result<T, Error>;
