//! Error types for EVM wallet operations.

use core::fmt;

/// Errors that can occur during EVM key and transaction operations.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Private key is zero or not below the curve order.
    InvalidPrivateKey,
    /// Public key bytes do not encode a curve point.
    InvalidPublicKey,
    /// Signature is malformed or recovery failed.
    InvalidSignature,
    /// Input has the wrong length.
    InvalidLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// Hex or address string could not be decoded.
    InvalidEncoding,
    /// Address string is not `0x` followed by 40 hex characters.
    InvalidAddress(String),
    /// Transaction field failed validation.
    InvalidTransaction(&'static str),
    /// Derivation tree is already at maximum depth.
    MaxDepthExceeded,
    /// BIP-32 child retry ran out of indices in its hardening class.
    ChildIndexExhausted,
    /// Error from the core wallet primitives.
    Core(sable::Error),
    /// Opaque failure inside a cryptographic primitive.
    Crypto,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPrivateKey => write!(f, "invalid private key"),
            Self::InvalidPublicKey => write!(f, "invalid public key"),
            Self::InvalidSignature => write!(f, "invalid signature"),
            Self::InvalidLength { expected, actual } => {
                write!(f, "invalid length {actual}, expected {expected}")
            }
            Self::InvalidEncoding => write!(f, "invalid hex encoding"),
            Self::InvalidAddress(s) => write!(f, "invalid address \"{s}\""),
            Self::InvalidTransaction(field) => {
                write!(f, "invalid transaction: {field}")
            }
            Self::MaxDepthExceeded => write!(f, "maximum derivation depth exceeded"),
            Self::ChildIndexExhausted => {
                write!(f, "BIP-32 child index space exhausted")
            }
            Self::Core(e) => write!(f, "{e}"),
            Self::Crypto => write!(f, "cryptographic operation failed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Core(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sable::Error> for Error {
    fn from(e: sable::Error) -> Self {
        Self::Core(e)
    }
}
