//! EVM private key implementation.
//!
//! Provides secure secp256k1 private key management with recoverable ECDSA
//! signing and automatic memory zeroization.

use k256::ecdsa::SigningKey;
use zeroize::Zeroize;

use crate::address::EvmAddress;
use crate::error::Error;
use crate::public_key::EvmPublicKey;
use crate::Result;

/// A recoverable ECDSA signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// The r component (32 bytes).
    pub r: [u8; 32],
    /// The s component (32 bytes, low-s normalized).
    pub s: [u8; 32],
    /// The recovery id (0 or 1).
    pub v: u8,
}

impl Signature {
    /// Create a new signature from its components.
    pub const fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }
}

/// EVM private key based on secp256k1.
#[derive(Clone)]
pub struct EvmPrivateKey {
    inner: SigningKey,
}

impl Zeroize for EvmPrivateKey {
    fn zeroize(&mut self) {
        // SigningKey internally zeroizes on drop
        // We create a new key and swap to trigger the drop
        let zeroed = SigningKey::from_slice(&[1u8; 32]).unwrap();
        let _ = core::mem::replace(&mut self.inner, zeroed);
    }
}

impl Drop for EvmPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl EvmPrivateKey {
    /// Create from 32 raw bytes.
    ///
    /// Rejects zero and values not below the secp256k1 group order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let inner = SigningKey::from_slice(bytes).map_err(|_| Error::InvalidPrivateKey)?;
        Ok(Self { inner })
    }

    /// Serialize to 32 raw bytes.
    ///
    /// **Security Warning**: the returned array is not self-zeroizing.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    /// Get the corresponding public key.
    pub fn public_key(&self) -> EvmPublicKey {
        EvmPublicKey::from_signing_key(&self.inner)
    }

    /// Get the corresponding address.
    pub fn address(&self) -> EvmAddress {
        self.public_key().to_address()
    }

    /// Sign a 32-byte prehash, producing a recoverable signature.
    pub fn sign_prehash(&self, hash: &[u8; 32]) -> Result<Signature> {
        let (sig, recid) = self
            .inner
            .sign_prehash_recoverable(hash)
            .map_err(|_| Error::Crypto)?;

        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Ok(Signature::new(r, s, recid.to_byte()))
    }

    /// Get access to the underlying signing key.
    pub fn as_signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl core::fmt::Debug for EvmPrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "EvmPrivateKey([REDACTED])")
    }
}

impl core::str::FromStr for EvmPrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 64 {
            return Err(Error::InvalidLength {
                expected: 64,
                actual: s.len(),
            });
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::InvalidEncoding)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let bytes =
            hex_literal::hex!("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318");
        let key = EvmPrivateKey::from_bytes(&bytes).unwrap();
        assert_eq!(key.to_bytes(), bytes);
    }

    #[test]
    fn test_rejects_zero_key() {
        assert!(matches!(
            EvmPrivateKey::from_bytes(&[0u8; 32]),
            Err(Error::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_rejects_key_above_order() {
        assert!(matches!(
            EvmPrivateKey::from_bytes(&[0xff; 32]),
            Err(Error::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_from_str() {
        let key: EvmPrivateKey = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
            .parse()
            .unwrap();
        let expected =
            hex_literal::hex!("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318");
        assert_eq!(key.to_bytes(), expected);
    }

    #[test]
    fn test_address_derivation() {
        let key: EvmPrivateKey = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
            .parse()
            .unwrap();
        let addr = key.address();
        assert_eq!(
            addr.to_string().to_lowercase(),
            "0x2c7536e3605d9c16a7a3d7b1898e529396a65c23"
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let key: EvmPrivateKey = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
            .parse()
            .unwrap();
        let out = format!("{:?}", key);
        assert!(!out.contains("4c0883"));
    }
}
