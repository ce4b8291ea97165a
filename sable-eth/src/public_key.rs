//! EVM public key implementation.

use k256::ecdsa::{signature::hazmat::PrehashVerifier, RecoveryId, SigningKey, VerifyingKey};

use crate::address::EvmAddress;
use crate::error::Error;
use crate::private_key::Signature;
use crate::Result;

/// EVM public key based on secp256k1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmPublicKey {
    inner: VerifyingKey,
}

impl EvmPublicKey {
    /// Create from a signing key.
    pub(crate) fn from_signing_key(key: &SigningKey) -> Self {
        Self {
            inner: *key.verifying_key(),
        }
    }

    /// Create from raw compressed bytes (33 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| Error::InvalidPublicKey)?;
        Ok(Self { inner })
    }

    /// Serialize to compressed bytes (33 bytes).
    pub fn to_bytes(&self) -> [u8; 33] {
        let point = self.inner.to_encoded_point(true);
        let mut result = [0u8; 33];
        result.copy_from_slice(point.as_bytes());
        result
    }

    /// Serialize to uncompressed bytes (65 bytes with 0x04 prefix).
    pub fn to_uncompressed_bytes(&self) -> [u8; 65] {
        let point = self.inner.to_encoded_point(false);
        let mut result = [0u8; 65];
        result.copy_from_slice(point.as_bytes());
        result
    }

    /// Get the raw 64-byte public key (without 0x04 prefix).
    pub fn to_raw_bytes(&self) -> [u8; 64] {
        let uncompressed = self.to_uncompressed_bytes();
        let mut result = [0u8; 64];
        result.copy_from_slice(&uncompressed[1..]);
        result
    }

    /// Derive the EVM address.
    pub fn to_address(&self) -> EvmAddress {
        EvmAddress::from_public_key(self)
    }

    /// Verify a signature against a message hash.
    pub fn verify(&self, hash: &[u8; 32], signature: &Signature) -> Result<()> {
        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&signature.r);
        sig_bytes[32..].copy_from_slice(&signature.s);

        let sig =
            k256::ecdsa::Signature::from_slice(&sig_bytes).map_err(|_| Error::InvalidSignature)?;

        self.inner
            .verify_prehash(hash, &sig)
            .map_err(|_| Error::InvalidSignature)
    }

    /// Recover a public key from a signature and message hash.
    pub fn recover_from_prehash(hash: &[u8; 32], signature: &Signature) -> Result<Self> {
        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&signature.r);
        sig_bytes[32..].copy_from_slice(&signature.s);

        let sig =
            k256::ecdsa::Signature::from_slice(&sig_bytes).map_err(|_| Error::InvalidSignature)?;
        let recid = RecoveryId::from_byte(signature.v).ok_or(Error::InvalidSignature)?;

        let recovered = VerifyingKey::recover_from_prehash(hash, &sig, recid)
            .map_err(|_| Error::InvalidSignature)?;

        Ok(Self { inner: recovered })
    }
}
