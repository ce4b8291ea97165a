//! BIP-32 hierarchical deterministic key derivation for EVM accounts.

use hmac::{Hmac, Mac};
use k256::elliptic_curve::{Field, PrimeField};
use k256::{FieldBytes, Scalar};
use sha2::Sha512;
use zeroize::Zeroize;

use sable::hash::hash160;
use sable::hdpath::{ChildIndex, DerivationPath};

use crate::error::Error;
use crate::private_key::EvmPrivateKey;
use crate::public_key::EvmPublicKey;
use crate::Result;

type HmacSha512 = Hmac<Sha512>;

/// BIP-32 extended private key.
///
/// Provides hierarchical deterministic key derivation following the BIP-32
/// standard. Keys are automatically zeroized on drop.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    /// The underlying private key
    private_key: EvmPrivateKey,
    /// Chain code for key derivation
    chain_code: [u8; 32],
    /// Depth in the derivation tree (0 for master)
    depth: u8,
    /// Parent key fingerprint (first 4 bytes of hash160 of parent public key)
    parent_fingerprint: [u8; 4],
    /// Child index that produced this key
    child_index: u32,
}

impl Zeroize for ExtendedPrivateKey {
    fn zeroize(&mut self) {
        self.private_key.zeroize();
        self.chain_code.zeroize();
        self.depth = 0;
        self.parent_fingerprint.zeroize();
    }
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ExtendedPrivateKey {
    /// Build the master key from a BIP-39 seed.
    ///
    /// HMAC-SHA512 keyed with `"Bitcoin seed"`: the left 32 bytes are the
    /// master private key, the right 32 bytes the chain code. A left half
    /// that is zero or not below the curve order is a hard error.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        if seed.len() < 16 || seed.len() > 64 {
            return Err(Error::InvalidLength {
                expected: 64,
                actual: seed.len(),
            });
        }

        let mut mac =
            HmacSha512::new_from_slice(b"Bitcoin seed").map_err(|_| Error::Crypto)?;
        mac.update(seed);
        let result = mac.finalize().into_bytes();

        let private_key = EvmPrivateKey::from_bytes(&result[..32])?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&result[32..]);

        Ok(Self {
            private_key,
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: 0,
        })
    }

    /// Derive a child key at the given index.
    ///
    /// Implements BIP-32 CKDpriv with the standard invalid-child rule: when
    /// the HMAC left half is not below the curve order, or the candidate
    /// child key is zero, the next index in the same hardening class is
    /// tried. Running past the end of the index space is
    /// [`Error::ChildIndexExhausted`].
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        if self.depth == 255 {
            return Err(Error::MaxDepthExceeded);
        }

        let hardened = index.is_hardened();
        let mut raw = index.index();
        loop {
            if let Some(child) = self.try_child(raw, hardened)? {
                return Ok(child);
            }
            raw = raw
                .checked_add(1)
                .filter(|&r| r < ChildIndex::HARDENED_OFFSET)
                .ok_or(Error::ChildIndexExhausted)?;
        }
    }

    /// One CKDpriv attempt. `Ok(None)` means the index is invalid per
    /// BIP-32 and the caller should try the next one.
    fn try_child(&self, index: u32, hardened: bool) -> Result<Option<Self>> {
        let child_index = if hardened {
            index | ChildIndex::HARDENED_OFFSET
        } else {
            index
        };

        let mut mac =
            HmacSha512::new_from_slice(&self.chain_code).map_err(|_| Error::Crypto)?;

        if hardened {
            // Hardened: HMAC-SHA512(cc, 0x00 || ser256(kpar) || ser32(i))
            let mut parent_bytes = self.private_key.to_bytes();
            mac.update(&[0u8]);
            mac.update(&parent_bytes);
            parent_bytes.zeroize();
        } else {
            // Normal: HMAC-SHA512(cc, serP(point(kpar)) || ser32(i))
            mac.update(&self.private_key.public_key().to_bytes());
        }

        mac.update(&child_index.to_be_bytes());
        let result = mac.finalize().into_bytes();

        let (il, ir) = result.split_at(32);

        // parse256(IL) must be below the curve order.
        let il_scalar =
            match Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(il))) {
                Some(s) => s,
                None => return Ok(None),
            };

        // child = (IL + parent) mod n, rejected when zero.
        let mut parent_bytes = self.private_key.to_bytes();
        let parent_scalar =
            Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(parent_bytes)))
                .ok_or(Error::InvalidPrivateKey)?;
        parent_bytes.zeroize();

        let child_scalar = il_scalar + parent_scalar;
        if bool::from(child_scalar.is_zero()) {
            return Ok(None);
        }

        let mut child_bytes: [u8; 32] = child_scalar.to_bytes().into();
        let child_private_key = EvmPrivateKey::from_bytes(&child_bytes)?;
        child_bytes.zeroize();

        // Parent fingerprint: first 4 bytes of hash160 of the compressed
        // parent public key.
        let parent_hash = hash160(&self.private_key.public_key().to_bytes());
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&parent_hash[..4]);

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);

        Ok(Some(Self {
            private_key: child_private_key,
            chain_code,
            depth: self.depth + 1,
            parent_fingerprint,
            child_index,
        }))
    }

    /// Walk a full derivation path from this key.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut current = self.clone();
        for index in path.indices() {
            current = current.derive_child(*index)?;
        }
        Ok(current)
    }

    /// Get a reference to the underlying private key.
    #[inline]
    pub fn private_key(&self) -> &EvmPrivateKey {
        &self.private_key
    }

    /// Get the corresponding public key.
    #[inline]
    #[must_use]
    pub fn public_key(&self) -> EvmPublicKey {
        self.private_key.public_key()
    }

    /// Get the corresponding address.
    #[inline]
    #[must_use]
    pub fn address(&self) -> crate::EvmAddress {
        self.private_key.address()
    }

    /// Get a reference to the chain code.
    #[inline]
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Get the depth in the derivation tree.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Get the parent fingerprint.
    #[inline]
    #[must_use]
    pub const fn parent_fingerprint(&self) -> &[u8; 4] {
        &self.parent_fingerprint
    }

    /// Get the child index.
    #[inline]
    #[must_use]
    pub const fn child_index(&self) -> u32 {
        self.child_index
    }
}

impl core::fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // BIP-32 test vector 1
    const TEST_SEED_1: &[u8] = &hex!("000102030405060708090a0b0c0d0e0f");

    #[test]
    fn test_master_key_vector_1() {
        let xkey = ExtendedPrivateKey::from_seed(TEST_SEED_1).unwrap();
        assert_eq!(xkey.depth(), 0);
        assert_eq!(
            xkey.private_key().to_bytes(),
            hex!("e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35")
        );
        assert_eq!(
            xkey.chain_code(),
            &hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508")
        );
    }

    #[test]
    fn test_hardened_child_vector_1() {
        // m/0' from BIP-32 test vector 1
        let master = ExtendedPrivateKey::from_seed(TEST_SEED_1).unwrap();
        let child = master
            .derive_child(ChildIndex::hardened(0).unwrap())
            .unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.child_index(), 0x80000000);
        assert_eq!(
            child.private_key().to_bytes(),
            hex!("edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea")
        );
        assert_eq!(
            child.chain_code(),
            &hex!("47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141")
        );
    }

    #[test]
    fn test_normal_child_vector_1() {
        // m/0'/1 from BIP-32 test vector 1
        let master = ExtendedPrivateKey::from_seed(TEST_SEED_1).unwrap();
        let child = master
            .derive_child(ChildIndex::hardened(0).unwrap())
            .unwrap()
            .derive_child(ChildIndex::normal(1).unwrap())
            .unwrap();
        assert_eq!(
            child.private_key().to_bytes(),
            hex!("3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368")
        );
    }

    #[test]
    fn test_derive_ethereum_path() {
        let master = ExtendedPrivateKey::from_seed(TEST_SEED_1).unwrap();
        let path = DerivationPath::ethereum(0).unwrap();
        let derived = master.derive_path(&path).unwrap();
        assert_eq!(derived.depth(), 5);
        assert_ne!(derived.parent_fingerprint(), &[0u8; 4]);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let path = DerivationPath::ethereum(3).unwrap();
        let a = ExtendedPrivateKey::from_seed(TEST_SEED_1)
            .unwrap()
            .derive_path(&path)
            .unwrap();
        let b = ExtendedPrivateKey::from_seed(TEST_SEED_1)
            .unwrap()
            .derive_path(&path)
            .unwrap();
        assert_eq!(a.private_key().to_bytes(), b.private_key().to_bytes());
        assert_eq!(a.chain_code(), b.chain_code());
    }

    #[test]
    fn test_seed_length_bounds() {
        assert!(ExtendedPrivateKey::from_seed(&[0u8; 15]).is_err());
        assert!(ExtendedPrivateKey::from_seed(&[0u8; 65]).is_err());
        assert!(ExtendedPrivateKey::from_seed(&[0u8; 64]).is_ok());
    }

    #[test]
    fn test_debug_is_redacted() {
        let master = ExtendedPrivateKey::from_seed(TEST_SEED_1).unwrap();
        let out = format!("{:?}", master);
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("e8f32e"));
    }
}
