//! PIN policy and the PBKDF2 + AES-256-GCM cipher.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use hmac::Hmac;
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use sable::types::Secret32;

use crate::error::VaultError;
use crate::Result;

/// PBKDF2-HMAC-SHA256 iteration count for the PIN-derived key.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Salt length in bytes.
pub const SALT_LEN: usize = 32;

/// GCM nonce length in bytes.
pub const IV_LEN: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// PIN format rules, supplied by the embedding application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinPolicy {
    /// Minimum PIN length in digits.
    pub min_len: usize,
    /// Maximum PIN length in digits.
    pub max_len: usize,
}

impl Default for PinPolicy {
    fn default() -> Self {
        Self {
            min_len: 4,
            max_len: 8,
        }
    }
}

impl PinPolicy {
    /// Create a policy with explicit bounds.
    pub const fn new(min_len: usize, max_len: usize) -> Self {
        Self { min_len, max_len }
    }

    /// Check a PIN against this policy: ASCII digits only, length in bounds.
    pub fn validate(&self, pin: &str) -> Result<()> {
        if pin.len() < self.min_len || pin.len() > self.max_len {
            return Err(VaultError::InvalidPin("length out of bounds"));
        }
        if !pin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VaultError::InvalidPin("digits only"));
        }
        Ok(())
    }
}

/// An encrypted secret with its per-encryption parameters.
///
/// The GCM tag is carried separately from the ciphertext; salt and IV are
/// fresh random values for every encryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedPayload {
    /// AES-256-GCM ciphertext (without the tag).
    pub ciphertext: Vec<u8>,
    /// GCM nonce.
    pub iv: [u8; IV_LEN],
    /// PBKDF2 salt.
    pub salt: [u8; SALT_LEN],
    /// GCM authentication tag.
    pub auth_tag: [u8; TAG_LEN],
}

/// Derive the 32-byte AES key from a PIN and salt.
fn derive_key(pin: &str, salt: &[u8; SALT_LEN]) -> Result<Secret32> {
    let mut key = Secret32::default();
    pbkdf2::pbkdf2::<Hmac<Sha256>>(pin.as_bytes(), salt, PBKDF2_ROUNDS, key.as_mut())
        .map_err(|_| VaultError::Crypto)?;
    Ok(key)
}

/// Encrypt a secret under a PIN.
///
/// The PIN is assumed to be policy-checked by the caller.
pub(crate) fn encrypt(plaintext: &[u8], pin: &str) -> Result<EncryptedPayload> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let key = derive_key(pin, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::Crypto)?;

    // aes-gcm appends the 16-byte tag to the ciphertext; split it off.
    let mut sealed = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|_| VaultError::Crypto)?;
    let tag_start = sealed.len() - TAG_LEN;
    let mut auth_tag = [0u8; TAG_LEN];
    auth_tag.copy_from_slice(&sealed[tag_start..]);
    sealed.truncate(tag_start);

    Ok(EncryptedPayload {
        ciphertext: sealed,
        iv,
        salt,
        auth_tag,
    })
}

/// Decrypt a payload with a PIN.
///
/// Every decryption failure, wrong PIN included, is reported as the uniform
/// [`VaultError::Authentication`].
pub(crate) fn decrypt(payload: &EncryptedPayload, pin: &str) -> Result<Zeroizing<Vec<u8>>> {
    let key = derive_key(pin, &payload.salt)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::Crypto)?;

    let mut sealed = Vec::with_capacity(payload.ciphertext.len() + TAG_LEN);
    sealed.extend_from_slice(&payload.ciphertext);
    sealed.extend_from_slice(&payload.auth_tag);

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&payload.iv), sealed.as_slice())
        .map_err(|_| VaultError::Authentication)?;

    Ok(Zeroizing::new(plaintext))
}
