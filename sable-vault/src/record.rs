//! Persisted vault record format.
//!
//! One JSON object per wallet: base64 binary fields, a cached EIP-55
//! address, and an ISO-8601 creation timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cipher::{EncryptedPayload, IV_LEN, SALT_LEN, TAG_LEN};
use crate::error::VaultError;
use crate::Result;

/// The persisted form of an encrypted wallet.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VaultRecord {
    /// AES-256-GCM ciphertext of the mnemonic.
    #[serde(with = "base64_bytes")]
    pub encrypted_mnemonic: Vec<u8>,
    /// GCM nonce.
    #[serde(with = "base64_bytes")]
    pub iv: Vec<u8>,
    /// PBKDF2 salt.
    #[serde(with = "base64_bytes")]
    pub salt: Vec<u8>,
    /// GCM authentication tag.
    #[serde(with = "base64_bytes")]
    pub auth_tag: Vec<u8>,
    /// EIP-55 address of the first derived account.
    pub address: String,
    /// Creation time of the wallet record.
    pub created_at: DateTime<Utc>,
}

impl VaultRecord {
    /// Build a record from an encrypted payload and its cached address.
    pub fn new(payload: EncryptedPayload, address: String) -> Self {
        Self {
            encrypted_mnemonic: payload.ciphertext,
            iv: payload.iv.to_vec(),
            salt: payload.salt.to_vec(),
            auth_tag: payload.auth_tag.to_vec(),
            address,
            created_at: Utc::now(),
        }
    }

    /// Reconstruct the encrypted payload from the record's binary fields.
    pub fn payload(&self) -> Result<EncryptedPayload> {
        let iv: [u8; IV_LEN] = self
            .iv
            .as_slice()
            .try_into()
            .map_err(|_| VaultError::MalformedRecord)?;
        let salt: [u8; SALT_LEN] = self
            .salt
            .as_slice()
            .try_into()
            .map_err(|_| VaultError::MalformedRecord)?;
        let auth_tag: [u8; TAG_LEN] = self
            .auth_tag
            .as_slice()
            .try_into()
            .map_err(|_| VaultError::MalformedRecord)?;

        Ok(EncryptedPayload {
            ciphertext: self.encrypted_mnemonic.clone(),
            iv,
            salt,
            auth_tag,
        })
    }

    /// Serialize to the stored JSON byte form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse a record from its stored JSON byte form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
