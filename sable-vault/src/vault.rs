//! The single-wallet mnemonic vault.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};
use zeroize::Zeroizing;

use sable::Wallet;
use sable_eth::{Deriver, EvmAddress};

use crate::cipher::{self, PinPolicy};
use crate::error::VaultError;
use crate::record::VaultRecord;
use crate::storage::KeyValueStore;
use crate::Result;

/// Storage key of the active wallet record.
const VAULT_KEY: &str = "wallet.vault";

/// Storage key used to stage a re-encrypted record during a PIN update.
const STAGING_KEY: &str = "wallet.vault.staging";

/// PIN-protected vault holding at most one encrypted mnemonic.
///
/// Mutating operations are serialized through an internal mutex; reads go
/// straight to the store. The mnemonic only ever leaves this type inside a
/// [`Zeroizing`] buffer.
pub struct MnemonicVault<S: KeyValueStore> {
    store: S,
    policy: PinPolicy,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> MnemonicVault<S> {
    /// Create a vault over a store with the given PIN policy.
    pub fn new(store: S, policy: PinPolicy) -> Self {
        Self {
            store,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the vault's PIN policy.
    pub const fn policy(&self) -> &PinPolicy {
        &self.policy
    }

    /// Encrypt and persist a mnemonic under a PIN.
    ///
    /// Fails with [`VaultError::WalletAlreadyExists`] when the slot is
    /// occupied. Returns the address of the first derived account, which is
    /// also cached in the record.
    pub fn store_mnemonic(&self, mnemonic: &str, pin: &str) -> Result<EvmAddress> {
        let _guard = self.lock();

        self.policy.validate(pin)?;
        if self.store.contains_key(VAULT_KEY)? {
            return Err(VaultError::WalletAlreadyExists);
        }

        let wallet =
            Wallet::from_mnemonic(mnemonic, None).map_err(|_| VaultError::InvalidMnemonic)?;
        let account = Deriver::new(&wallet).derive_account(0)?;
        let address = account.address;

        let payload = cipher::encrypt(wallet.mnemonic().as_bytes(), pin)?;
        let record = VaultRecord::new(payload, address.to_checksum_string());
        self.store.write(VAULT_KEY, &record.to_bytes()?)?;

        info!(address = %address, "wallet stored in vault");
        Ok(address)
    }

    /// Decrypt and return the mnemonic.
    pub fn retrieve_mnemonic(&self, pin: &str) -> Result<Zeroizing<String>> {
        let record = self.load_record()?;
        let plaintext = cipher::decrypt(&record.payload()?, pin)?;
        let phrase =
            String::from_utf8(plaintext.to_vec()).map_err(|_| VaultError::MalformedRecord)?;
        Ok(Zeroizing::new(phrase))
    }

    /// Check whether a PIN opens the vault.
    ///
    /// Authentication and policy failures return `false`; storage and
    /// record errors propagate.
    pub fn verify_pin(&self, pin: &str) -> Result<bool> {
        match self.retrieve_mnemonic(pin) {
            Ok(_) => Ok(true),
            Err(VaultError::Authentication | VaultError::InvalidPin(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Check whether the vault slot is occupied.
    pub fn has_wallet(&self) -> Result<bool> {
        Ok(self.store.contains_key(VAULT_KEY)?)
    }

    /// Get the cached first-account address, if a wallet is stored.
    pub fn cached_address(&self) -> Result<Option<EvmAddress>> {
        match self.store.read(VAULT_KEY)? {
            None => Ok(None),
            Some(bytes) => {
                let record = VaultRecord::from_bytes(&bytes)?;
                let address = record
                    .address
                    .parse()
                    .map_err(|_| VaultError::MalformedRecord)?;
                Ok(Some(address))
            }
        }
    }

    /// Remove the wallet record and any staging leftovers.
    pub fn delete_wallet(&self) -> Result<()> {
        let _guard = self.lock();

        if !self.store.contains_key(VAULT_KEY)? {
            return Err(VaultError::WalletNotFound);
        }
        self.store.delete(VAULT_KEY)?;
        self.store.delete(STAGING_KEY)?;
        info!("wallet deleted from vault");
        Ok(())
    }

    /// Re-encrypt the mnemonic under a new PIN.
    ///
    /// The re-encrypted record is written to a staging key and verified to
    /// round-trip before the primary slot is replaced, so a crash mid-update
    /// never leaves the vault without a decryptable record.
    pub fn update_pin(&self, old_pin: &str, new_pin: &str) -> Result<()> {
        let _guard = self.lock();

        self.policy.validate(new_pin)?;

        let record = self.load_record()?;
        let mnemonic = cipher::decrypt(&record.payload()?, old_pin)?;

        let payload = cipher::encrypt(&mnemonic, new_pin)?;
        let mut staged = VaultRecord::new(payload, record.address.clone());
        staged.created_at = record.created_at;

        self.store.write(STAGING_KEY, &staged.to_bytes()?)?;

        // Read the staged record back and prove it decrypts to the same
        // phrase before touching the primary slot.
        let staged_bytes = self
            .store
            .read(STAGING_KEY)?
            .ok_or(VaultError::MalformedRecord)?;
        let reread = VaultRecord::from_bytes(&staged_bytes)?;
        let roundtrip = cipher::decrypt(&reread.payload()?, new_pin)?;
        if roundtrip.as_slice() != mnemonic.as_slice() {
            self.store.delete(STAGING_KEY)?;
            return Err(VaultError::Crypto);
        }

        self.store.write(VAULT_KEY, &staged_bytes)?;
        self.store.delete(STAGING_KEY)?;

        debug!("vault PIN updated");
        Ok(())
    }

    fn load_record(&self) -> Result<VaultRecord> {
        let bytes = self
            .store
            .read(VAULT_KEY)?
            .ok_or(VaultError::WalletNotFound)?;
        VaultRecord::from_bytes(&bytes)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: KeyValueStore> core::fmt::Debug for MnemonicVault<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MnemonicVault")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    fn test_vault() -> MnemonicVault<Arc<MemoryStore>> {
        MnemonicVault::new(Arc::new(MemoryStore::new()), PinPolicy::default())
    }

    #[test]
    fn store_and_retrieve() {
        let vault = test_vault();
        assert!(!vault.has_wallet().unwrap());

        let address = vault.store_mnemonic(TEST_MNEMONIC, "123456").unwrap();
        assert!(vault.has_wallet().unwrap());
        assert_eq!(vault.cached_address().unwrap(), Some(address));

        let phrase = vault.retrieve_mnemonic("123456").unwrap();
        assert_eq!(phrase.as_str(), TEST_MNEMONIC);
    }

    #[test]
    fn single_wallet_slot() {
        let vault = test_vault();
        vault.store_mnemonic(TEST_MNEMONIC, "123456").unwrap();
        assert!(matches!(
            vault.store_mnemonic(TEST_MNEMONIC, "654321"),
            Err(VaultError::WalletAlreadyExists)
        ));
    }

    #[test]
    fn rejects_invalid_mnemonic() {
        let vault = test_vault();
        assert!(matches!(
            vault.store_mnemonic("not a mnemonic", "123456"),
            Err(VaultError::InvalidMnemonic)
        ));
        assert!(!vault.has_wallet().unwrap());
    }

    #[test]
    fn rejects_bad_pin() {
        let vault = test_vault();
        assert!(matches!(
            vault.store_mnemonic(TEST_MNEMONIC, "12"),
            Err(VaultError::InvalidPin(_))
        ));
    }

    #[test]
    fn empty_vault_is_not_found() {
        let vault = test_vault();
        assert!(matches!(
            vault.retrieve_mnemonic("123456"),
            Err(VaultError::WalletNotFound)
        ));
        assert!(matches!(
            vault.delete_wallet(),
            Err(VaultError::WalletNotFound)
        ));
        assert_eq!(vault.cached_address().unwrap(), None);
    }

    #[test]
    fn wrong_pin_is_uniform_authentication() {
        let vault = test_vault();
        vault.store_mnemonic(TEST_MNEMONIC, "123456").unwrap();
        assert!(matches!(
            vault.retrieve_mnemonic("654321"),
            Err(VaultError::Authentication)
        ));
    }

    #[test]
    fn tampered_record_is_uniform_authentication() {
        let store = Arc::new(MemoryStore::new());
        let vault = MnemonicVault::new(Arc::clone(&store), PinPolicy::default());
        vault.store_mnemonic(TEST_MNEMONIC, "123456").unwrap();

        let bytes = store.read("wallet.vault").unwrap().unwrap();
        let mut record = VaultRecord::from_bytes(&bytes).unwrap();
        record.encrypted_mnemonic[0] ^= 0x01;
        store
            .write("wallet.vault", &record.to_bytes().unwrap())
            .unwrap();

        assert!(matches!(
            vault.retrieve_mnemonic("123456"),
            Err(VaultError::Authentication)
        ));
    }

    #[test]
    fn verify_pin() {
        let vault = test_vault();
        vault.store_mnemonic(TEST_MNEMONIC, "123456").unwrap();
        assert!(vault.verify_pin("123456").unwrap());
        assert!(!vault.verify_pin("654321").unwrap());
        assert!(!vault.verify_pin("nope").unwrap());
    }

    #[test]
    fn delete_wallet_clears_slot() {
        let vault = test_vault();
        vault.store_mnemonic(TEST_MNEMONIC, "123456").unwrap();
        vault.delete_wallet().unwrap();
        assert!(!vault.has_wallet().unwrap());
        assert!(matches!(
            vault.retrieve_mnemonic("123456"),
            Err(VaultError::WalletNotFound)
        ));
    }

    #[test]
    fn update_pin_rotates_credentials() {
        let store = Arc::new(MemoryStore::new());
        let vault = MnemonicVault::new(Arc::clone(&store), PinPolicy::default());
        let address = vault.store_mnemonic(TEST_MNEMONIC, "123456").unwrap();

        vault.update_pin("123456", "8765").unwrap();

        assert!(vault.verify_pin("8765").unwrap());
        assert!(!vault.verify_pin("123456").unwrap());
        assert_eq!(
            vault.retrieve_mnemonic("8765").unwrap().as_str(),
            TEST_MNEMONIC
        );
        // address cache survives the rotation, staging key is gone
        assert_eq!(vault.cached_address().unwrap(), Some(address));
        assert!(!store.contains_key("wallet.vault.staging").unwrap());
    }

    #[test]
    fn update_pin_requires_old_pin() {
        let vault = test_vault();
        vault.store_mnemonic(TEST_MNEMONIC, "123456").unwrap();
        assert!(matches!(
            vault.update_pin("000000", "8765"),
            Err(VaultError::Authentication)
        ));
        // old PIN still works
        assert!(vault.verify_pin("123456").unwrap());
    }

    #[test]
    fn update_pin_validates_new_pin() {
        let vault = test_vault();
        vault.store_mnemonic(TEST_MNEMONIC, "123456").unwrap();
        assert!(matches!(
            vault.update_pin("123456", "1"),
            Err(VaultError::InvalidPin(_))
        ));
    }

    #[test]
    fn cached_address_matches_account_zero() {
        let vault = test_vault();
        let address = vault.store_mnemonic(TEST_MNEMONIC, "123456").unwrap();

        let wallet = Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap();
        let account = Deriver::new(&wallet).derive_account(0).unwrap();
        assert_eq!(address, account.address);
    }
}
