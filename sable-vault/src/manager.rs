//! High-level wallet manager composing vault, derivation, and signing.

use rand_core::OsRng;
use tracing::info;
use zeroize::Zeroizing;

use sable::{mnemonic, Wallet};
use sable_eth::{DerivedAccount, Deriver, EvmAddress, EvmTransaction, SignedTransaction};

use crate::cipher::PinPolicy;
use crate::storage::KeyValueStore;
use crate::vault::MnemonicVault;
use crate::Result;

/// A freshly created wallet.
///
/// The mnemonic is handed out exactly once, for the user's backup; after
/// this value is dropped it exists only inside the vault ciphertext.
#[derive(Debug)]
pub struct NewWallet {
    /// Address of the first derived account.
    pub address: EvmAddress,
    /// The backup mnemonic phrase.
    pub mnemonic: Zeroizing<String>,
}

/// Wallet manager over a storage backend.
///
/// Every operation that needs key material re-opens the vault with the
/// caller's PIN, derives inside the call, and drops the key material before
/// returning.
pub struct WalletManager<S: KeyValueStore> {
    vault: MnemonicVault<S>,
}

impl<S: KeyValueStore> WalletManager<S> {
    /// Create a manager over a store with the given PIN policy.
    pub fn new(store: S, policy: PinPolicy) -> Self {
        Self {
            vault: MnemonicVault::new(store, policy),
        }
    }

    /// Access the underlying vault.
    pub const fn vault(&self) -> &MnemonicVault<S> {
        &self.vault
    }

    /// Generate a new wallet and store it under a PIN.
    pub fn create_wallet(&self, pin: &str) -> Result<NewWallet> {
        let phrase = mnemonic::generate(&mut OsRng);
        let address = self.vault.store_mnemonic(&phrase, pin)?;
        info!(address = %address, "wallet created");
        Ok(NewWallet {
            address,
            mnemonic: phrase,
        })
    }

    /// Import an existing mnemonic and store it under a PIN.
    pub fn import_wallet(&self, mnemonic: &str, pin: &str) -> Result<EvmAddress> {
        let address = self.vault.store_mnemonic(mnemonic, pin)?;
        info!(address = %address, "wallet imported");
        Ok(address)
    }

    /// Derive the address at `m/44'/60'/0'/0/{index}`.
    pub fn derive_address(&self, pin: &str, index: u32) -> Result<EvmAddress> {
        Ok(self.account(pin, index)?.address)
    }

    /// Sign a transaction with the key at `m/44'/60'/0'/0/{index}`.
    ///
    /// The derived private key lives only inside this call.
    pub fn sign_transaction(
        &self,
        pin: &str,
        index: u32,
        transaction: &EvmTransaction,
    ) -> Result<SignedTransaction> {
        let account = self.account(pin, index)?;
        Ok(transaction.sign(&account.private_key)?)
    }

    /// Check whether a wallet is stored.
    pub fn has_wallet(&self) -> Result<bool> {
        self.vault.has_wallet()
    }

    /// Check whether a PIN opens the vault.
    pub fn verify_pin(&self, pin: &str) -> Result<bool> {
        self.vault.verify_pin(pin)
    }

    /// Re-encrypt the stored mnemonic under a new PIN.
    pub fn update_pin(&self, old_pin: &str, new_pin: &str) -> Result<()> {
        self.vault.update_pin(old_pin, new_pin)?;
        info!("wallet PIN updated");
        Ok(())
    }

    /// Delete the stored wallet.
    pub fn delete_wallet(&self) -> Result<()> {
        self.vault.delete_wallet()?;
        info!("wallet deleted");
        Ok(())
    }

    fn account(&self, pin: &str, index: u32) -> Result<DerivedAccount> {
        let phrase = self.vault.retrieve_mnemonic(pin)?;
        let wallet =
            Wallet::from_mnemonic(&phrase, None).map_err(|_| crate::VaultError::InvalidMnemonic)?;
        Ok(Deriver::new(&wallet).derive_account(index)?)
    }
}

impl<S: KeyValueStore> core::fmt::Debug for WalletManager<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WalletManager")
            .field("vault", &self.vault)
            .finish()
    }
}
