//! EVM account derivation from a wallet seed.

use sable::hdpath::DerivationPath;
use sable::Wallet;

use crate::address::EvmAddress;
use crate::extended_key::ExtendedPrivateKey;
use crate::private_key::EvmPrivateKey;
use crate::Result;

/// EVM account deriver over a wallet seed.
///
/// Walks the standard external account path `m/44'/60'/0'/0/{index}`.
///
/// # Example
///
/// ```
/// use sable::Wallet;
/// use sable_eth::Deriver;
///
/// let wallet = Wallet::generate(None).unwrap();
/// let deriver = Deriver::new(&wallet);
/// let account = deriver.derive_account(0).unwrap();
/// println!("Address: {}", account.address);
/// ```
#[derive(Debug)]
pub struct Deriver<'a> {
    /// Reference to the wallet for seed access.
    wallet: &'a Wallet,
}

/// A derived EVM account.
///
/// Owns its private key; the key is zeroized when the account is dropped.
#[derive(Debug, Clone)]
pub struct DerivedAccount {
    /// Address index within the account (the last path segment).
    pub index: u32,
    /// Derivation path used (e.g., `m/44'/60'/0'/0/0`).
    pub path: String,
    /// The account address.
    pub address: EvmAddress,
    /// The account private key.
    pub private_key: EvmPrivateKey,
}

impl<'a> Deriver<'a> {
    /// Create a new deriver from a wallet.
    #[must_use]
    pub const fn new(wallet: &'a Wallet) -> Self {
        Self { wallet }
    }

    /// Derive the account at `m/44'/60'/0'/0/{index}`.
    pub fn derive_account(&self, index: u32) -> Result<DerivedAccount> {
        let path = DerivationPath::ethereum(index)?;
        let derived = self.derive_at_path(&path)?;

        Ok(DerivedAccount {
            index,
            path: path.to_string(),
            address: derived.address(),
            private_key: derived.private_key().clone(),
        })
    }

    /// Derive accounts for `start_index..start_index + count`.
    pub fn derive_many(&self, start_index: u32, count: u32) -> Result<Vec<DerivedAccount>> {
        (start_index..start_index + count)
            .map(|index| self.derive_account(index))
            .collect()
    }

    /// Derive an extended key at an arbitrary path.
    pub fn derive_at_path(&self, path: &DerivationPath) -> Result<ExtendedPrivateKey> {
        let master = ExtendedPrivateKey::from_seed(self.wallet.seed())?;
        master.derive_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    fn test_wallet() -> Wallet {
        Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap()
    }

    #[test]
    fn test_derive_account() {
        let wallet = test_wallet();
        let deriver = Deriver::new(&wallet);
        let account = deriver.derive_account(0).unwrap();

        assert_eq!(account.index, 0);
        assert_eq!(account.path, "m/44'/60'/0'/0/0");
        let display = account.address.to_string();
        assert!(display.starts_with("0x"));
        assert_eq!(display.len(), 42);
    }

    #[test]
    fn test_private_key_matches_address() {
        let wallet = test_wallet();
        let deriver = Deriver::new(&wallet);
        let account = deriver.derive_account(0).unwrap();

        assert_eq!(account.private_key.address(), account.address);
    }

    #[test]
    fn test_accounts_are_pairwise_distinct() {
        let wallet = test_wallet();
        let deriver = Deriver::new(&wallet);
        let accounts = deriver.derive_many(0, 8).unwrap();

        assert_eq!(accounts.len(), 8);
        for (i, a) in accounts.iter().enumerate() {
            for b in &accounts[i + 1..] {
                assert_ne!(a.address, b.address);
                assert_ne!(
                    a.private_key.to_bytes(),
                    b.private_key.to_bytes()
                );
            }
        }
    }

    #[test]
    fn test_deterministic_derivation() {
        let wallet1 = test_wallet();
        let wallet2 = test_wallet();

        let account1 = Deriver::new(&wallet1).derive_account(5).unwrap();
        let account2 = Deriver::new(&wallet2).derive_account(5).unwrap();

        assert_eq!(account1.address, account2.address);
        assert_eq!(
            account1.private_key.to_bytes(),
            account2.private_key.to_bytes()
        );
    }

    #[test]
    fn test_passphrase_changes_accounts() {
        let wallet1 = Wallet::from_mnemonic(TEST_MNEMONIC, None).unwrap();
        let wallet2 = Wallet::from_mnemonic(TEST_MNEMONIC, Some("password")).unwrap();

        let account1 = Deriver::new(&wallet1).derive_account(0).unwrap();
        let account2 = Deriver::new(&wallet2).derive_account(0).unwrap();

        assert_ne!(account1.address, account2.address);
    }
}
