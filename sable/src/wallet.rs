//! Deterministic HD wallet root.

use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::{mnemonic, seed};

/// An HD wallet root holding a 24-word mnemonic and its derived seed.
///
/// The wallet is the single in-memory root of key material: chain-specific
/// derivers borrow the seed and produce extended keys from it following
/// BIP-32/44.
///
/// # Passphrase Support
///
/// The wallet supports an optional BIP-39 passphrase (sometimes called the
/// "25th word"). The same mnemonic with different passphrases produces
/// completely different wallets.
#[derive(Debug)]
pub struct Wallet {
    /// BIP-39 mnemonic phrase.
    mnemonic: Zeroizing<String>,
    /// Seed derived from mnemonic + passphrase.
    seed: Zeroizing<[u8; seed::SEED_LEN]>,
    /// Whether a passphrase was used.
    has_passphrase: bool,
}

impl Wallet {
    /// Generate a new wallet with a random 24-word mnemonic.
    ///
    /// Entropy comes from the operating system RNG.
    pub fn generate(passphrase: Option<&str>) -> Result<Self> {
        let phrase = mnemonic::generate(&mut OsRng);
        Self::from_mnemonic(&phrase, passphrase)
    }

    /// Create a wallet from 32 raw entropy bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the entropy slice is not exactly 32 bytes.
    pub fn from_entropy(entropy: &[u8], passphrase: Option<&str>) -> Result<Self> {
        let entropy: &[u8; mnemonic::ENTROPY_LEN] =
            entropy
                .try_into()
                .map_err(|_| Error::InvalidEntropyLength {
                    expected: mnemonic::ENTROPY_LEN,
                    actual: entropy.len(),
                })?;
        let phrase = mnemonic::from_entropy(entropy);
        Self::from_mnemonic(&phrase, passphrase)
    }

    /// Create a wallet from an existing 24-word mnemonic phrase.
    ///
    /// # Errors
    ///
    /// Returns an error if the mnemonic has the wrong word count, contains
    /// a word outside the English wordlist, or fails its checksum.
    pub fn from_mnemonic(phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        // Validate before any derivation work.
        mnemonic::to_entropy(phrase)?;

        let passphrase_str = passphrase.unwrap_or("");
        // Store the phrase in normalized single-space form.
        let normalized = Zeroizing::new(
            phrase.split_whitespace().collect::<Vec<_>>().join(" "),
        );
        let seed_bytes = seed::to_seed(&normalized, passphrase_str)?;

        Ok(Self {
            mnemonic: normalized,
            seed: seed_bytes,
            has_passphrase: !passphrase_str.is_empty(),
        })
    }

    /// Get the mnemonic phrase.
    ///
    /// **Security Warning**: Handle this value carefully as it can
    /// reconstruct all derived keys.
    #[inline]
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Get the seed bytes for key derivation.
    ///
    /// Chain-specific derivers use this to build the BIP-32 master key.
    #[inline]
    #[must_use]
    pub fn seed(&self) -> &[u8; seed::SEED_LEN] {
        &self.seed
    }

    /// Check if a passphrase was used to derive the seed.
    #[must_use]
    pub const fn has_passphrase(&self) -> bool {
        self.has_passphrase
    }

    /// Get the word count of the mnemonic.
    #[inline]
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.mnemonic.split_whitespace().count()
    }
}
