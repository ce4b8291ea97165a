//! BIP-39 mnemonic encoding and validation.
//!
//! The engine only deals in 24-word mnemonics: 256 bits of entropy plus an
//! 8-bit SHA-256 checksum, packed big-endian into 24 groups of 11 bits, each
//! group indexing the English wordlist.
//!
//! Mnemonics are returned in [`Zeroizing`] buffers; they are never persisted
//! in cleartext by any caller in this workspace.

use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};
use crate::hash::sha256;
use crate::wordlist;

/// Entropy length in bytes for a 24-word mnemonic.
pub const ENTROPY_LEN: usize = 32;

/// Number of words in a mnemonic.
pub const WORD_COUNT: usize = 24;

// Entropy (256 bits) plus checksum byte, the packed bit stream.
const PACKED_LEN: usize = ENTROPY_LEN + 1;

/// Generate a fresh 24-word mnemonic from the given CSPRNG.
pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Zeroizing<String> {
    let mut entropy = Zeroizing::new([0u8; ENTROPY_LEN]);
    rng.fill_bytes(entropy.as_mut());
    from_entropy(&entropy)
}

/// Encode 32 bytes of entropy as a 24-word mnemonic.
///
/// Deterministic: the same entropy always yields the same phrase.
pub fn from_entropy(entropy: &[u8; ENTROPY_LEN]) -> Zeroizing<String> {
    let mut packed = Zeroizing::new([0u8; PACKED_LEN]);
    packed[..ENTROPY_LEN].copy_from_slice(entropy);
    // Checksum: first 8 bits of SHA-256 over the entropy.
    let mut digest = sha256(entropy);
    packed[ENTROPY_LEN] = digest[0];
    digest.zeroize();

    let mut phrase = Zeroizing::new(String::with_capacity(WORD_COUNT * 9));
    for group in 0..WORD_COUNT {
        let index = index_at(&packed, group);
        if group > 0 {
            phrase.push(' ');
        }
        // The index is 11 bits, always within the 2048-word list.
        phrase.push_str(wordlist::word_at(index as usize).unwrap_or_default());
    }
    phrase
}

/// Check whether a phrase is a well-formed 24-word mnemonic.
///
/// Malformed input (wrong word count, unknown word, bad checksum) returns
/// `false`; this function never panics on well-typed input.
pub fn validate(phrase: &str) -> bool {
    to_entropy(phrase).is_ok()
}

/// Decode a 24-word mnemonic back into its 32 entropy bytes.
///
/// The typed counterpart of [`validate`], for callers that need the cause
/// of a rejection.
pub fn to_entropy(phrase: &str) -> Result<Zeroizing<[u8; ENTROPY_LEN]>> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() != WORD_COUNT {
        return Err(Error::InvalidWordCount(words.len()));
    }

    let mut packed = Zeroizing::new([0u8; PACKED_LEN]);
    for (group, word) in words.iter().enumerate() {
        let index =
            wordlist::index_of(word).ok_or_else(|| Error::UnknownWord((*word).into()))?;
        set_index_at(&mut packed, group, index);
    }

    let mut entropy = Zeroizing::new([0u8; ENTROPY_LEN]);
    entropy.copy_from_slice(&packed[..ENTROPY_LEN]);

    let mut digest = sha256(entropy.as_ref());
    let checksum_ok = digest[0] == packed[ENTROPY_LEN];
    digest.zeroize();
    if !checksum_ok {
        return Err(Error::InvalidChecksum);
    }
    Ok(entropy)
}

/// Read the 11-bit group at position `group` from the packed bit stream.
fn index_at(packed: &[u8; PACKED_LEN], group: usize) -> u16 {
    let mut index = 0u16;
    for bit in group * 11..group * 11 + 11 {
        index <<= 1;
        if packed[bit / 8] & (0x80 >> (bit % 8)) != 0 {
            index |= 1;
        }
    }
    index
}

/// Write the 11-bit group at position `group` into the packed bit stream.
fn set_index_at(packed: &mut [u8; PACKED_LEN], group: usize, index: u16) {
    for (offset, bit) in (group * 11..group * 11 + 11).enumerate() {
        if index & (1 << (10 - offset)) != 0 {
            packed[bit / 8] |= 0x80 >> (bit % 8);
        }
    }
}
