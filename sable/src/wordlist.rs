//! BIP-39 English wordlist access.
//!
//! The wallet only ever speaks the canonical English list of 2048 words; it
//! is sourced from the `bip39` crate so the bytes match the published list
//! exactly, which is required for interoperability with other wallets.

use bip39::Language;

/// Number of words in a BIP-39 wordlist.
pub const WORDLIST_LEN: usize = 2048;

/// Get the full English wordlist, ordered by index.
#[inline]
pub fn words() -> &'static [&'static str; WORDLIST_LEN] {
    Language::English.word_list()
}

/// Get the word at the given index, if in range.
#[inline]
pub fn word_at(index: usize) -> Option<&'static str> {
    words().get(index).copied()
}

/// Get the index of a word, if it is part of the list.
///
/// The English wordlist is sorted, so this is a binary search.
#[inline]
pub fn index_of(word: &str) -> Option<u16> {
    words().binary_search(&word).ok().map(|i| i as u16)
}
