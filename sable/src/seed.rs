//! BIP-39 seed derivation.
//!
//! A mnemonic is stretched into a 64-byte binary seed with
//! PBKDF2-HMAC-SHA512, using `"mnemonic" + passphrase` as the salt and
//! 2048 iterations. The seed is the sole input to BIP-32 master key
//! derivation.

use hmac::Hmac;
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};

/// Length of a BIP-39 seed in bytes.
pub const SEED_LEN: usize = 64;

/// PBKDF2 iteration count fixed by BIP-39.
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Derive the 64-byte seed for a mnemonic and optional passphrase.
///
/// The mnemonic is used as the PBKDF2 password verbatim; it is the
/// caller's job to validate it first. An empty passphrase is the common
/// case and yields the standard test vectors.
pub fn to_seed(mnemonic: &str, passphrase: &str) -> Result<Zeroizing<[u8; SEED_LEN]>> {
    let mut salt = Zeroizing::new(String::with_capacity(8 + passphrase.len()));
    salt.push_str("mnemonic");
    salt.push_str(passphrase);

    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    let result = pbkdf2::pbkdf2::<Hmac<Sha512>>(
        mnemonic.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
        seed.as_mut(),
    );
    if result.is_err() {
        seed.zeroize();
        return Err(Error::KeyDerivation);
    }
    Ok(seed)
}
