//! Core types used throughout the library.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A fixed-size secret byte buffer with automatic zeroization.
///
/// Comparisons are constant-time; the Debug representation is redacted.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretBytes<const N: usize>([u8; N]);

impl<const N: usize> SecretBytes<N> {
    /// Create from a byte array
    #[inline]
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Get a reference to the inner bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Get a mutable reference to the inner bytes
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.0
    }
}

impl<const N: usize> AsRef<[u8]> for SecretBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> AsMut<[u8]> for SecretBytes<N> {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl<const N: usize> From<[u8; N]> for SecretBytes<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> Default for SecretBytes<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> core::fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SecretBytes<{}>[REDACTED]", N)
    }
}

impl<const N: usize> ConstantTimeEq for SecretBytes<N> {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.ct_eq(&other.0)
    }
}

impl<const N: usize> PartialEq for SecretBytes<N> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<const N: usize> Eq for SecretBytes<N> {}

/// Type alias for 32-byte secret (private key, symmetric key, etc.)
pub type Secret32 = SecretBytes<32>;

/// Type alias for 64-byte secret (seed)
pub type Secret64 = SecretBytes<64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let secret = Secret32::new([0xab; 32]);
        let out = format!("{:?}", secret);
        assert!(!out.contains("ab"));
        assert!(out.contains("REDACTED"));
    }

    #[test]
    fn equality() {
        let a = Secret32::new([1; 32]);
        let b = Secret32::new([1; 32]);
        let c = Secret32::new([2; 32]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
