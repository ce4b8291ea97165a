//! EVM address with EIP-55 checksum encoding.

use sable::hash::keccak256;

use crate::error::Error;
use crate::public_key::EvmPublicKey;
use crate::Result;

/// EVM address (20 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EvmAddress([u8; 20]);

impl EvmAddress {
    /// Create from raw 20-byte address.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Create from a public key.
    ///
    /// The address is the last 20 bytes of keccak256 over the 64-byte
    /// uncompressed point, without the 0x04 prefix.
    pub fn from_public_key(public_key: &EvmPublicKey) -> Self {
        let hash = keccak256(&public_key.to_raw_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to an EIP-55 checksummed string.
    ///
    /// Casing follows keccak256 of the lowercase hex form: a hex letter is
    /// uppercased when the corresponding checksum nibble is >= 8.
    pub fn to_checksum_string(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut result = String::with_capacity(42);
        result.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if ch.is_ascii_alphabetic() && nibble >= 8 {
                result.push(ch.to_ascii_uppercase());
            } else {
                result.push(ch);
            }
        }
        result
    }
}

impl core::fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_checksum_string())
    }
}

impl core::str::FromStr for EvmAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex_part = s
            .strip_prefix("0x")
            .ok_or_else(|| Error::InvalidAddress(s.into()))?;
        if hex_part.len() != 40 {
            return Err(Error::InvalidAddress(s.into()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_part, &mut bytes)
            .map_err(|_| Error::InvalidAddress(s.into()))?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for EvmAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for EvmAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<EvmAddress> for [u8; 20] {
    fn from(addr: EvmAddress) -> Self {
        addr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// EIP-55 test address
    const TEST_ADDR_LOWER: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
    const TEST_ADDR_CHECKSUM: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    mod parsing_tests {
        use super::*;

        #[test]
        fn from_checksum_str() {
            let addr: EvmAddress = TEST_ADDR_CHECKSUM.parse().unwrap();
            let expected = hex_literal::hex!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
            assert_eq!(addr.as_bytes(), &expected);
        }

        #[test]
        fn from_lowercase_str() {
            let addr: EvmAddress = TEST_ADDR_LOWER.parse().unwrap();
            let expected = hex_literal::hex!("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
            assert_eq!(addr.as_bytes(), &expected);
        }

        #[test]
        fn rejects_missing_prefix() {
            let result = "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse::<EvmAddress>();
            assert!(matches!(result, Err(Error::InvalidAddress(_))));
        }

        #[test]
        fn rejects_wrong_length() {
            assert!("0x5aaeb6".parse::<EvmAddress>().is_err());
            assert!("0x".parse::<EvmAddress>().is_err());
            let too_long = format!("{TEST_ADDR_LOWER}00");
            assert!(too_long.parse::<EvmAddress>().is_err());
        }

        #[test]
        fn rejects_non_hex() {
            let result = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaeg".parse::<EvmAddress>();
            assert!(matches!(result, Err(Error::InvalidAddress(_))));
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn to_checksum_string() {
            let addr: EvmAddress = TEST_ADDR_LOWER.parse().unwrap();
            assert_eq!(addr.to_checksum_string(), TEST_ADDR_CHECKSUM);
        }

        #[test]
        fn display_uses_checksum() {
            let addr: EvmAddress = TEST_ADDR_LOWER.parse().unwrap();
            assert_eq!(addr.to_string(), TEST_ADDR_CHECKSUM);
        }

        #[test]
        fn eip55_official_vectors() {
            // From the EIP-55 reference test set.
            for checksummed in [
                "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
                "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
                "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
                "0x52908400098527886E0F7030069857D2E4169EE7",
                "0xde709f2102306220921060314715629080e2fb77",
            ] {
                let addr: EvmAddress = checksummed.to_lowercase().parse().unwrap();
                assert_eq!(addr.to_checksum_string(), checksummed);
            }
        }
    }
}
