//! EIP-155 legacy transaction construction and signing.
//!
//! The wire format is hand-rolled RLP: byte strings use 0x80/0xb7 headers,
//! lists use 0xc0/0xf7, integers are minimal big-endian with zero encoded
//! as the empty string.

use sable::hash::keccak256;

use crate::address::EvmAddress;
use crate::error::Error;
use crate::private_key::EvmPrivateKey;
use crate::Result;

/// Transaction ID (32-byte keccak256 hash of the raw transaction).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TxId([u8; 32]);

impl TxId {
    /// Create from bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get as bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl core::fmt::Display for TxId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// An unsigned EIP-155 legacy transaction.
///
/// The unsigned integer fields make negative amounts unrepresentable;
/// [`EvmTransaction::validate`] enforces the remaining non-zero rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmTransaction {
    /// Transaction nonce.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient address.
    pub to: EvmAddress,
    /// Value in wei.
    pub value: u128,
    /// Call data.
    pub data: Vec<u8>,
    /// Chain ID (EIP-155 replay protection).
    pub chain_id: u64,
}

/// A signed transaction ready for broadcast.
#[derive(Clone, Debug)]
pub struct SignedTransaction {
    /// RLP-encoded signed transaction bytes.
    pub raw_transaction: Vec<u8>,
    /// keccak256 of the raw transaction.
    pub transaction_hash: TxId,
    /// The transaction that was signed.
    pub transaction: EvmTransaction,
}

impl SignedTransaction {
    /// Get the broadcastable `0x`-prefixed hex string.
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw_transaction))
    }
}

impl EvmTransaction {
    /// Create a plain value transfer with the standard 21000 gas limit.
    pub fn transfer(to: EvmAddress, value: u128, nonce: u64, gas_price: u128, chain_id: u64) -> Self {
        Self {
            nonce,
            gas_price,
            gas_limit: 21000,
            to,
            value,
            data: Vec::new(),
            chain_id,
        }
    }

    /// Check the non-zero field rules.
    pub fn validate(&self) -> Result<()> {
        if self.gas_price == 0 {
            return Err(Error::InvalidTransaction("gas_price must be positive"));
        }
        if self.gas_limit == 0 {
            return Err(Error::InvalidTransaction("gas_limit must be positive"));
        }
        if self.chain_id == 0 {
            return Err(Error::InvalidTransaction("chain_id must be positive"));
        }
        Ok(())
    }

    /// Get the EIP-155 hash that is signed.
    ///
    /// keccak256 of the RLP list `[nonce, gasPrice, gasLimit, to, value,
    /// data, chainId, 0, 0]`.
    pub fn signing_hash(&self) -> [u8; 32] {
        keccak256(&self.rlp_encode_for_signing())
    }

    /// Sign the transaction with a private key.
    ///
    /// The signature `v` is `recovery_id + chain_id * 2 + 35` per EIP-155.
    pub fn sign(&self, private_key: &EvmPrivateKey) -> Result<SignedTransaction> {
        self.validate()?;

        let hash = self.signing_hash();
        let sig = private_key.sign_prehash(&hash)?;

        let v = self.chain_id * 2 + 35 + u64::from(sig.v);

        let items = vec![
            rlp_encode_u64(self.nonce),
            rlp_encode_u128(self.gas_price),
            rlp_encode_u64(self.gas_limit),
            rlp_encode_bytes(self.to.as_bytes()),
            rlp_encode_u128(self.value),
            rlp_encode_bytes(&self.data),
            rlp_encode_u64(v),
            rlp_encode_bytes(trim_leading_zeros(&sig.r)),
            rlp_encode_bytes(trim_leading_zeros(&sig.s)),
        ];
        let raw_transaction = rlp_encode_list(&items);
        let transaction_hash = TxId(keccak256(&raw_transaction));

        Ok(SignedTransaction {
            raw_transaction,
            transaction_hash,
            transaction: self.clone(),
        })
    }

    /// RLP encode for signing (unsigned fields plus EIP-155 placeholders).
    fn rlp_encode_for_signing(&self) -> Vec<u8> {
        let items = vec![
            rlp_encode_u64(self.nonce),
            rlp_encode_u128(self.gas_price),
            rlp_encode_u64(self.gas_limit),
            rlp_encode_bytes(self.to.as_bytes()),
            rlp_encode_u128(self.value),
            rlp_encode_bytes(&self.data),
            rlp_encode_u64(self.chain_id),
            rlp_encode_u64(0), // empty r
            rlp_encode_u64(0), // empty s
        ];

        rlp_encode_list(&items)
    }
}

/// RLP encode a u64.
fn rlp_encode_u64(value: u64) -> Vec<u8> {
    if value == 0 {
        return vec![0x80];
    }

    let bytes = value.to_be_bytes();
    rlp_encode_bytes(trim_leading_zeros(&bytes))
}

/// RLP encode a u128.
fn rlp_encode_u128(value: u128) -> Vec<u8> {
    if value == 0 {
        return vec![0x80];
    }

    let bytes = value.to_be_bytes();
    rlp_encode_bytes(trim_leading_zeros(&bytes))
}

/// RLP encode a byte string.
fn rlp_encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.is_empty() {
        return vec![0x80];
    }

    if bytes.len() == 1 && bytes[0] < 0x80 {
        return vec![bytes[0]];
    }

    if bytes.len() <= 55 {
        let mut result = Vec::with_capacity(1 + bytes.len());
        result.push(0x80 + bytes.len() as u8);
        result.extend_from_slice(bytes);
        return result;
    }

    let len_bytes = encode_length(bytes.len());
    let mut result = Vec::with_capacity(1 + len_bytes.len() + bytes.len());
    result.push(0xb7 + len_bytes.len() as u8);
    result.extend_from_slice(&len_bytes);
    result.extend_from_slice(bytes);
    result
}

/// RLP encode a list of already-encoded items.
fn rlp_encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let total_len: usize = items.iter().map(|i| i.len()).sum();

    if total_len <= 55 {
        let mut result = Vec::with_capacity(1 + total_len);
        result.push(0xc0 + total_len as u8);
        for item in items {
            result.extend_from_slice(item);
        }
        return result;
    }

    let len_bytes = encode_length(total_len);
    let mut result = Vec::with_capacity(1 + len_bytes.len() + total_len);
    result.push(0xf7 + len_bytes.len() as u8);
    result.extend_from_slice(&len_bytes);
    for item in items {
        result.extend_from_slice(item);
    }
    result
}

/// Encode a payload length as minimal big-endian bytes.
fn encode_length(len: usize) -> Vec<u8> {
    if len <= 0xff {
        vec![len as u8]
    } else if len <= 0xffff {
        (len as u16).to_be_bytes().to_vec()
    } else if len <= 0xff_ffff {
        let bytes = (len as u32).to_be_bytes();
        bytes[1..].to_vec()
    } else {
        (len as u32).to_be_bytes().to_vec()
    }
}

/// Trim leading zeros from bytes.
fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first_nonzero..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn eip155_example_tx() -> EvmTransaction {
        // The worked example from the EIP-155 specification.
        EvmTransaction {
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21000,
            to: EvmAddress::from_bytes([0x35u8; 20]),
            value: 1_000_000_000_000_000_000,
            data: Vec::new(),
            chain_id: 1,
        }
    }

    fn eip155_example_key() -> EvmPrivateKey {
        EvmPrivateKey::from_bytes(&[0x46u8; 32]).unwrap()
    }

    #[test]
    fn test_transfer_defaults() {
        let tx = EvmTransaction::transfer(
            EvmAddress::from_bytes([1u8; 20]),
            1_000_000_000_000_000_000,
            0,
            20_000_000_000,
            1,
        );
        assert_eq!(tx.gas_limit, 21000);
        assert!(tx.data.is_empty());
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_validation_rejections() {
        let mut tx = eip155_example_tx();
        tx.gas_price = 0;
        assert!(matches!(
            tx.validate(),
            Err(Error::InvalidTransaction("gas_price must be positive"))
        ));

        let mut tx = eip155_example_tx();
        tx.gas_limit = 0;
        assert!(tx.validate().is_err());

        let mut tx = eip155_example_tx();
        tx.chain_id = 0;
        assert!(tx.validate().is_err());
        assert!(tx.sign(&eip155_example_key()).is_err());
    }

    #[test]
    fn test_eip155_signing_hash() {
        let tx = eip155_example_tx();
        assert_eq!(
            tx.signing_hash(),
            hex!("daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53")
        );
    }

    #[test]
    fn test_eip155_signed_raw_transaction() {
        let tx = eip155_example_tx();
        let signed = tx.sign(&eip155_example_key()).unwrap();

        assert_eq!(
            signed.raw_hex(),
            "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080\
             25a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276\
             a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
    }

    #[test]
    fn test_v_encodes_chain_id() {
        let signed = eip155_example_tx().sign(&eip155_example_key()).unwrap();
        // chain 1: v is 37 or 38
        let v_byte = signed.raw_transaction[signed.raw_transaction.len() - 67];
        assert!(v_byte == 37 || v_byte == 38);
    }

    #[test]
    fn test_chain_id_changes_raw_bytes_and_hash() {
        let key = eip155_example_key();
        let mainnet = eip155_example_tx();
        let mut goerli = eip155_example_tx();
        goerli.chain_id = 5;

        let a = mainnet.sign(&key).unwrap();
        let b = goerli.sign(&key).unwrap();

        assert_ne!(a.raw_transaction, b.raw_transaction);
        assert_ne!(a.transaction_hash, b.transaction_hash);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = eip155_example_key();
        let a = eip155_example_tx().sign(&key).unwrap();
        let b = eip155_example_tx().sign(&key).unwrap();
        assert_eq!(a.raw_transaction, b.raw_transaction);
    }

    #[test]
    fn test_rlp_encode_u64() {
        assert_eq!(rlp_encode_u64(0), vec![0x80]);
        assert_eq!(rlp_encode_u64(1), vec![0x01]);
        assert_eq!(rlp_encode_u64(127), vec![0x7f]);
        assert_eq!(rlp_encode_u64(128), vec![0x81, 0x80]);
        assert_eq!(rlp_encode_u64(256), vec![0x82, 0x01, 0x00]);
    }

    #[test]
    fn test_rlp_encode_bytes() {
        assert_eq!(rlp_encode_bytes(&[]), vec![0x80]);
        assert_eq!(rlp_encode_bytes(&[0x00]), vec![0x00]);
        assert_eq!(rlp_encode_bytes(&[0x7f]), vec![0x7f]);
        assert_eq!(rlp_encode_bytes(&[0x80]), vec![0x81, 0x80]);

        // 55-byte boundary: one-byte header below, long form above
        let fifty_five = vec![0xaa; 55];
        assert_eq!(rlp_encode_bytes(&fifty_five)[0], 0x80 + 55);
        let fifty_six = vec![0xaa; 56];
        let encoded = rlp_encode_bytes(&fifty_six);
        assert_eq!(encoded[0], 0xb8);
        assert_eq!(encoded[1], 56);
    }

    #[test]
    fn test_rlp_encode_list() {
        let items: Vec<Vec<u8>> = vec![];
        assert_eq!(rlp_encode_list(&items), vec![0xc0]);

        let items = vec![vec![0x01], vec![0x02]];
        assert_eq!(rlp_encode_list(&items), vec![0xc2, 0x01, 0x02]);

        let items = vec![vec![0xaa; 60]];
        let encoded = rlp_encode_list(&items);
        assert_eq!(encoded[0], 0xf8);
        assert_eq!(encoded[1], 60);
    }

    #[test]
    fn test_tx_id_display() {
        let hash = TxId([0x01; 32]);
        let display = hash.to_string();
        assert!(display.starts_with("0x0101"));
        assert_eq!(display.len(), 66);
    }

    #[test]
    fn test_call_data_is_signed() {
        let key = eip155_example_key();
        let plain = eip155_example_tx();
        let mut with_data = eip155_example_tx();
        with_data.data = vec![0xde, 0xad, 0xbe, 0xef];

        let a = plain.sign(&key).unwrap();
        let b = with_data.sign(&key).unwrap();
        assert_ne!(a.raw_transaction, b.raw_transaction);
    }
}
