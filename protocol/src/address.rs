//! # Account Addresses
//!
//! An address is the trailing 20 bytes of the digest of a public key. It
//! appears on the wire only as a transaction's `to` field; the sender's
//! address is never transmitted and is always re-derived from the signature.
//!
//! Callers hand addresses around in several shapes (raw bytes, hex typed by
//! a human, integers from contract code). [`IntoAddress`] normalizes all of
//! them and enforces the one rule that matters: exactly 20 bytes.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::codec::uint_bytes;
use crate::config::ADDRESS_LENGTH;
use crate::crypto::hash::HashFunction;

/// Errors raised while normalizing an address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must be {ADDRESS_LENGTH} bytes, got {len}")]
    InvalidLength { len: usize },

    #[error("invalid hex address: {0}")]
    InvalidHex(String),
}

/// A 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Wraps raw address bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Copies a slice that must be exactly 20 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength { len: bytes.len() });
        }
        let mut out = [0u8; ADDRESS_LENGTH];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Parses 40 hex characters, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Interprets an integer as a big-endian address, left-padding with
    /// zeros. Values wider than 20 bytes are rejected.
    pub fn from_uint(value: &BigUint) -> Result<Self, AddressError> {
        let bytes = uint_bytes(value);
        if bytes.len() > ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength { len: bytes.len() });
        }
        let mut out = [0u8; ADDRESS_LENGTH];
        out[ADDRESS_LENGTH - bytes.len()..].copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// Derives the address for a public key: the last 20 bytes of its digest.
    pub fn from_public_key<H: HashFunction>(public_key_bytes: &[u8]) -> Self {
        let digest = H::digest(public_key_bytes);
        let mut out = [0u8; ADDRESS_LENGTH];
        out.copy_from_slice(&digest[digest.len() - ADDRESS_LENGTH..]);
        Self(out)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Lower-case hex without a prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// IntoAddress
// ---------------------------------------------------------------------------

/// Anything that can be normalized into an [`Address`].
pub trait IntoAddress {
    fn into_address(self) -> Result<Address, AddressError>;
}

impl IntoAddress for Address {
    fn into_address(self) -> Result<Address, AddressError> {
        Ok(self)
    }
}

impl IntoAddress for [u8; ADDRESS_LENGTH] {
    fn into_address(self) -> Result<Address, AddressError> {
        Ok(Address(self))
    }
}

impl IntoAddress for &[u8] {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::from_slice(self)
    }
}

impl IntoAddress for Vec<u8> {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::from_slice(&self)
    }
}

impl IntoAddress for &str {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::from_hex(self)
    }
}

impl IntoAddress for String {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::from_hex(&self)
    }
}

impl IntoAddress for &BigUint {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::from_uint(self)
    }
}

impl IntoAddress for BigUint {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::from_uint(&self)
    }
}

impl IntoAddress for u64 {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::from_uint(&BigUint::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::Keccak256;

    const SAMPLE: &str = "7e5f4552091a69125d5dfcb7b8c2659029395bdf";

    #[test]
    fn hex_with_and_without_prefix() {
        let a = Address::from_hex(SAMPLE).unwrap();
        let b = Address::from_hex(&format!("0x{}", SAMPLE)).unwrap();
        let c = Address::from_hex(&format!("0X{}", SAMPLE.to_uppercase())).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.to_hex(), SAMPLE);
        assert_eq!(a.to_string(), format!("0x{}", SAMPLE));
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert_eq!(
            Address::from_slice(&[1u8; 19]),
            Err(AddressError::InvalidLength { len: 19 })
        );
        assert_eq!(
            Address::from_hex("0xdeadbeef"),
            Err(AddressError::InvalidLength { len: 4 })
        );
        assert!(matches!(
            Address::from_hex("zz"),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn integers_are_left_padded() {
        let addr = 0x1234u64.into_address().unwrap();
        let mut expected = [0u8; 20];
        expected[18] = 0x12;
        expected[19] = 0x34;
        assert_eq!(addr.as_bytes(), &expected);
    }

    #[test]
    fn oversized_integer_rejected() {
        let wide = BigUint::from_bytes_be(&[1u8; 21]);
        assert_eq!(
            wide.into_address(),
            Err(AddressError::InvalidLength { len: 21 })
        );
    }

    #[test]
    fn all_input_shapes_agree() {
        let raw = hex::decode(SAMPLE).unwrap();
        let from_vec = raw.clone().into_address().unwrap();
        let from_slice = raw.as_slice().into_address().unwrap();
        let from_str = SAMPLE.into_address().unwrap();
        let from_int = BigUint::from_bytes_be(&raw).into_address().unwrap();
        assert_eq!(from_vec, from_slice);
        assert_eq!(from_vec, from_str);
        assert_eq!(from_vec, from_int);
    }

    #[test]
    fn derives_from_public_key_digest_tail() {
        let pk = [0x42u8; 64];
        let digest = Keccak256::digest(&pk);
        let addr = Address::from_public_key::<Keccak256>(&pk);
        assert_eq!(addr.as_bytes(), &digest[12..]);
    }

    #[test]
    fn serde_uses_prefixed_hex() {
        let addr = Address::from_hex(SAMPLE).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", SAMPLE));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
