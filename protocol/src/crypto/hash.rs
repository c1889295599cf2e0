//! # Hashing Utilities
//!
//! Digest functions used by the transaction core. Two jobs depend on them:
//!
//! - **Signing hash** — the digest of the canonical encoding of a
//!   transaction's first six fields. This is the message that gets signed.
//! - **Address derivation** — the trailing 20 bytes of the digest of a
//!   public key.
//!
//! Both must match other implementations bit for bit, so the default is
//! **Keccak-256** (the original Keccak submission padding, *not* NIST
//! SHA3-256). **SHA-256** is provided as an alternative [`HashFunction`]
//! for deployments and tests that substitute the digest.
//!
//! [`HashFunction`] has no `self`: it is used as a type parameter on
//! [`crate::transaction::Transaction`], so a record never carries a hasher
//! instance.

use sha2::Sha256 as Sha256Core;
use sha3::{Digest, Keccak256 as Keccak256Core};

use crate::config::HASH_OUTPUT_LENGTH;

/// A deterministic 256-bit digest.
pub trait HashFunction {
    /// Human-readable algorithm name, used in logs and the CLI.
    const NAME: &'static str;

    /// Digest `data` into 32 bytes.
    fn digest(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH];
}

/// Keccak-256, the default transaction and address hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Keccak256;

impl HashFunction for Keccak256 {
    const NAME: &'static str = "Keccak-256";

    fn digest(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
        keccak256(data)
    }
}

/// SHA-256, available as a drop-in replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sha256;

impl HashFunction for Sha256 {
    const NAME: &'static str = "SHA-256";

    fn digest(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
        sha256(data)
    }
}

/// Compute the Keccak-256 hash of the input data.
///
/// # Example
///
/// ```
/// use tessera_protocol::crypto::keccak256;
///
/// let hash = keccak256(b"tessera");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn keccak256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Keccak256Core::new();
    hasher.update(data);
    to_array(&hasher.finalize())
}

/// Compute the SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256Core::new();
    hasher.update(data);
    to_array(&hasher.finalize())
}

fn to_array(digest: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut output = [0u8; HASH_OUTPUT_LENGTH];
    output.copy_from_slice(digest);
    output
}
