//! # Key Management
//!
//! secp256k1 keypairs for transaction senders.
//!
//! A [`Keypair`] only exists to produce the raw secret bytes the signature
//! engine consumes and to answer "which address is mine?". Transactions never
//! store keys: the sender is recovered from the signature.
//!
//! ## Security considerations
//!
//! - Keys are generated from the OS RNG (`OsRng`).
//! - `Debug` prints the address only. Secret bytes are never logged.
//! - `Keypair` deliberately does not implement `Serialize`; exporting a
//!   secret goes through [`Keypair::secret_key_bytes`] explicitly.

use std::fmt;

use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use thiserror::Error;

use super::hash::Keccak256;
use super::signatures::{Secp256k1, SignatureEngine};
use crate::address::Address;
use crate::config::SCALAR_LENGTH;

/// Errors that can occur during key operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,
}

/// A secp256k1 signing keypair.
///
/// # Examples
///
/// ```
/// use tessera_protocol::crypto::keys::Keypair;
///
/// let kp = Keypair::generate();
/// let restored = Keypair::from_bytes(&kp.secret_key_bytes()).unwrap();
/// assert_eq!(kp.address(), restored.address());
/// ```
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Reconstruct a keypair from a 32-byte big-endian secret scalar.
    ///
    /// Zero and values at or above the curve order are rejected.
    pub fn from_bytes(secret_key_bytes: &[u8]) -> Result<Self, KeyError> {
        if secret_key_bytes.len() != SCALAR_LENGTH {
            return Err(KeyError::InvalidSecretKey);
        }
        let signing_key =
            SigningKey::from_slice(secret_key_bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Reconstruct a keypair from hex, with or without a `0x` prefix.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(digits).map_err(|_| KeyError::InvalidSecretKey)?;
        Self::from_bytes(&bytes)
    }

    /// Exports the raw 32-byte secret scalar. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; SCALAR_LENGTH] {
        let mut out = [0u8; SCALAR_LENGTH];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    /// The verifying half of the keypair.
    pub fn public_key(&self) -> VerifyingKey {
        *self.signing_key.verifying_key()
    }

    /// Uncompressed public key without the SEC1 tag (64 bytes).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        Secp256k1::public_key_bytes(&self.public_key())
    }

    /// Hex-encoded [`Self::public_key_bytes`].
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    /// The account address controlled by this keypair.
    pub fn address(&self) -> Address {
        Address::from_public_key::<Keccak256>(&self.public_key_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair(address={})", self.address())
    }
}

impl PartialEq for Keypair {
    /// Keypairs compare by public key.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Keypair {}
