//! # Digital Signatures
//!
//! ECDSA over secp256k1 with public-key recovery. A transaction carries no
//! sender field: the sender is whoever's public key falls out of
//! `recover(signing_hash, r, s, v)`.
//!
//! ## The `v` convention
//!
//! This is where implementations drift apart, so it is pinned here:
//!
//! ```text
//! v = 27 + recovery_index        recovery_index in 0..=3
//! bit 0 of recovery_index        parity of R.y
//! bit 1 of recovery_index        R.x overflowed the group order
//! ```
//!
//! Any `v` outside `27..=30` fails recovery.
//!
//! ## Range checks
//!
//! `r` and `s` must lie in `[1, n-1]`. Out-of-range components are rejected
//! by [`in_scalar_range`] before any point arithmetic happens.
//!
//! ## Failure model
//!
//! Signing with a bad key is a caller error and returns
//! [`SignatureError::InvalidKey`]. Recovery and verification work on
//! untrusted input and report failure as `None` / `false`; they never panic.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::config::{
    HASH_OUTPUT_LENGTH, MAX_RECOVERY_INDEX, RECOVERY_ID_OFFSET, SCALAR_LENGTH, SECP256K1_ORDER,
    SIGNATURE_LENGTH,
};

/// Errors during signing.
///
/// Intentionally vague about key material.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid private key: not a valid secp256k1 scalar")]
    InvalidKey,
}

// ---------------------------------------------------------------------------
// RecoverableSignature
// ---------------------------------------------------------------------------

/// A signature plus the recovery byte needed to reconstruct the signer's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecoverableSignature {
    /// `RECOVERY_ID_OFFSET + recovery_index`.
    pub v: u8,
    /// Big-endian `r`, zero-padded to 32 bytes.
    pub r: [u8; SCALAR_LENGTH],
    /// Big-endian `s`, zero-padded to 32 bytes.
    pub s: [u8; SCALAR_LENGTH],
}

impl RecoverableSignature {
    /// Builds a signature from a raw recovery index (0..=3).
    pub fn from_recovery_index(
        recovery_index: u8,
        r: [u8; SCALAR_LENGTH],
        s: [u8; SCALAR_LENGTH],
    ) -> Self {
        Self {
            v: RECOVERY_ID_OFFSET.wrapping_add(recovery_index),
            r,
            s,
        }
    }

    /// The recovery index encoded in `v`, or `None` if `v` is outside the
    /// pinned `27..=30` window.
    pub fn recovery_index(&self) -> Option<u8> {
        self.v
            .checked_sub(RECOVERY_ID_OFFSET)
            .filter(|index| *index <= MAX_RECOVERY_INDEX)
    }

    /// Returns `true` when both `r` and `s` lie in `[1, n-1]`.
    pub fn has_valid_scalars(&self) -> bool {
        in_scalar_range(&self.r) && in_scalar_range(&self.s)
    }

    /// `r || s || v`.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..SCALAR_LENGTH].copy_from_slice(&self.r);
        out[SCALAR_LENGTH..2 * SCALAR_LENGTH].copy_from_slice(&self.s);
        out[2 * SCALAR_LENGTH] = self.v;
        out
    }

    /// Parses `r || s || v`.
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LENGTH]) -> Self {
        let mut r = [0u8; SCALAR_LENGTH];
        let mut s = [0u8; SCALAR_LENGTH];
        r.copy_from_slice(&bytes[..SCALAR_LENGTH]);
        s.copy_from_slice(&bytes[SCALAR_LENGTH..2 * SCALAR_LENGTH]);
        Self {
            v: bytes[2 * SCALAR_LENGTH],
            r,
            s,
        }
    }
}

/// Returns `true` when the big-endian scalar lies in `[1, n-1]`.
///
/// Equal-width big-endian arrays compare lexicographically in numeric
/// order, so no bignum is needed.
pub fn in_scalar_range(scalar: &[u8; SCALAR_LENGTH]) -> bool {
    scalar.iter().any(|&b| b != 0) && *scalar < SECP256K1_ORDER
}

// ---------------------------------------------------------------------------
// SignatureEngine
// ---------------------------------------------------------------------------

/// Sign / recover / verify over a 32-byte message digest.
///
/// Implementations are stateless; the trait is used as a type parameter so
/// that the transaction record can be exercised against substitute engines.
pub trait SignatureEngine {
    /// The engine's public key representation.
    type PublicKey: Clone + PartialEq + std::fmt::Debug;

    /// Signs `digest` with a raw secret key.
    fn sign(
        digest: &[u8; HASH_OUTPUT_LENGTH],
        secret_key: &[u8],
    ) -> Result<RecoverableSignature, SignatureError>;

    /// Reconstructs the signer's key, or `None` if the signature is invalid
    /// for this digest.
    fn recover_public_key(
        digest: &[u8; HASH_OUTPUT_LENGTH],
        signature: &RecoverableSignature,
    ) -> Option<Self::PublicKey>;

    /// Checks `(r, s)` against a known key.
    fn verify(
        public_key: &Self::PublicKey,
        digest: &[u8; HASH_OUTPUT_LENGTH],
        r: &[u8; SCALAR_LENGTH],
        s: &[u8; SCALAR_LENGTH],
    ) -> bool;

    /// Bytes hashed to derive the account address.
    fn public_key_bytes(public_key: &Self::PublicKey) -> Vec<u8>;

    /// Public key belonging to a raw secret key.
    fn derive_public_key(secret_key: &[u8]) -> Result<Self::PublicKey, SignatureError>;
}

/// secp256k1 ECDSA backed by the `k256` crate.
///
/// Signatures are deterministic (RFC 6979) and low-S normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Secp256k1;

impl Secp256k1 {
    fn signature_from_parts(
        r: &[u8; SCALAR_LENGTH],
        s: &[u8; SCALAR_LENGTH],
    ) -> Option<Signature> {
        let mut bytes = [0u8; 2 * SCALAR_LENGTH];
        bytes[..SCALAR_LENGTH].copy_from_slice(r);
        bytes[SCALAR_LENGTH..].copy_from_slice(s);
        Signature::from_slice(&bytes).ok()
    }

    /// Exactly 32 bytes in `[1, n-1]`. `from_slice` alone would left-pad short keys.
    fn signing_key(secret_key: &[u8]) -> Result<SigningKey, SignatureError> {
        if secret_key.len() != SCALAR_LENGTH {
            return Err(SignatureError::InvalidKey);
        }
        SigningKey::from_slice(secret_key).map_err(|_| SignatureError::InvalidKey)
    }
}

impl SignatureEngine for Secp256k1 {
    type PublicKey = VerifyingKey;

    fn sign(
        digest: &[u8; HASH_OUTPUT_LENGTH],
        secret_key: &[u8],
    ) -> Result<RecoverableSignature, SignatureError> {
        let signing_key = Self::signing_key(secret_key)?;
        let (signature, recovery_id) = signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| SignatureError::InvalidKey)?;

        let bytes = signature.to_bytes();
        let mut r = [0u8; SCALAR_LENGTH];
        let mut s = [0u8; SCALAR_LENGTH];
        r.copy_from_slice(&bytes[..SCALAR_LENGTH]);
        s.copy_from_slice(&bytes[SCALAR_LENGTH..]);

        Ok(RecoverableSignature::from_recovery_index(
            recovery_id.to_byte(),
            r,
            s,
        ))
    }

    fn recover_public_key(
        digest: &[u8; HASH_OUTPUT_LENGTH],
        signature: &RecoverableSignature,
    ) -> Option<VerifyingKey> {
        if !signature.has_valid_scalars() {
            trace!("recovery skipped: r or s outside [1, n-1]");
            return None;
        }
        let recovery_id = RecoveryId::from_byte(signature.recovery_index()?)?;
        let sig = Self::signature_from_parts(&signature.r, &signature.s)?;
        VerifyingKey::recover_from_prehash(digest, &sig, recovery_id).ok()
    }

    fn verify(
        public_key: &VerifyingKey,
        digest: &[u8; HASH_OUTPUT_LENGTH],
        r: &[u8; SCALAR_LENGTH],
        s: &[u8; SCALAR_LENGTH],
    ) -> bool {
        if !in_scalar_range(r) || !in_scalar_range(s) {
            return false;
        }
        match Self::signature_from_parts(r, s) {
            Some(sig) => public_key.verify_prehash(digest, &sig).is_ok(),
            None => false,
        }
    }

    fn public_key_bytes(public_key: &VerifyingKey) -> Vec<u8> {
        // Uncompressed SEC1 point minus the 0x04 tag.
        public_key.to_encoded_point(false).as_bytes()[1..].to_vec()
    }

    fn derive_public_key(secret_key: &[u8]) -> Result<VerifyingKey, SignatureError> {
        Ok(*Self::signing_key(secret_key)?.verifying_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PUBLIC_KEY_LENGTH;
    use crate::crypto::hash::keccak256;

    fn secret(byte: u8) -> [u8; 32] {
        let mut key = [0u8; 32];
        key[31] = byte;
        key
    }

    #[test]
    fn test_sign_and_recover() {
        let digest = keccak256(b"send 10 to bob");
        let sig = Secp256k1::sign(&digest, &secret(7)).unwrap();
        let recovered = Secp256k1::recover_public_key(&digest, &sig).unwrap();
        assert_eq!(recovered, Secp256k1::derive_public_key(&secret(7)).unwrap());
        assert!(Secp256k1::verify(&recovered, &digest, &sig.r, &sig.s));
    }

    #[test]
    fn produced_v_is_27_or_28() {
        for i in 1..=16u8 {
            let digest = keccak256(&[i]);
            let sig = Secp256k1::sign(&digest, &secret(i)).unwrap();
            assert!(sig.v == 27 || sig.v == 28, "unexpected v = {}", sig.v);
            assert_eq!(sig.recovery_index(), Some(sig.v - 27));
        }
    }

    #[test]
    fn test_deterministic_signatures() {
        let digest = keccak256(b"same message");
        let a = Secp256k1::sign(&digest, &secret(3)).unwrap();
        let b = Secp256k1::sign(&digest, &secret(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn produced_s_is_low() {
        // low-S: s <= n/2, i.e. the top bit of s is clear for every value
        // strictly below the half order's leading 0x7f byte.
        let digest = keccak256(b"low s");
        let sig = Secp256k1::sign(&digest, &secret(9)).unwrap();
        assert!(sig.s[0] <= 0x7f);
    }

    #[test]
    fn flipped_parity_recovers_a_different_key() {
        let digest = keccak256(b"parity");
        let mut sig = Secp256k1::sign(&digest, &secret(5)).unwrap();
        let expected = Secp256k1::derive_public_key(&secret(5)).unwrap();
        sig.v = if sig.v == 27 { 28 } else { 27 };
        let recovered = Secp256k1::recover_public_key(&digest, &sig);
        assert_ne!(recovered, Some(expected));
    }

    #[test]
    fn rejects_invalid_secret_keys() {
        let digest = keccak256(b"x");
        assert_eq!(
            Secp256k1::sign(&digest, &[0u8; 32]),
            Err(SignatureError::InvalidKey)
        );
        assert_eq!(
            Secp256k1::sign(&digest, &SECP256K1_ORDER),
            Err(SignatureError::InvalidKey)
        );
        assert_eq!(
            Secp256k1::sign(&digest, &[1u8; 16]),
            Err(SignatureError::InvalidKey)
        );
        for len in [24, 31, 33] {
            let key = vec![1u8; len];
            assert_eq!(
                Secp256k1::sign(&digest, &key),
                Err(SignatureError::InvalidKey),
                "{len}-byte key"
            );
            assert!(Secp256k1::derive_public_key(&key).is_err(), "{len}-byte key");
        }
    }

    #[test]
    fn recovery_rejects_bad_v() {
        let digest = keccak256(b"v");
        let mut sig = Secp256k1::sign(&digest, &secret(2)).unwrap();
        for v in [0u8, 1, 26, 31, 255] {
            sig.v = v;
            assert!(Secp256k1::recover_public_key(&digest, &sig).is_none());
        }
    }

    #[test]
    fn recovery_rejects_out_of_range_scalars() {
        let digest = keccak256(b"range");
        let good = Secp256k1::sign(&digest, &secret(4)).unwrap();

        let zero_s = RecoverableSignature { s: [0u8; 32], ..good };
        let order_s = RecoverableSignature {
            s: SECP256K1_ORDER,
            ..good
        };
        let max_r = RecoverableSignature {
            r: [0xff; 32],
            ..good
        };
        for sig in [zero_s, order_s, max_r] {
            assert!(!sig.has_valid_scalars());
            assert!(Secp256k1::recover_public_key(&digest, &sig).is_none());
        }
    }

    #[test]
    fn verify_rejects_wrong_digest_and_range() {
        let digest = keccak256(b"original");
        let sig = Secp256k1::sign(&digest, &secret(6)).unwrap();
        let pk = Secp256k1::derive_public_key(&secret(6)).unwrap();
        assert!(!Secp256k1::verify(&pk, &keccak256(b"other"), &sig.r, &sig.s));
        assert!(!Secp256k1::verify(&pk, &digest, &sig.r, &SECP256K1_ORDER));
    }

    #[test]
    fn scalar_range_boundaries() {
        let mut n_minus_one = SECP256K1_ORDER;
        n_minus_one[31] -= 1;
        assert!(in_scalar_range(&n_minus_one));
        assert!(in_scalar_range(&secret(1)));
        assert!(!in_scalar_range(&[0u8; 32]));
        assert!(!in_scalar_range(&SECP256K1_ORDER));
    }

    #[test]
    fn public_key_bytes_are_untagged_uncompressed() {
        let pk = Secp256k1::derive_public_key(&secret(1)).unwrap();
        let bytes = Secp256k1::public_key_bytes(&pk);
        assert_eq!(bytes.len(), PUBLIC_KEY_LENGTH);
        // x-coordinate of the generator point
        assert_eq!(
            hex::encode(&bytes[..32]),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn signature_bytes_layout() {
        let sig = RecoverableSignature::from_recovery_index(1, [0x11; 32], [0x22; 32]);
        assert_eq!(sig.v, 28);
        let bytes = sig.to_bytes();
        assert_eq!(bytes[0], 0x11);
        assert_eq!(bytes[32], 0x22);
        assert_eq!(bytes[64], 28);
        assert_eq!(RecoverableSignature::from_bytes(&bytes), sig);
    }
}
