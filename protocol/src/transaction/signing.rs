//! Signing and sender recovery.
//!
//! A record has no sender field. Signing attaches `(v, r, s)` over the
//! signing hash; the sender is whoever's public key recovers from that
//! signature. Recovery runs against the *current* fields, so the record also
//! remembers which signing hash the signature was attached to and refuses to
//! name a sender once any signed field has changed.

use tracing::{debug, trace};

use super::record::Transaction;
use super::types::TransactionError;
use super::verification::ValidationError;
use crate::address::Address;
use crate::crypto::hash::HashFunction;
use crate::crypto::keys::Keypair;
use crate::crypto::signatures::SignatureEngine;

impl<H: HashFunction, E: SignatureEngine> Transaction<H, E> {
    /// Whether a signature is attached. Says nothing about its validity.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Signs the record in place, replacing any previous signature.
    ///
    /// # Example
    ///
    /// ```
    /// use tessera_protocol::crypto::keys::Keypair;
    /// use tessera_protocol::transaction::Transaction;
    ///
    /// let keypair = Keypair::generate();
    /// let mut tx: Transaction = Transaction::new();
    /// tx.set_to(keypair.address()).unwrap();
    /// tx.sign(&keypair.secret_key_bytes()).unwrap();
    ///
    /// assert!(tx.verify_signature());
    /// assert_eq!(tx.sender_address(), Some(keypair.address()));
    /// ```
    pub fn sign(&mut self, secret_key: &[u8]) -> Result<(), TransactionError> {
        let digest = self.signing_hash();
        let signature = E::sign(&digest, secret_key)?;
        self.signature = Some(signature);
        self.sealed_hash = Some(digest);
        debug!(
            signing_hash = %hex::encode(digest),
            v = signature.v,
            "transaction signed"
        );
        Ok(())
    }

    /// Signs with a keypair's secret scalar.
    pub fn sign_with(&mut self, keypair: &Keypair) -> Result<(), TransactionError> {
        self.sign(&keypair.secret_key_bytes())
    }

    /// Recovers the signer and checks the signature in full.
    ///
    /// Checks run cheapest first: presence, scalar range and `v` before the
    /// hash comparison, and curve arithmetic last.
    pub fn check_signature(&self) -> Result<E::PublicKey, ValidationError> {
        let signature = self.signature.as_ref().ok_or(ValidationError::Unsigned)?;
        if !signature.has_valid_scalars() {
            return Err(ValidationError::SignatureOutOfRange);
        }
        if signature.recovery_index().is_none() {
            return Err(ValidationError::InvalidRecoveryId { v: signature.v });
        }

        let digest = self.signing_hash();
        if self.sealed_hash != Some(digest) {
            return Err(ValidationError::ModifiedAfterSigning);
        }

        let public_key =
            E::recover_public_key(&digest, signature).ok_or(ValidationError::RecoveryFailed)?;
        if !E::verify(&public_key, &digest, &signature.r, &signature.s) {
            return Err(ValidationError::SignatureMismatch);
        }
        Ok(public_key)
    }

    /// The signer's public key, or `None` if the signature does not check out.
    pub fn sender_public_key(&self) -> Option<E::PublicKey> {
        self.check_signature().ok()
    }

    /// The signer's address: the last 20 bytes of the hash of its public key.
    pub fn sender_address(&self) -> Option<Address> {
        let public_key = self.sender_public_key()?;
        Some(Address::from_public_key::<H>(&E::public_key_bytes(
            &public_key,
        )))
    }

    /// `true` when a signature is attached, well-formed, matches the current
    /// fields and recovers to a key that verifies it.
    pub fn verify_signature(&self) -> bool {
        match self.check_signature() {
            Ok(_) => true,
            Err(reason) => {
                trace!(%reason, "signature rejected");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
