//! Transaction construction via the builder pattern.
//!
//! [`TransactionBuilder`] assembles an unsigned draft field by field. Setters
//! that can fail (only `to` today) record the first error and `build()`
//! reports it, so a chain of calls never needs intermediate `?`.

use num_bigint::BigUint;

use super::record::Transaction;
use super::types::TransactionError;
use crate::address::IntoAddress;
use crate::crypto::hash::{HashFunction, Keccak256};
use crate::crypto::keys::Keypair;
use crate::crypto::signatures::{Secp256k1, SignatureEngine};

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Transaction`] drafts.
///
/// # Usage
///
/// ```rust
/// use tessera_protocol::crypto::keys::Keypair;
/// use tessera_protocol::transaction::{Transaction, TransactionBuilder, TransactionType};
///
/// let keypair = Keypair::generate();
/// let tx: Transaction = TransactionBuilder::new()
///     .nonce(1u32)
///     .gas_price(10u32)
///     .gas_limit(21_000u32)
///     .to("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf")
///     .value(1_000_000u32)
///     .build_signed(&keypair)
///     .unwrap();
///
/// assert_eq!(tx.tx_type(), TransactionType::Message);
/// assert!(tx.validate());
/// ```
///
/// Leaving out `to` builds a contract creation.
pub struct TransactionBuilder<H: HashFunction = Keccak256, E: SignatureEngine = Secp256k1> {
    tx: Transaction<H, E>,
    error: Option<TransactionError>,
}

impl<H: HashFunction, E: SignatureEngine> TransactionBuilder<H, E> {
    /// Starts from an all-zero draft.
    pub fn new() -> Self {
        Self {
            tx: Transaction::new(),
            error: None,
        }
    }

    pub fn nonce(mut self, nonce: impl Into<BigUint>) -> Self {
        self.tx.set_nonce(nonce);
        self
    }

    pub fn gas_price(mut self, gas_price: impl Into<BigUint>) -> Self {
        self.tx.set_gas_price(gas_price);
        self
    }

    pub fn gas_limit(mut self, gas_limit: impl Into<BigUint>) -> Self {
        self.tx.set_gas_limit(gas_limit);
        self
    }

    /// Sets the recipient. An invalid address surfaces from `build()`.
    pub fn to(mut self, to: impl IntoAddress) -> Self {
        if let Err(err) = self.tx.set_to(to) {
            self.error.get_or_insert(err);
        }
        self
    }

    pub fn value(mut self, value: impl Into<BigUint>) -> Self {
        self.tx.set_value(value);
        self
    }

    /// Attaches the call data or init code.
    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.tx.set_data(data);
        self
    }

    /// Consumes the builder and produces an unsigned [`Transaction`].
    pub fn build(self) -> Result<Transaction<H, E>, TransactionError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.tx),
        }
    }

    /// Builds and signs in one step.
    pub fn build_signed(self, keypair: &Keypair) -> Result<Transaction<H, E>, TransactionError> {
        let mut tx = self.build()?;
        tx.sign_with(keypair)?;
        Ok(tx)
    }
}

impl<H: HashFunction, E: SignatureEngine> Default for TransactionBuilder<H, E> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
