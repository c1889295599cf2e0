//! Fees, upfront cost and validation.
//!
//! A transaction is valid when its signature checks out and its gas limit
//! covers the base fee:
//!
//! ```text
//! data_fee    = 0                              if data is empty or [0x00]
//!             = len(data) * TXDATA             otherwise
//! base_fee    = data_fee + TRANSACTION
//! upfront     = gas_limit * gas_price + value
//! valid       = signature ok && base_fee <= gas_limit
//! ```
//!
//! All arithmetic is arbitrary precision; field widths on the wire are
//! unbounded. Failures are ordinary outcomes for untrusted input, so the
//! boolean entry points never error and [`ValidationError`] carries the
//! reason for callers that want it.

use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;
use tracing::debug;

use super::record::Transaction;
use crate::crypto::hash::HashFunction;
use crate::crypto::signatures::SignatureEngine;
use crate::fees::{self, FeeName, FeeSchedule};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a well-formed transaction failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("transaction is unsigned")]
    Unsigned,

    /// `r` or `s` is zero or not below the curve order.
    #[error("signature component outside [1, n-1]")]
    SignatureOutOfRange,

    #[error("invalid recovery id v = {v}")]
    InvalidRecoveryId { v: u8 },

    #[error("no public key recovers from this signature")]
    RecoveryFailed,

    #[error("signature does not verify against the recovered key")]
    SignatureMismatch,

    /// A signed field changed after the signature was attached.
    #[error("transaction was modified after signing")]
    ModifiedAfterSigning,

    #[error("gas limit {gas_limit} is below the base fee {base_fee}")]
    InsufficientGas { base_fee: BigUint, gas_limit: BigUint },
}

// ---------------------------------------------------------------------------
// Fees and validation
// ---------------------------------------------------------------------------

impl<H: HashFunction, E: SignatureEngine> Transaction<H, E> {
    /// Payload cost under the process-wide fee schedule.
    pub fn data_fee(&self) -> BigUint {
        self.data_fee_with(fees::global())
    }

    /// Payload cost under `schedule`. An empty payload and the single zero
    /// byte sentinel both cost nothing.
    pub fn data_fee_with(&self, schedule: &FeeSchedule) -> BigUint {
        if self.data.is_empty() || self.data == [0u8] {
            return BigUint::zero();
        }
        BigUint::from(self.data.len()) * schedule.fee(FeeName::TxData)
    }

    /// Minimum gas under the process-wide fee schedule.
    pub fn base_fee(&self) -> BigUint {
        self.base_fee_with(fees::global())
    }

    pub fn base_fee_with(&self, schedule: &FeeSchedule) -> BigUint {
        self.data_fee_with(schedule) + schedule.fee(FeeName::Transaction)
    }

    /// What the sender must hold for the transaction to be admissible:
    /// `gas_limit * gas_price + value`.
    pub fn upfront_cost(&self) -> BigUint {
        &self.gas_limit * &self.gas_price + &self.value
    }

    /// Full validation under the process-wide fee schedule, returning the
    /// sender's public key on success.
    pub fn validate_detailed(&self) -> Result<E::PublicKey, ValidationError> {
        self.validate_detailed_with(fees::global())
    }

    pub fn validate_detailed_with(
        &self,
        schedule: &FeeSchedule,
    ) -> Result<E::PublicKey, ValidationError> {
        let public_key = self.check_signature()?;
        let base_fee = self.base_fee_with(schedule);
        if base_fee > self.gas_limit {
            return Err(ValidationError::InsufficientGas {
                base_fee,
                gas_limit: self.gas_limit.clone(),
            });
        }
        Ok(public_key)
    }

    /// `true` when the signature is valid and the gas limit covers the base fee.
    pub fn validate(&self) -> bool {
        self.validate_with(fees::global())
    }

    pub fn validate_with(&self, schedule: &FeeSchedule) -> bool {
        match self.validate_detailed_with(schedule) {
            Ok(_) => {
                debug!(hash = %hex::encode(self.hash(true)), "transaction valid");
                true
            }
            Err(reason) => {
                debug!(hash = %hex::encode(self.hash(true)), %reason, "transaction invalid");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
