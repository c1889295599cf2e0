//! Core type definitions for transactions.
//!
//! The vocabulary shared by the record, signing and validation code: the
//! derived transaction type, the fixed field order, and the structural error
//! type raised while building a record.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::address::AddressError;
use crate::codec::CodecError;
use crate::crypto::signatures::SignatureError;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// What a transaction does, derived from its `to` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// `to` is empty: the payload is init code for a new contract.
    ContractCreation,
    /// `to` names an account: a value transfer or contract call.
    Message,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContractCreation => write!(f, "contract_creation"),
            Self::Message => write!(f, "message"),
        }
    }
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// The nine wire slots, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Nonce,
    GasPrice,
    GasLimit,
    To,
    Value,
    Data,
    V,
    R,
    S,
}

impl Field {
    /// Every slot in wire order. The first six form the signing payload.
    pub const ALL: [Field; 9] = [
        Field::Nonce,
        Field::GasPrice,
        Field::GasLimit,
        Field::To,
        Field::Value,
        Field::Data,
        Field::V,
        Field::R,
        Field::S,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Field::Nonce => "nonce",
            Field::GasPrice => "gasPrice",
            Field::GasLimit => "gasLimit",
            Field::To => "to",
            Field::Value => "value",
            Field::Data => "data",
            Field::V => "v",
            Field::R => "r",
            Field::S => "s",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// TransactionError
// ---------------------------------------------------------------------------

/// Structural errors: the record cannot be built or mutated as asked.
///
/// Signature and fee problems on a well-formed record are not errors here;
/// they are reported through [`super::ValidationError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] CodecError),

    #[error("expected 6 or 9 fields, got {count}")]
    InvalidFieldCount { count: usize },

    #[error("`to` must be empty or 20 bytes, got {len} bytes")]
    InvalidAddressLength { len: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid {field} field: {reason}")]
    InvalidField { field: Field, reason: String },

    #[error("invalid private key")]
    InvalidKey,
}

impl From<AddressError> for TransactionError {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::InvalidLength { len } => Self::InvalidAddressLength { len },
            AddressError::InvalidHex(reason) => Self::InvalidHex(reason),
        }
    }
}

impl From<SignatureError> for TransactionError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::InvalidKey => Self::InvalidKey,
        }
    }
}
