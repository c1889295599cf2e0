//! Human-readable representation.
//!
//! [`TransactionView`] is the JSON shape used by the CLI and by anything that
//! shows a transaction to a person: integers as decimal strings (they can
//! exceed every JSON number type), byte fields as `0x` hex, plus the derived
//! type, hash and sender.
//!
//! The derived entries are output only. Converting a view back into a
//! record reads the nine wire fields and recomputes everything else.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::record::Transaction;
use super::types::{Field, TransactionError, TransactionType};
use crate::address::Address;
use crate::codec::{strip_leading_zeros, uint_bytes};
use crate::crypto::hash::HashFunction;
use crate::crypto::signatures::SignatureEngine;

/// A transaction as plain JSON-friendly values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub nonce: String,
    pub gas_price: String,
    pub gas_limit: String,
    /// `None` for contract creation.
    #[serde(default)]
    pub to: Option<Address>,
    pub value: String,
    #[serde(default)]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Address>,
}

impl<H: HashFunction, E: SignatureEngine> Transaction<H, E> {
    /// Snapshot of the record for display.
    pub fn to_view(&self) -> TransactionView {
        let signature = self.signature();
        TransactionView {
            nonce: self.nonce().to_str_radix(10),
            gas_price: self.gas_price().to_str_radix(10),
            gas_limit: self.gas_limit().to_str_radix(10),
            to: self.to().copied(),
            value: self.value().to_str_radix(10),
            data: prefixed_hex(self.data()),
            v: signature.map(|sig| sig.v),
            r: signature.map(|sig| prefixed_hex(strip_leading_zeros(&sig.r))),
            s: signature.map(|sig| prefixed_hex(strip_leading_zeros(&sig.s))),
            tx_type: Some(self.tx_type()),
            hash: Some(prefixed_hex(&self.hash(true))),
            sender: self.sender_address(),
        }
    }

    /// [`Self::to_view`] as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_view())
    }
}

impl<H: HashFunction, E: SignatureEngine> TryFrom<TransactionView> for Transaction<H, E> {
    type Error = TransactionError;

    fn try_from(view: TransactionView) -> Result<Self, Self::Error> {
        let mut fields = vec![
            parse_uint(Field::Nonce, &view.nonce)?,
            parse_uint(Field::GasPrice, &view.gas_price)?,
            parse_uint(Field::GasLimit, &view.gas_limit)?,
            view.to.map(|a| a.as_bytes().to_vec()).unwrap_or_default(),
            parse_uint(Field::Value, &view.value)?,
            parse_hex(&view.data)?,
        ];
        if view.v.is_some() || view.r.is_some() || view.s.is_some() {
            fields.push(view.v.map(|v| vec![v]).unwrap_or_default());
            fields.push(parse_hex(view.r.as_deref().unwrap_or_default())?);
            fields.push(parse_hex(view.s.as_deref().unwrap_or_default())?);
        }
        Self::from_fields(fields)
    }
}

fn prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn parse_hex(s: &str) -> Result<Vec<u8>, TransactionError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| TransactionError::InvalidHex(e.to_string()))
}

/// Decimal, or hex with a `0x` prefix. The empty string is zero.
fn parse_uint(field: Field, s: &str) -> Result<Vec<u8>, TransactionError> {
    let parsed = match s.strip_prefix("0x") {
        Some("") => Some(BigUint::default()),
        Some(digits) if digits.bytes().all(|b| b.is_ascii_hexdigit()) => {
            BigUint::parse_bytes(digits.as_bytes(), 16)
        }
        None if s.is_empty() => Some(BigUint::default()),
        None if s.bytes().all(|b| b.is_ascii_digit()) => BigUint::parse_bytes(s.as_bytes(), 10),
        _ => None,
    };
    parsed
        .map(|value| uint_bytes(&value))
        .ok_or_else(|| TransactionError::InvalidField {
            field,
            reason: format!("{s:?} is not an unsigned integer"),
        })
}
