//! # Wire Messages
//!
//! The envelope peers use to exchange transactions. Framing, peer
//! management and retries live in the transport; this module only turns
//! envelopes into bytes and back.
//!
//! ```text
//! envelope = RLP [ kind (1 byte), payload (byte string) ]
//!
//! Transactions     (0x12)  payload = RLP [ tx_fields, tx_fields, ... ]
//! GetTransactions  (0x16)  payload = RLP [ hash, hash, ... ]
//! ```
//!
//! Transactions inside an announcement are decoded one by one. A malformed
//! entry does not poison the batch: each one comes back as its own
//! `Result`, and the caller decides what to drop and whom to penalize.

use bytes::Bytes;
use thiserror::Error;
use tracing::trace;

use crate::codec::{self, encode_byte_list, CodecError, Item};
use crate::config::HASH_OUTPUT_LENGTH;
use crate::crypto::hash::HashFunction;
use crate::crypto::signatures::SignatureEngine;
use crate::transaction::{Transaction, TransactionError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("envelope is not valid RLP: {0}")]
    Codec(#[from] CodecError),

    #[error("unknown message kind {kind:#04x}")]
    UnknownKind { kind: u8 },

    #[error("malformed message: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// MessageKind
// ---------------------------------------------------------------------------

/// Message identifiers understood by this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    /// Announces full transactions.
    Transactions = 0x12,
    /// Asks a peer for transactions by hash.
    GetTransactions = 0x16,
}

impl MessageKind {
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = MessageError;

    fn try_from(kind: u8) -> Result<Self, Self::Error> {
        match kind {
            0x12 => Ok(Self::Transactions),
            0x16 => Ok(Self::GetTransactions),
            other => Err(MessageError::UnknownKind { kind: other }),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A typed payload ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub kind: MessageKind,
    pub payload: Bytes,
}

impl Envelope {
    pub fn new(kind: MessageKind, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// Announces `txs` to a peer.
    pub fn announce<H: HashFunction, E: SignatureEngine>(txs: &[Transaction<H, E>]) -> Self {
        let list = Item::List(txs.iter().map(Transaction::to_item).collect());
        Self::new(MessageKind::Transactions, codec::encode(&list))
    }

    /// Requests the transactions with the given full hashes.
    pub fn request(hashes: &[[u8; HASH_OUTPUT_LENGTH]]) -> Self {
        Self::new(MessageKind::GetTransactions, encode_byte_list(hashes))
    }

    pub fn encode(&self) -> Vec<u8> {
        encode_byte_list(&[&[self.kind.as_byte()][..], &self.payload[..]])
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        let parts = match codec::decode(bytes)? {
            Item::List(parts) => parts,
            Item::Bytes(_) => return Err(MessageError::Malformed("envelope is not a list".into())),
        };
        let (kind, payload) = match parts.as_slice() {
            [Item::Bytes(kind), Item::Bytes(payload)] => (kind, payload),
            _ => {
                return Err(MessageError::Malformed(
                    "envelope must hold exactly [kind, payload]".into(),
                ))
            }
        };
        let kind = match kind.as_slice() {
            [byte] => MessageKind::try_from(*byte)?,
            _ => return Err(MessageError::Malformed("kind must be one byte".into())),
        };
        trace!(?kind, payload_len = payload.len(), "decoded envelope");
        Ok(Self::new(kind, payload.clone()))
    }

    /// Decodes an announcement. Each entry is decoded independently.
    pub fn transactions<H: HashFunction, E: SignatureEngine>(
        &self,
    ) -> Result<Vec<Result<Transaction<H, E>, TransactionError>>, MessageError> {
        let entries = self.payload_list(MessageKind::Transactions)?;
        Ok(entries.into_iter().map(Transaction::try_from).collect())
    }

    /// Decodes a request into the hashes it asks for.
    pub fn requested_hashes(&self) -> Result<Vec<[u8; HASH_OUTPUT_LENGTH]>, MessageError> {
        self.payload_list(MessageKind::GetTransactions)?
            .into_iter()
            .map(|item| {
                item.as_bytes()
                    .and_then(|bytes| <[u8; HASH_OUTPUT_LENGTH]>::try_from(bytes).ok())
                    .ok_or_else(|| MessageError::Malformed("hash must be 32 bytes".into()))
            })
            .collect()
    }

    fn payload_list(&self, expected: MessageKind) -> Result<Vec<Item>, MessageError> {
        if self.kind != expected {
            return Err(MessageError::Malformed(format!(
                "expected {expected:?}, envelope holds {:?}",
                self.kind
            )));
        }
        match codec::decode(&self.payload)? {
            Item::List(items) => Ok(items),
            Item::Bytes(_) => Err(MessageError::Malformed("payload is not a list".into())),
        }
    }
}
