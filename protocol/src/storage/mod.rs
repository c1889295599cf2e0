//! # Storage Module
//!
//! A narrow key-value interface for persisting raw transactions, plus two
//! reference backends.
//!
//! ## Architecture
//!
//! ```text
//! mod.rs    — TxStore trait, StoreError, put/get transaction helpers
//! memory.rs — MemoryStore, a locked HashMap for tests and tooling
//! db.rs     — SledStore, sled-backed persistence
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! Transaction ──serialize()──► bytes ──put(hash(true), bytes)──► TxStore
//! TxStore ──get(hash)──► bytes ──Transaction::decode──► Transaction
//! ```
//!
//! Stores move opaque bytes. They never look inside a value; decoding and
//! validation happen in [`crate::transaction`] on the way back out.

pub mod db;
pub mod memory;

pub use db::SledStore;
pub use memory::MemoryStore;

use thiserror::Error;
use tracing::trace;

use crate::config::HASH_OUTPUT_LENGTH;
use crate::crypto::hash::HashFunction;
use crate::crypto::signatures::SignatureEngine;
use crate::transaction::{Transaction, TransactionError};

/// Errors surfaced by a [`TxStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {key_hex}")]
    NotFound { key_hex: String },

    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("stored bytes are not a valid transaction: {0}")]
    Decode(#[from] TransactionError),
}

impl StoreError {
    pub(crate) fn not_found(key: &[u8]) -> Self {
        Self::NotFound {
            key_hex: hex::encode(key),
        }
    }
}

/// A byte-oriented key-value store.
pub trait TxStore: Send + Sync {
    /// Value stored under `key`, or [`StoreError::NotFound`].
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}

/// Persists `tx` under its full hash and returns that hash.
pub fn put_transaction<S, H, E>(
    store: &S,
    tx: &Transaction<H, E>,
) -> Result<[u8; HASH_OUTPUT_LENGTH], StoreError>
where
    S: TxStore + ?Sized,
    H: HashFunction,
    E: SignatureEngine,
{
    let key = tx.hash(true);
    store.put(&key, &tx.serialize())?;
    trace!(key = %hex::encode(key), "stored transaction");
    Ok(key)
}

/// Loads and decodes the transaction stored under `hash`.
pub fn get_transaction<S, H, E>(store: &S, hash: &[u8]) -> Result<Transaction<H, E>, StoreError>
where
    S: TxStore + ?Sized,
    H: HashFunction,
    E: SignatureEngine,
{
    let bytes = store.get(hash)?;
    Ok(Transaction::decode(&bytes)?)
}
