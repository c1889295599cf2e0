// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tessera Protocol — Core Library
//!
//! The signed transaction core of an account-based ledger: how a transaction
//! is laid out, encoded, hashed, signed, and checked before anything else in
//! the node is allowed to look at it.
//!
//! Three things must agree bit for bit with every other implementation on
//! the network: the RLP encoding, the Keccak-256 digest, and secp256k1
//! signature recovery. Get any of them slightly wrong and the same bytes
//! recover a different sender.
//!
//! ## Architecture
//!
//! - **codec** — RLP item model, canonical encoder, strict decoder.
//! - **crypto** — hash and signature engine traits, secp256k1 keys.
//! - **address** — 20-byte account addresses.
//! - **fees** — the named fee schedule, installed once per process.
//! - **transaction** — the record itself: fields, signing, validation.
//! - **storage** — a key-value collaborator with memory and sled backends.
//! - **network** — message envelopes for exchanging transactions.
//! - **config** — protocol constants.
//!
//! ## Design Philosophy
//!
//! 1. Untrusted bytes never panic. Malformed input is an error value; a bad
//!    signature is `false`.
//! 2. No hand-written curve or hash math. `k256`, `sha3` and `sha2` do it.
//! 3. Integers are arbitrary precision wherever they come from the wire.
//! 4. If it touches a signature, it has tests. Plural.

pub mod address;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod fees;
pub mod network;
pub mod storage;
pub mod transaction;

pub use address::Address;
pub use fees::FeeSchedule;
pub use transaction::{Transaction, TransactionBuilder, TransactionError, ValidationError};
