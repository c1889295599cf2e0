//! # Transaction Module
//!
//! The signed transaction record: canonical fields, wire encoding, hashing,
//! signing, sender recovery, fee accounting and validation.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        — TransactionType, Field order, TransactionError
//! record.rs       — Transaction: construction, setters, encoding, hashes
//! signing.rs      — sign, sender recovery, signature checks
//! verification.rs — data/base fees, upfront cost, validate, ValidationError
//! builder.rs      — fluent TransactionBuilder for drafts
//! view.rs         — TransactionView, the JSON representation
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** — [`TransactionBuilder`] or [`Transaction::from_fields`].
//! 2. **Sign** — [`Transaction::sign`] attaches `(v, r, s)` over the signing
//!    hash (the first six fields).
//! 3. **Broadcast** — [`Transaction::serialize`] produces the wire bytes.
//! 4. **Receive** — [`Transaction::decode`] rebuilds and re-checks the record.
//! 5. **Validate** — [`Transaction::validate`] checks the signature and that
//!    the gas limit covers the base fee.
//!
//! ## Design Decisions
//!
//! - There is no sender field. The sender is recovered from the signature,
//!   and the record refuses to name one if a signed field changed after
//!   signing.
//! - One type covers drafts and signed records. `is_signed()` tells them
//!   apart, and every sender or validation query on a draft answers
//!   `None` / `false`.
//! - Integers are `BigUint` end to end. Field widths on the wire are not
//!   bounded, so neither is the arithmetic.

pub mod builder;
pub mod record;
pub mod signing;
pub mod types;
pub mod verification;
pub mod view;

pub use builder::TransactionBuilder;
pub use record::Transaction;
pub use types::{Field, TransactionError, TransactionType};
pub use verification::ValidationError;
pub use view::TransactionView;
