//! # Cryptographic Primitives
//!
//! Everything the transaction core needs from cryptography, behind two
//! small traits:
//!
//! - [`HashFunction`] — a pure 256-bit digest (Keccak-256 by default).
//! - [`SignatureEngine`] — sign, recover and verify over a digest
//!   (secp256k1 ECDSA by default).
//!
//! Both are thin, typed wrappers around audited crates (`sha3`, `sha2`,
//! `k256`). Curve and hash math is never hand-written here.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{keccak256, sha256, HashFunction, Keccak256, Sha256};
pub use keys::{KeyError, Keypair};
pub use signatures::{
    in_scalar_range, RecoverableSignature, Secp256k1, SignatureEngine, SignatureError,
};
