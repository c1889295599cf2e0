//! # Protocol Configuration & Constants
//!
//! Every fixed number the transaction core depends on lives here. These are
//! wire-level facts: peers that disagree on any of them cannot exchange
//! transactions, so they are constants rather than runtime settings.
//!
//! The one piece of runtime configuration, the fee schedule, lives in
//! [`crate::fees`].

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Crate-level protocol version string, reported by the CLI.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Signature scheme used to authenticate senders.
pub const SIGNING_ALGORITHM: &str = "ECDSA/secp256k1";

/// Default hash function for signing hashes and address derivation.
pub const PRIMARY_HASH_FUNCTION: &str = "Keccak-256";

/// Hash output length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Account addresses are the trailing 20 bytes of a public-key digest.
pub const ADDRESS_LENGTH: usize = 20;

/// Width of a secp256k1 scalar (`r`, `s` and secret keys).
pub const SCALAR_LENGTH: usize = 32;

/// Serialized recoverable signature: `r (32) || s (32) || v (1)`.
pub const SIGNATURE_LENGTH: usize = 65;

/// Uncompressed SEC1 public key without the leading `0x04` tag.
pub const PUBLIC_KEY_LENGTH: usize = 64;

/// Offset between the stored `v` byte and the recovery index.
///
/// `v = RECOVERY_ID_OFFSET + recovery_index`. Produced signatures therefore
/// carry `v` of 27 or 28 (28 + 2 for the practically unreachable
/// x-overflow case).
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// Largest recovery index a secp256k1 signature can carry.
pub const MAX_RECOVERY_INDEX: u8 = 3;

/// Order `n` of the secp256k1 group, big-endian.
pub const SECP256K1_ORDER: [u8; SCALAR_LENGTH] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

// ---------------------------------------------------------------------------
// Transaction Layout
// ---------------------------------------------------------------------------

/// Field count of a complete (possibly signed) transaction.
pub const SIGNED_FIELD_COUNT: usize = 9;

/// Field count of an unsigned draft (`v`, `r`, `s` omitted).
pub const UNSIGNED_FIELD_COUNT: usize = 6;

// ---------------------------------------------------------------------------
// Codec Limits
// ---------------------------------------------------------------------------

/// Strings and list payloads up to this length use the short form prefix.
pub const RLP_SHORT_LIMIT: usize = 55;

/// Maximum list nesting accepted when decoding untrusted input.
pub const MAX_RLP_DEPTH: usize = 64;
