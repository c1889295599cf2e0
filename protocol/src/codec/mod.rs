//! # Binary Canonical Codec
//!
//! Transactions cross every boundary (signing, storage, the wire) as RLP:
//! nested lists of byte strings with length prefixes. The grammar is frozen;
//! peers that disagree on a single prefix byte compute different hashes and
//! therefore recover different senders.
//!
//! - [`rlp`] — the item model, encoder and strict decoder.
//! - [`uint`] — canonical integer <-> byte-string conversion.

pub mod rlp;
pub mod uint;

pub use rlp::{decode, decode_prefix, encode, encode_byte_list, encoded_len, CodecError, Item};
pub use uint::{decode_uint, encode_uint, left_pad, strip_leading_zeros, uint_bytes};
