//! Unsigned integers as canonical byte strings.
//!
//! Integers travel as minimal big-endian byte strings: no leading zeros, and
//! zero is the empty string. Inputs are read leniently (leading zeros and the
//! single `0x00` sentinel are accepted) and always written canonically, so
//! two differently padded encodings of the same value re-encode identically.

use num_bigint::BigUint;
use num_traits::Zero;

use super::rlp::Item;

/// Minimal big-endian bytes of `value`; zero yields an empty vector.
///
/// `BigUint::to_bytes_be` returns `[0]` for zero, which is not canonical
/// here.
pub fn uint_bytes(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

/// Wraps [`uint_bytes`] in a byte-string item.
pub fn encode_uint(value: &BigUint) -> Item {
    Item::Bytes(uint_bytes(value))
}

/// Reads a big-endian integer of any width. Leading zeros are ignored.
pub fn decode_uint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Slice of `bytes` without its leading zero bytes.
pub fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

/// Left-pads `bytes` (after stripping leading zeros) into a fixed-width
/// array. Returns `None` when the significant bytes do not fit.
pub fn left_pad<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    let significant = strip_leading_zeros(bytes);
    if significant.len() > N {
        return None;
    }
    let mut out = [0u8; N];
    out[N - significant.len()..].copy_from_slice(significant);
    Some(out)
}
