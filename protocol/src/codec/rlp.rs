//! Recursive length-prefix encoding.
//!
//! An [`Item`] is either a byte string or a list of items. The encoding is
//! canonical: every item has exactly one valid byte representation, and the
//! decoder rejects anything else. Lengths are big-endian with no leading
//! zeros.
//!
//! ```text
//! 0x00..=0x7f   single byte, encodes itself
//! 0x80..=0xb7   string, length = b - 0x80 (0..=55)
//! 0xb8..=0xbf   string, (b - 0xb7) length bytes follow, length >= 56
//! 0xc0..=0xf7   list, payload length = b - 0xc0 (0..=55)
//! 0xf8..=0xff   list, (b - 0xf7) length bytes follow, payload >= 56
//! ```

use thiserror::Error;

use crate::config::{MAX_RLP_DEPTH, RLP_SHORT_LIMIT};

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xc0;

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A decoded RLP value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    /// A byte string. The empty string is a valid value.
    Bytes(Vec<u8>),
    /// An ordered list of nested items.
    List(Vec<Item>),
}

impl Item {
    /// Builds a byte-string item.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    /// Builds a list item.
    pub fn list(items: Vec<Item>) -> Self {
        Self::List(items)
    }

    /// Returns the byte string, or `None` for lists.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(data) => Some(data),
            Self::List(_) => None,
        }
    }

    /// Returns the nested items, or `None` for byte strings.
    pub fn as_list(&self) -> Option<&[Item]> {
        match self {
            Self::List(items) => Some(items),
            Self::Bytes(_) => None,
        }
    }

    /// Consumes the item and returns its nested items, or `None` for byte strings.
    pub fn into_list(self) -> Option<Vec<Item>> {
        match self {
            Self::List(items) => Some(items),
            Self::Bytes(_) => None,
        }
    }

    /// Returns `true` for list items.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl From<Vec<u8>> for Item {
    fn from(data: Vec<u8>) -> Self {
        Self::Bytes(data)
    }
}

impl From<&[u8]> for Item {
    fn from(data: &[u8]) -> Self {
        Self::Bytes(data.to_vec())
    }
}

impl From<Vec<Item>> for Item {
    fn from(items: Vec<Item>) -> Self {
        Self::List(items)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons an input is not a valid canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("empty input")]
    Empty,

    #[error("input truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("{count} trailing bytes after the top-level item")]
    TrailingBytes { count: usize },

    #[error("single byte {byte:#04x} must be encoded as itself")]
    NonCanonicalSingleByte { byte: u8 },

    #[error("length {len} must use the short form")]
    NonCanonicalLength { len: usize },

    #[error("length prefix has a leading zero byte")]
    LeadingZeroLength,

    #[error("{width}-byte length prefix does not fit in memory")]
    LengthOverflow { width: usize },

    #[error("list nesting exceeds {max} levels")]
    TooDeep { max: usize },
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encodes an item into its canonical byte form.
pub fn encode(item: &Item) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(item));
    encode_into(item, &mut out);
    out
}

/// Encodes a list of byte strings without building intermediate items.
pub fn encode_byte_list<T: AsRef<[u8]>>(fields: &[T]) -> Vec<u8> {
    let payload_len: usize = fields.iter().map(|f| string_len(f.as_ref())).sum();
    let mut out = Vec::with_capacity(header_len(payload_len) + payload_len);
    write_header(LIST_OFFSET, payload_len, &mut out);
    for field in fields {
        write_string(field.as_ref(), &mut out);
    }
    out
}

/// Number of bytes `encode(item)` produces.
pub fn encoded_len(item: &Item) -> usize {
    match item {
        Item::Bytes(data) => string_len(data),
        Item::List(items) => {
            let payload: usize = items.iter().map(encoded_len).sum();
            header_len(payload) + payload
        }
    }
}

fn encode_into(item: &Item, out: &mut Vec<u8>) {
    match item {
        Item::Bytes(data) => write_string(data, out),
        Item::List(items) => {
            let payload: usize = items.iter().map(encoded_len).sum();
            write_header(LIST_OFFSET, payload, out);
            for nested in items {
                encode_into(nested, out);
            }
        }
    }
}

fn write_string(data: &[u8], out: &mut Vec<u8>) {
    if data.len() == 1 && data[0] < STRING_OFFSET {
        out.push(data[0]);
    } else {
        write_header(STRING_OFFSET, data.len(), out);
        out.extend_from_slice(data);
    }
}

fn string_len(data: &[u8]) -> usize {
    if data.len() == 1 && data[0] < STRING_OFFSET {
        1
    } else {
        header_len(data.len()) + data.len()
    }
}

fn write_header(offset: u8, len: usize, out: &mut Vec<u8>) {
    if len <= RLP_SHORT_LIMIT {
        out.push(offset + len as u8);
    } else {
        let be = minimal_be(len);
        out.push(offset + RLP_SHORT_LIMIT as u8 + be.len() as u8);
        out.extend_from_slice(&be);
    }
}

fn header_len(len: usize) -> usize {
    if len <= RLP_SHORT_LIMIT {
        1
    } else {
        1 + minimal_be(len).len()
    }
}

fn minimal_be(len: usize) -> Vec<u8> {
    let bytes = len.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decodes exactly one item spanning the whole input.
pub fn decode(input: &[u8]) -> Result<Item, CodecError> {
    let (item, used) = decode_prefix(input)?;
    if used != input.len() {
        return Err(CodecError::TrailingBytes {
            count: input.len() - used,
        });
    }
    Ok(item)
}

/// Decodes the first item of `input`, returning it with the number of bytes
/// it occupied. Anything after that is left for the caller.
pub fn decode_prefix(input: &[u8]) -> Result<(Item, usize), CodecError> {
    decode_at(input, 0)
}

struct Header {
    is_list: bool,
    /// Bytes taken by the prefix itself.
    offset: usize,
    /// Payload length.
    len: usize,
}

fn decode_at(input: &[u8], depth: usize) -> Result<(Item, usize), CodecError> {
    let header = parse_header(input)?;
    let end = header
        .offset
        .checked_add(header.len)
        .ok_or(CodecError::LengthOverflow {
            width: std::mem::size_of::<usize>(),
        })?;
    if end > input.len() {
        return Err(CodecError::Truncated {
            needed: end,
            available: input.len(),
        });
    }
    let payload = &input[header.offset..end];

    if !header.is_list {
        return Ok((Item::Bytes(payload.to_vec()), end));
    }

    if depth >= MAX_RLP_DEPTH {
        return Err(CodecError::TooDeep { max: MAX_RLP_DEPTH });
    }

    let mut items = Vec::new();
    let mut rest = payload;
    while !rest.is_empty() {
        let (item, used) = decode_at(rest, depth + 1)?;
        items.push(item);
        rest = &rest[used..];
    }
    Ok((Item::List(items), end))
}

fn parse_header(input: &[u8]) -> Result<Header, CodecError> {
    let first = *input.first().ok_or(CodecError::Empty)?;
    let header = match first {
        0x00..=0x7f => Header {
            is_list: false,
            offset: 0,
            len: 1,
        },
        0x80..=0xb7 => {
            let len = (first - STRING_OFFSET) as usize;
            if len == 1 {
                if let Some(&byte) = input.get(1) {
                    if byte < STRING_OFFSET {
                        return Err(CodecError::NonCanonicalSingleByte { byte });
                    }
                }
            }
            Header {
                is_list: false,
                offset: 1,
                len,
            }
        }
        0xb8..=0xbf => {
            let width = (first - STRING_OFFSET) as usize - RLP_SHORT_LIMIT;
            Header {
                is_list: false,
                offset: 1 + width,
                len: read_long_length(&input[1..], width)?,
            }
        }
        0xc0..=0xf7 => Header {
            is_list: true,
            offset: 1,
            len: (first - LIST_OFFSET) as usize,
        },
        0xf8..=0xff => {
            let width = (first - LIST_OFFSET) as usize - RLP_SHORT_LIMIT;
            Header {
                is_list: true,
                offset: 1 + width,
                len: read_long_length(&input[1..], width)?,
            }
        }
    };
    Ok(header)
}

fn read_long_length(input: &[u8], width: usize) -> Result<usize, CodecError> {
    if input.len() < width {
        return Err(CodecError::Truncated {
            needed: width + 1,
            available: input.len() + 1,
        });
    }
    let bytes = &input[..width];
    if bytes[0] == 0 {
        return Err(CodecError::LeadingZeroLength);
    }
    if width > std::mem::size_of::<usize>() {
        return Err(CodecError::LengthOverflow { width });
    }
    let len = bytes
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);
    if len <= RLP_SHORT_LIMIT {
        return Err(CodecError::NonCanonicalLength { len });
    }
    Ok(len)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn s(data: &[u8]) -> Item {
        Item::bytes(data)
    }

    #[test]
    fn encodes_short_string() {
        assert_eq!(encode(&s(b"dog")), vec![0x83, b'd', b'o', b'g']);
    }

    #[test]
    fn encodes_list_of_strings() {
        let item = Item::list(vec![s(b"cat"), s(b"dog")]);
        assert_eq!(
            encode(&item),
            vec![0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g']
        );
    }

    #[test]
    fn encodes_empty_values() {
        assert_eq!(encode(&s(b"")), vec![0x80]);
        assert_eq!(encode(&Item::list(vec![])), vec![0xc0]);
    }

    #[test]
    fn single_low_byte_encodes_itself() {
        assert_eq!(encode(&s(&[0x00])), vec![0x00]);
        assert_eq!(encode(&s(&[0x0f])), vec![0x0f]);
        assert_eq!(encode(&s(&[0x7f])), vec![0x7f]);
        assert_eq!(encode(&s(&[0x80])), vec![0x81, 0x80]);
    }

    #[test]
    fn encodes_integer_bytes() {
        // 1024 = 0x0400
        assert_eq!(encode(&s(&[0x04, 0x00])), vec![0x82, 0x04, 0x00]);
    }

    #[test]
    fn long_string_uses_length_of_length() {
        let text = b"Lorem ipsum dolor sit amet, consectetur adipisicing elit";
        assert_eq!(text.len(), 56);
        let encoded = encode(&s(text));
        assert_eq!(&encoded[..2], &[0xb8, 0x38]);
        assert_eq!(&encoded[2..], text);
        assert_eq!(decode(&encoded).unwrap(), s(text));
    }

    #[test]
    fn fifty_five_bytes_stays_short() {
        let data = vec![0xaa; 55];
        let encoded = encode(&s(&data));
        assert_eq!(encoded[0], 0xb7);
        assert_eq!(encoded.len(), 56);
    }

    #[test]
    fn long_list_header() {
        let items: Vec<Item> = (0..20).map(|_| s(b"abc")).collect();
        let encoded = encode(&Item::list(items.clone()));
        // 20 * 4 = 80 payload bytes
        assert_eq!(&encoded[..2], &[0xf8, 80]);
        assert_eq!(decode(&encoded).unwrap(), Item::list(items));
    }

    #[test]
    fn nested_lists() {
        // [ [], [[]], [ [], [[]] ] ]
        let item = Item::list(vec![
            Item::list(vec![]),
            Item::list(vec![Item::list(vec![])]),
            Item::list(vec![
                Item::list(vec![]),
                Item::list(vec![Item::list(vec![])]),
            ]),
        ]);
        let expected = vec![0xc7, 0xc0, 0xc1, 0xc0, 0xc3, 0xc0, 0xc1, 0xc0];
        assert_eq!(encode(&item), expected);
        assert_eq!(decode(&expected).unwrap(), item);
    }

    #[test]
    fn byte_list_matches_item_encoding() {
        let fields: Vec<Vec<u8>> = vec![vec![], vec![0x01], vec![0x80, 0x81], vec![7; 60]];
        let item = Item::list(fields.iter().cloned().map(Item::Bytes).collect());
        assert_eq!(encode_byte_list(&fields), encode(&item));
        assert_eq!(encoded_len(&item), encode(&item).len());
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(decode(&[]), Err(CodecError::Empty));
    }

    #[test]
    fn rejects_truncated_string() {
        assert!(matches!(
            decode(&[0x83, b'd', b'o']),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn rejects_truncated_length_prefix() {
        assert!(matches!(
            decode(&[0xb9, 0x01]),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn rejects_list_item_overrunning_payload() {
        // list claims 2 payload bytes but its string claims 3
        assert!(matches!(
            decode(&[0xc2, 0x83, b'a', b'b', b'c']),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn rejects_trailing_bytes() {
        assert_eq!(
            decode(&[0x83, b'd', b'o', b'g', 0x00]),
            Err(CodecError::TrailingBytes { count: 1 })
        );
    }

    #[test]
    fn rejects_wrapped_single_byte() {
        assert_eq!(
            decode(&[0x81, 0x05]),
            Err(CodecError::NonCanonicalSingleByte { byte: 0x05 })
        );
    }

    #[test]
    fn rejects_long_form_for_short_length() {
        let mut input = vec![0xb8, 0x05];
        input.extend_from_slice(b"hello");
        assert_eq!(
            decode(&input),
            Err(CodecError::NonCanonicalLength { len: 5 })
        );
    }

    #[test]
    fn rejects_leading_zero_in_length() {
        let mut input = vec![0xb9, 0x00, 0x40];
        input.extend(vec![0u8; 64]);
        assert_eq!(decode(&input), Err(CodecError::LeadingZeroLength));
    }

    #[test]
    fn rejects_excessive_nesting() {
        let mut item = Item::list(vec![]);
        for _ in 0..=MAX_RLP_DEPTH {
            item = Item::list(vec![item]);
        }
        let encoded = encode(&item);
        assert_eq!(
            decode(&encoded),
            Err(CodecError::TooDeep { max: MAX_RLP_DEPTH })
        );
    }

    #[test]
    fn decode_prefix_reports_consumed_bytes() {
        let mut input = encode(&s(b"dog"));
        input.extend(encode(&s(b"cat")));
        let (first, used) = decode_prefix(&input).unwrap();
        assert_eq!(first, s(b"dog"));
        assert_eq!(used, 4);
        assert_eq!(decode(&input[used..]).unwrap(), s(b"cat"));
    }

    #[test]
    fn item_accessors() {
        let list = Item::list(vec![s(b"a")]);
        assert!(list.is_list());
        assert_eq!(list.as_list().map(|l| l.len()), Some(1));
        assert!(list.as_bytes().is_none());
        assert_eq!(s(b"a").as_bytes(), Some(&b"a"[..]));
        assert_eq!(list.into_list(), Some(vec![s(b"a")]));
    }
}
