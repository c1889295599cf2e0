//! The transaction record.
//!
//! A [`Transaction`] owns nine canonical fields and nothing else that travels
//! on the wire:
//!
//! ```text
//! [nonce, gasPrice, gasLimit, to, value, data, v, r, s]
//!  \_______________ signing payload ______________/
//! ```
//!
//! Numeric fields are held as `BigUint` and re-encoded minimally, so two
//! inputs that differ only in zero padding produce the same bytes and the
//! same hashes. `to` and `r`/`s` are length-checked on the way in. Mutation
//! goes through setters that re-validate; the derived [`TransactionType`] is
//! computed from `to` on every call.
//!
//! The hash and signature engine are type parameters. The defaults
//! (Keccak-256, secp256k1) are what every other node on the network uses;
//! substitutes exist for tests and private deployments.

use std::fmt;
use std::marker::PhantomData;

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use super::types::{Field, TransactionError, TransactionType};
use crate::address::{Address, IntoAddress};
use crate::codec::{
    self, decode_uint, encode_byte_list, left_pad, strip_leading_zeros, uint_bytes, Item,
};
use crate::config::{HASH_OUTPUT_LENGTH, SCALAR_LENGTH, SIGNED_FIELD_COUNT, UNSIGNED_FIELD_COUNT};
use crate::crypto::hash::{HashFunction, Keccak256};
use crate::crypto::signatures::{RecoverableSignature, Secp256k1, SignatureEngine};

/// A signed (or not yet signed) monetary transaction.
///
/// # Examples
///
/// ```
/// use tessera_protocol::transaction::Transaction;
///
/// let mut tx: Transaction = Transaction::new();
/// tx.set_to("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap();
/// tx.set_gas_limit(500u32);
///
/// let decoded: Transaction = Transaction::decode(&tx.serialize()).unwrap();
/// assert_eq!(decoded, tx);
/// ```
pub struct Transaction<H: HashFunction = Keccak256, E: SignatureEngine = Secp256k1> {
    pub(crate) nonce: BigUint,
    pub(crate) gas_price: BigUint,
    pub(crate) gas_limit: BigUint,
    pub(crate) to: Option<Address>,
    pub(crate) value: BigUint,
    pub(crate) data: Vec<u8>,
    pub(crate) signature: Option<RecoverableSignature>,
    /// Signing hash the current signature was attached to.
    pub(crate) sealed_hash: Option<[u8; HASH_OUTPUT_LENGTH]>,
    _engines: PhantomData<fn() -> (H, E)>,
}

impl<H: HashFunction, E: SignatureEngine> Transaction<H, E> {
    /// An unsigned contract-creation draft with every numeric field zero.
    pub fn new() -> Self {
        Self {
            nonce: BigUint::zero(),
            gas_price: BigUint::zero(),
            gas_limit: BigUint::zero(),
            to: None,
            value: BigUint::zero(),
            data: Vec::new(),
            signature: None,
            sealed_hash: None,
            _engines: PhantomData,
        }
    }

    /// Builds a record from a 9-field list, or a 6-field unsigned draft.
    ///
    /// Every field is checked: `to` must be empty or 20 bytes, `v` must fit
    /// in one byte and `r`/`s` in 32. Numeric fields may carry leading zeros.
    pub fn from_fields(fields: Vec<Vec<u8>>) -> Result<Self, TransactionError> {
        let count = fields.len();
        if count != SIGNED_FIELD_COUNT && count != UNSIGNED_FIELD_COUNT {
            return Err(TransactionError::InvalidFieldCount { count });
        }

        let mut slots = fields.into_iter();
        let mut next = || slots.next().unwrap_or_default();

        let nonce = decode_uint(&next());
        let gas_price = decode_uint(&next());
        let gas_limit = decode_uint(&next());
        let to = parse_to(&next())?;
        let value = decode_uint(&next());
        let data = next();
        let v = parse_v(&next())?;
        let r = parse_scalar(Field::R, &next())?;
        let s = parse_scalar(Field::S, &next())?;

        let signature = if v == 0 && r == [0u8; SCALAR_LENGTH] && s == [0u8; SCALAR_LENGTH] {
            None
        } else {
            Some(RecoverableSignature { v, r, s })
        };

        let mut tx = Self {
            nonce,
            gas_price,
            gas_limit,
            to,
            value,
            data,
            signature,
            sealed_hash: None,
            _engines: PhantomData,
        };
        if tx.signature.is_some() {
            tx.sealed_hash = Some(tx.signing_hash());
        }
        Ok(tx)
    }

    /// Decodes a record from its wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        let item = codec::decode(bytes)?;
        let tx = Self::try_from(item)?;
        debug!(
            len = bytes.len(),
            signed = tx.is_signed(),
            tx_type = %tx.tx_type(),
            "decoded transaction"
        );
        Ok(tx)
    }

    // -- accessors ----------------------------------------------------------

    pub fn nonce(&self) -> &BigUint {
        &self.nonce
    }

    pub fn gas_price(&self) -> &BigUint {
        &self.gas_price
    }

    pub fn gas_limit(&self) -> &BigUint {
        &self.gas_limit
    }

    /// Recipient, or `None` for a contract creation.
    pub fn to(&self) -> Option<&Address> {
        self.to.as_ref()
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn signature(&self) -> Option<&RecoverableSignature> {
        self.signature.as_ref()
    }

    /// `ContractCreation` when `to` is empty, `Message` otherwise.
    pub fn tx_type(&self) -> TransactionType {
        match self.to {
            None => TransactionType::ContractCreation,
            Some(_) => TransactionType::Message,
        }
    }

    // -- setters ------------------------------------------------------------

    /// Sets the recipient. Accepts anything that normalizes to 20 bytes.
    ///
    /// On error the record is left unchanged.
    pub fn set_to(&mut self, to: impl IntoAddress) -> Result<(), TransactionError> {
        self.to = Some(to.into_address()?);
        Ok(())
    }

    /// Turns the record into a contract creation.
    pub fn clear_to(&mut self) {
        self.to = None;
    }

    pub fn set_nonce(&mut self, nonce: impl Into<BigUint>) {
        self.nonce = nonce.into();
    }

    pub fn set_gas_price(&mut self, gas_price: impl Into<BigUint>) {
        self.gas_price = gas_price.into();
    }

    pub fn set_gas_limit(&mut self, gas_limit: impl Into<BigUint>) {
        self.gas_limit = gas_limit.into();
    }

    pub fn set_value(&mut self, value: impl Into<BigUint>) {
        self.value = value.into();
    }

    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) {
        self.data = data.into();
    }

    // -- encoding -----------------------------------------------------------

    /// The nine canonical wire fields.
    pub fn to_fields(&self) -> Vec<Vec<u8>> {
        let (v, r, s) = match &self.signature {
            Some(sig) => (
                strip_leading_zeros(&[sig.v]).to_vec(),
                strip_leading_zeros(&sig.r).to_vec(),
                strip_leading_zeros(&sig.s).to_vec(),
            ),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };
        vec![
            uint_bytes(&self.nonce),
            uint_bytes(&self.gas_price),
            uint_bytes(&self.gas_limit),
            self.to.map(|a| a.as_bytes().to_vec()).unwrap_or_default(),
            uint_bytes(&self.value),
            self.data.clone(),
            v,
            r,
            s,
        ]
    }

    /// The record as a codec item (a list of nine byte strings).
    pub fn to_item(&self) -> Item {
        Item::List(self.to_fields().into_iter().map(Item::Bytes).collect())
    }

    /// Canonical wire bytes.
    pub fn serialize(&self) -> Vec<u8> {
        encode_byte_list(&self.to_fields())
    }

    /// Digest of the encoded record; of the first six fields only when
    /// `include_signature` is false.
    pub fn hash(&self, include_signature: bool) -> [u8; HASH_OUTPUT_LENGTH] {
        let mut fields = self.to_fields();
        if !include_signature {
            fields.truncate(UNSIGNED_FIELD_COUNT);
        }
        H::digest(&encode_byte_list(&fields))
    }

    /// The message that gets signed: `hash(false)`.
    pub fn signing_hash(&self) -> [u8; HASH_OUTPUT_LENGTH] {
        self.hash(false)
    }
}

fn parse_to(bytes: &[u8]) -> Result<Option<Address>, TransactionError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(Address::from_slice(bytes)?))
}

fn parse_v(bytes: &[u8]) -> Result<u8, TransactionError> {
    match strip_leading_zeros(bytes) {
        [] => Ok(0),
        [v] => Ok(*v),
        wide => Err(TransactionError::InvalidField {
            field: Field::V,
            reason: format!("{} significant bytes, expected at most 1", wide.len()),
        }),
    }
}

fn parse_scalar(field: Field, bytes: &[u8]) -> Result<[u8; SCALAR_LENGTH], TransactionError> {
    left_pad::<SCALAR_LENGTH>(bytes).ok_or_else(|| TransactionError::InvalidField {
        field,
        reason: format!(
            "{} significant bytes, expected at most {SCALAR_LENGTH}",
            strip_leading_zeros(bytes).len()
        ),
    })
}

impl<H: HashFunction, E: SignatureEngine> TryFrom<Item> for Transaction<H, E> {
    type Error = TransactionError;

    fn try_from(item: Item) -> Result<Self, Self::Error> {
        let items = match item {
            Item::List(items) => items,
            Item::Bytes(_) => {
                return Err(TransactionError::InvalidField {
                    field: Field::Nonce,
                    reason: "expected a list of fields, found a byte string".to_string(),
                })
            }
        };
        let count = items.len();
        if count != SIGNED_FIELD_COUNT && count != UNSIGNED_FIELD_COUNT {
            return Err(TransactionError::InvalidFieldCount { count });
        }

        let fields = items
            .into_iter()
            .zip(Field::ALL)
            .map(|(item, field)| match item {
                Item::Bytes(bytes) => Ok(bytes),
                Item::List(_) => Err(TransactionError::InvalidField {
                    field,
                    reason: "nested list where a byte string was expected".to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_fields(fields)
    }
}

impl<H: HashFunction, E: SignatureEngine> Default for Transaction<H, E> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impls keep `H` and `E` free of derive bounds.

impl<H: HashFunction, E: SignatureEngine> Clone for Transaction<H, E> {
    fn clone(&self) -> Self {
        Self {
            nonce: self.nonce.clone(),
            gas_price: self.gas_price.clone(),
            gas_limit: self.gas_limit.clone(),
            to: self.to,
            value: self.value.clone(),
            data: self.data.clone(),
            signature: self.signature,
            sealed_hash: self.sealed_hash,
            _engines: PhantomData,
        }
    }
}

impl<H: HashFunction, E: SignatureEngine> PartialEq for Transaction<H, E> {
    /// Equal when the wire fields are equal.
    fn eq(&self, other: &Self) -> bool {
        self.nonce == other.nonce
            && self.gas_price == other.gas_price
            && self.gas_limit == other.gas_limit
            && self.to == other.to
            && self.value == other.value
            && self.data == other.data
            && self.signature == other.signature
    }
}

impl<H: HashFunction, E: SignatureEngine> Eq for Transaction<H, E> {}

impl<H: HashFunction, E: SignatureEngine> fmt::Debug for Transaction<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("nonce", &self.nonce)
            .field("gas_price", &self.gas_price)
            .field("gas_limit", &self.gas_limit)
            .field("to", &self.to)
            .field("value", &self.value)
            .field("data", &hex::encode(&self.data))
            .field("signature", &self.signature)
            .field("hash", &H::NAME)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::crypto::hash::{keccak256, Sha256};

    type Tx = Transaction;

    const TO: &str = "7e5f4552091a69125d5dfcb7b8c2659029395bdf";

    fn draft_fields() -> Vec<Vec<u8>> {
        vec![
            vec![0x01],
            vec![0x0a],
            vec![0x01, 0xf4],
            hex::decode(TO).unwrap(),
            vec![0x03, 0xe8],
            b"hello".to_vec(),
        ]
    }

    #[test]
    fn test_six_fields_are_padded() {
        let tx = Tx::from_fields(draft_fields()).unwrap();
        let fields = tx.to_fields();
        assert_eq!(fields.len(), 9);
        assert!(fields[6..].iter().all(|f| f.is_empty()));
        assert!(tx.signature().is_none());
        assert_eq!(tx.tx_type(), TransactionType::Message);
        assert_eq!(tx.gas_limit(), &BigUint::from(500u32));
    }

    #[test]
    fn test_wrong_field_counts_rejected() {
        for count in [0usize, 5, 7, 8, 10] {
            let fields = vec![Vec::new(); count];
            assert_eq!(
                Tx::from_fields(fields).unwrap_err(),
                TransactionError::InvalidFieldCount { count }
            );
        }
    }

    #[test]
    fn test_to_length_checked() {
        let mut fields = draft_fields();
        fields[3] = vec![0xaa; 19];
        assert_eq!(
            Tx::from_fields(fields).unwrap_err(),
            TransactionError::InvalidAddressLength { len: 19 }
        );
    }

    #[test]
    fn empty_to_is_contract_creation() {
        let mut fields = draft_fields();
        fields[3] = Vec::new();
        let tx = Tx::from_fields(fields).unwrap();
        assert_eq!(tx.tx_type(), TransactionType::ContractCreation);
        assert!(tx.to().is_none());
    }

    #[test]
    fn padded_numerics_encode_canonically() {
        let mut padded = draft_fields();
        padded[0] = vec![0x00, 0x00, 0x01];
        padded[1] = vec![0x00, 0x0a];
        padded[4] = vec![0x00];
        let mut plain = draft_fields();
        plain[4] = Vec::new();

        let a = Tx::from_fields(padded).unwrap();
        let b = Tx::from_fields(plain).unwrap();
        assert_eq!(a.serialize(), b.serialize());
        assert_eq!(a.hash(true), b.hash(true));
        assert_eq!(a.to_fields()[4], Vec::<u8>::new());
    }

    #[test]
    fn wide_signature_components_rejected() {
        let mut fields = draft_fields();
        fields.extend([vec![27], vec![0x01; 33], vec![0x01]]);
        assert!(matches!(
            Tx::from_fields(fields).unwrap_err(),
            TransactionError::InvalidField { field: Field::R, .. }
        ));

        let mut fields = draft_fields();
        fields.extend([vec![0x01, 0x1b], vec![0x01], vec![0x01]]);
        assert!(matches!(
            Tx::from_fields(fields).unwrap_err(),
            TransactionError::InvalidField { field: Field::V, .. }
        ));
    }

    #[test]
    fn zero_signature_slots_mean_unsigned() {
        let mut fields = draft_fields();
        fields.extend([vec![0x00], vec![0x00; 32], Vec::new()]);
        let tx = Tx::from_fields(fields).unwrap();
        assert!(tx.signature().is_none());
        assert_eq!(tx, Tx::from_fields(draft_fields()).unwrap());
    }

    #[test]
    fn short_signature_scalars_are_left_padded() {
        let mut fields = draft_fields();
        fields.extend([vec![28], vec![0x01, 0x02], vec![0x00, 0x03]]);
        let tx = Tx::from_fields(fields).unwrap();
        let sig = tx.signature().unwrap();
        assert_eq!(sig.v, 28);
        assert_eq!(sig.r[30..], [0x01, 0x02]);
        assert_eq!(sig.s[31], 0x03);
        // Re-encoded minimally.
        assert_eq!(tx.to_fields()[7], vec![0x01, 0x02]);
        assert_eq!(tx.to_fields()[8], vec![0x03]);
    }

    #[test]
    fn test_decode_roundtrip() {
        let mut fields = draft_fields();
        fields.extend([vec![27], vec![0x11; 32], vec![0x22; 32]]);
        let tx = Tx::from_fields(fields.clone()).unwrap();
        let bytes = tx.serialize();
        assert_eq!(bytes, codec::encode_byte_list(&fields));
        assert_eq!(Tx::decode(&bytes).unwrap(), tx);
        assert_eq!(Tx::try_from(tx.to_item()).unwrap(), tx);
    }

    #[test]
    fn truncated_bytes_are_malformed() {
        let bytes = Tx::from_fields(draft_fields()).unwrap().serialize();
        let err = Tx::decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(
            err,
            TransactionError::MalformedEncoding(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn non_list_and_nested_items_rejected() {
        let err = Tx::try_from(Item::Bytes(vec![1, 2, 3])).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidField { .. }));

        let mut items: Vec<Item> = draft_fields().into_iter().map(Item::Bytes).collect();
        items[5] = Item::List(vec![]);
        assert!(matches!(
            Tx::try_from(Item::List(items)).unwrap_err(),
            TransactionError::InvalidField { field: Field::Data, .. }
        ));
    }

    #[test]
    fn test_set_to_variants() {
        let mut tx = Tx::new();
        assert_eq!(tx.tx_type(), TransactionType::ContractCreation);

        tx.set_to(format!("0x{TO}")).unwrap();
        assert_eq!(tx.tx_type(), TransactionType::Message);
        let expected = *tx.to().unwrap();

        tx.set_to(hex::decode(TO).unwrap()).unwrap();
        assert_eq!(tx.to(), Some(&expected));

        tx.set_to(&BigUint::from_bytes_be(&hex::decode(TO).unwrap()))
            .unwrap();
        assert_eq!(tx.to(), Some(&expected));

        tx.clear_to();
        assert_eq!(tx.tx_type(), TransactionType::ContractCreation);
    }

    #[test]
    fn failed_set_to_leaves_record_unchanged() {
        let mut tx = Tx::from_fields(draft_fields()).unwrap();
        let before = tx.clone();
        assert_eq!(
            tx.set_to(vec![0u8; 21]).unwrap_err(),
            TransactionError::InvalidAddressLength { len: 21 }
        );
        assert!(matches!(
            tx.set_to("0xnothex").unwrap_err(),
            TransactionError::InvalidHex(_)
        ));
        assert_eq!(tx, before);
    }

    #[test]
    fn integer_recipient_is_left_padded() {
        let mut tx = Tx::new();
        tx.set_to(0xbeefu64).unwrap();
        let to = tx.to().unwrap().as_bytes();
        assert_eq!(&to[18..], &[0xbe, 0xef]);
        assert!(to[..18].iter().all(|b| *b == 0));
    }

    #[test]
    fn signing_hash_covers_first_six_fields() {
        let tx = Tx::from_fields(draft_fields()).unwrap();
        let expected = keccak256(&codec::encode_byte_list(&tx.to_fields()[..6]));
        assert_eq!(tx.signing_hash(), expected);
        assert_ne!(tx.hash(true), tx.hash(false));
    }

    #[test]
    fn hash_function_is_substitutable() {
        let keccak = Tx::from_fields(draft_fields()).unwrap();
        let sha: Transaction<Sha256> = Transaction::from_fields(draft_fields()).unwrap();
        assert_eq!(keccak.serialize(), sha.serialize());
        assert_ne!(keccak.signing_hash(), sha.signing_hash());
    }

    #[test]
    fn setters_change_the_hash() {
        let mut tx = Tx::from_fields(draft_fields()).unwrap();
        let before = tx.signing_hash();
        tx.set_value(1001u32);
        assert_ne!(tx.signing_hash(), before);
        tx.set_value(1000u32);
        assert_eq!(tx.signing_hash(), before);
    }

    #[test]
    fn debug_shows_fields() {
        let tx = Tx::from_fields(draft_fields()).unwrap();
        let debug = format!("{:?}", tx);
        assert!(debug.contains("68656c6c6f"));
        assert!(debug.contains("Keccak-256"));
    }
}
