//! The binary encoding of ABI values.
//!
//! All integers are big-endian.  Scalars are written at their static size,
//! `bool`s as `0x80` or `0x00`.  Arrays, strings and addresses are written as
//! tuples of their items (see [`AbiType::as_tuple_of`]), with dynamic arrays
//! and strings prefixed by a 2-byte item count.  Tuples use the head/tail
//! layout described in [`tuple`].
use crate::{
  types::{Repr, TypeKind},
  util::{checked_u16, debug::HexDump, read_u16_be},
  AbiErr, AbiType, AbiValue, ADDRESS_LEN, LENGTH_PREFIX_LEN,
};
use alloc::{string::String, vec, vec::Vec};
use num_bigint::BigUint;

pub mod tuple;

use self::tuple::{decode_tuple, encode_tuple};

/// `bool` true.
pub const BOOL_TRUE: u8 = 0x80;
/// `bool` false.
pub const BOOL_FALSE: u8 = 0x00;

impl AbiType {
  /// Encodes a value of this type.
  ///
  /// ```
  /// use avm_abi::{AbiType, AbiValue};
  ///
  /// let t = AbiType::parse("(bool,uint16,bool)").unwrap();
  /// let v = AbiValue::from(vec![true.into(), 258u64.into(), true.into()]);
  /// assert_eq!(t.encode(&v).unwrap(), [0x80, 0x01, 0x02, 0x80]);
  /// ```
  pub fn encode(&self, value: &AbiValue) -> Result<Vec<u8>, AbiErr> {
    let encoded = self.encode_value(value)?;
    log::trace!("Encoded {}: {:?}", self, HexDump(&encoded));
    Ok(encoded)
  }

  /// Decodes a value of this type, which must span all of `encoded`.
  pub fn decode(&self, encoded: &[u8]) -> Result<AbiValue, AbiErr> {
    log::trace!("Decoding {}: {:?}", self, HexDump(encoded));
    self.decode_value(encoded)
  }

  pub(crate) fn encode_value(&self, value: &AbiValue) -> Result<Vec<u8>, AbiErr> {
    match &self.0 {
      Repr::Uint { bit_size } | Repr::Ufixed { bit_size, .. } => {
        let n = value.as_uint().ok_or_else(|| self.kind_mismatch())?;
        encode_uint(n, *bit_size)
      },
      Repr::Bool => match value {
        AbiValue::Bool(true) => Ok(vec![BOOL_TRUE]),
        AbiValue::Bool(false) => Ok(vec![BOOL_FALSE]),
        _ => Err(self.kind_mismatch()),
      },
      Repr::Byte => match value {
        AbiValue::Byte(b) => Ok(vec![*b]),
        _ => Err(self.kind_mismatch()),
      },
      Repr::Address => match value {
        AbiValue::Address(bytes) => Ok(bytes.to_vec()),
        AbiValue::Sequence(items) => {
          self.as_tuple_of(items.len())?.encode_value(value)
        },
        _ => Err(self.kind_mismatch()),
      },
      Repr::StaticArray { .. } => {
        let items = value.items(TypeKind::StaticArray)?;
        self.as_tuple_of(items.len())?.encode_value(value)
      },
      Repr::DynamicArray { .. } => {
        let items = value.items(TypeKind::DynamicArray)?;
        let len = checked_u16(items.len())?;
        let tuple = self.as_tuple_of(items.len())?;
        Ok(with_length_prefix(len, tuple.encode_value(value)?))
      },
      Repr::String => {
        let text = value.as_str().ok_or_else(|| self.kind_mismatch())?;
        let len = checked_u16(text.len())?;
        let bytes = AbiValue::bytes(text.as_bytes());
        let tuple = self.as_tuple_of(text.len())?;
        Ok(with_length_prefix(len, tuple.encode_value(&bytes)?))
      },
      Repr::Tuple { children } => {
        encode_tuple(children, value.items(TypeKind::Tuple)?)
      },
    }
  }

  pub(crate) fn decode_value(&self, encoded: &[u8]) -> Result<AbiValue, AbiErr> {
    match &self.0 {
      Repr::Uint { bit_size } | Repr::Ufixed { bit_size, .. } => {
        check_len(encoded, *bit_size as usize / 8)?;
        Ok(AbiValue::Uint(BigUint::from_bytes_be(encoded)))
      },
      Repr::Bool => {
        check_len(encoded, 1)?;
        match encoded[0] {
          BOOL_TRUE => Ok(AbiValue::Bool(true)),
          BOOL_FALSE => Ok(AbiValue::Bool(false)),
          other => Err(err!(debug, AbiErr::InvalidBool(other))),
        }
      },
      Repr::Byte => {
        check_len(encoded, 1)?;
        Ok(AbiValue::Byte(encoded[0]))
      },
      Repr::Address => {
        let bytes = self.as_tuple_of(ADDRESS_LEN)?.decode_bytes(encoded)?;
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&bytes);
        Ok(AbiValue::Address(address))
      },
      Repr::StaticArray { len, .. } => {
        self.as_tuple_of(*len as usize)?.decode_value(encoded)
      },
      Repr::DynamicArray { .. } => {
        let cursor = &mut 0;
        let len = read_u16_be(encoded, cursor)? as usize;
        self.as_tuple_of(len)?.decode_value(&encoded[*cursor..])
      },
      Repr::String => {
        let cursor = &mut 0;
        let len = read_u16_be(encoded, cursor)? as usize;
        let bytes = self.as_tuple_of(len)?.decode_bytes(&encoded[*cursor..])?;
        Ok(AbiValue::Text(String::from_utf8(bytes)?))
      },
      Repr::Tuple { children } => {
        Ok(AbiValue::Sequence(decode_tuple(children, encoded)?))
      },
    }
  }

  /// Decodes a tuple of `byte`s into a vector.
  fn decode_bytes(&self, encoded: &[u8]) -> Result<Vec<u8>, AbiErr> {
    let decoded = self.decode_value(encoded)?;
    decoded.to_bytes().ok_or_else(|| self.kind_mismatch())
  }

  fn kind_mismatch(&self) -> AbiErr {
    err!(debug, AbiErr::ValueKindMismatch {
      expected: self.kind(),
    })
  }
}

/// Writes `n` as exactly `bit_size / 8` big-endian bytes.
fn encode_uint(n: &BigUint, bit_size: u16) -> Result<Vec<u8>, AbiErr> {
  ensure!(
    n.bits() <= bit_size as u64,
    debug,
    AbiErr::UintOverflow { bit_size }
  );
  let width = bit_size as usize / 8;
  let digits = n.to_bytes_be();
  let mut encoded = vec![0u8; width];
  encoded[width - digits.len()..].copy_from_slice(&digits);
  Ok(encoded)
}

fn with_length_prefix(len: u16, body: Vec<u8>) -> Vec<u8> {
  let mut encoded = Vec::with_capacity(LENGTH_PREFIX_LEN + body.len());
  encoded.extend_from_slice(&len.to_be_bytes());
  encoded.extend(body);
  encoded
}

fn check_len(encoded: &[u8], expected: usize) -> Result<(), AbiErr> {
  ensure!(
    encoded.len() == expected,
    debug,
    AbiErr::ByteLenMismatch {
      expected,
      observed: encoded.len(),
    }
  );
  Ok(())
}
