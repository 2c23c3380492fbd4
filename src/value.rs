//! Native values exchanged through the ABI codecs.
//!
//! An [`AbiValue`] is only meaningful relative to an [`AbiType`]; the codecs
//! decide which variants each kind accepts:
//!
//! | Kind                      | Encodes from                      | Decodes to        |
//! |---------------------------|-----------------------------------|-------------------|
//! | `uint<N>`, `ufixed<N>x<M>`| `Uint`                            | `Uint`            |
//! | `byte`                    | `Byte`                            | `Byte`            |
//! | `bool`                    | `Bool`                            | `Bool`            |
//! | `address`                 | `Address`, 32 `Byte`s in a `Sequence` | `Address`     |
//! | `string`                  | `Text`                            | `Text`            |
//! | arrays and tuples         | `Sequence`                        | `Sequence`        |
//!
//! `ufixed<N>x<M>` values hold the raw magnitude, i.e., the decimal value
//! multiplied by `10^M`.
use crate::{types::TypeKind, AbiErr, AbiType, ADDRESS_LEN};
use alloc::{string::String, vec::Vec};
use core::fmt::{Debug, Display, Formatter};
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// A value to be encoded, or one that was decoded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AbiValue {
  Bool(bool),
  Byte(u8),
  /// Both unsigned integers and the scaled magnitude of decimals.
  Uint(BigUint),
  Text(String),
  Address([u8; ADDRESS_LEN]),
  /// Items of arrays and tuples.
  Sequence(Vec<AbiValue>),
}

impl AbiValue {
  /// A sequence of `Byte`s, e.g. for `byte[]` or `byte[N]`.
  pub fn bytes(bytes: &[u8]) -> AbiValue {
    AbiValue::Sequence(bytes.iter().copied().map(AbiValue::Byte).collect())
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      AbiValue::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_byte(&self) -> Option<u8> {
    match self {
      AbiValue::Byte(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_uint(&self) -> Option<&BigUint> {
    match self {
      AbiValue::Uint(n) => Some(n),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      AbiValue::Text(s) => Some(s.as_str()),
      _ => None,
    }
  }

  pub fn as_address(&self) -> Option<&[u8; ADDRESS_LEN]> {
    match self {
      AbiValue::Address(bytes) => Some(bytes),
      _ => None,
    }
  }

  pub fn as_sequence(&self) -> Option<&[AbiValue]> {
    match self {
      AbiValue::Sequence(items) => Some(items.as_slice()),
      _ => None,
    }
  }

  /// Collects a sequence of `Byte`s into a vector.
  ///
  /// Returns `None` if this is not a sequence, or any item is not a `Byte`.
  pub fn to_bytes(&self) -> Option<Vec<u8>> {
    self.as_sequence()?.iter().map(AbiValue::as_byte).collect()
  }

  /// Converts a decoded integer into the narrowest native integer that holds
  /// any value of `abi_type` (a `uint<N>` or `ufixed<N>x<M>`).
  ///
  /// ```
  /// use avm_abi::{AbiType, AbiValue, NarrowUint};
  ///
  /// let uint24 = AbiType::uint(24).unwrap();
  /// let value = uint24.decode(&[0x01, 0x00, 0x00]).unwrap();
  /// assert_eq!(value.narrow(&uint24), Ok(NarrowUint::U32(0x10000)));
  /// ```
  pub fn narrow(&self, abi_type: &AbiType) -> Result<NarrowUint, AbiErr> {
    let expected = abi_type.kind();
    let bit_size = abi_type
      .bit_size()
      .ok_or_else(|| err!(debug, AbiErr::ValueKindMismatch { expected }))?;
    match self {
      AbiValue::Uint(n) => NarrowUint::from_biguint(n, bit_size),
      _ => Err(err!(debug, AbiErr::ValueKindMismatch { expected })),
    }
  }

  /// The sequence items of a value that should be an array or tuple of kind
  /// `expected`.
  pub(crate) fn items(&self, expected: TypeKind) -> Result<&[AbiValue], AbiErr> {
    self
      .as_sequence()
      .ok_or_else(|| err!(debug, AbiErr::ValueKindMismatch { expected }))
  }
}

impl Display for AbiValue {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    match self {
      AbiValue::Bool(b) => Display::fmt(b, f),
      AbiValue::Byte(b) => Display::fmt(b, f),
      AbiValue::Uint(n) => Display::fmt(n, f),
      AbiValue::Text(s) => Debug::fmt(s, f),
      AbiValue::Address(bytes) => Display::fmt(&crate::Address(*bytes), f),
      AbiValue::Sequence(items) => {
        f.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
          if i != 0 {
            f.write_str(", ")?;
          }
          Display::fmt(item, f)?;
        }
        f.write_str("]")
      },
    }
  }
}

/// An unsigned integer in the narrowest native type for its ABI bit size.
///
/// | Bit size     | Variant |
/// |--------------|---------|
/// | 8            | `U8`    |
/// | 16           | `U16`   |
/// | 24, 32       | `U32`   |
/// | 40 ..= 64    | `U64`   |
/// | 72 ..= 512   | `Big`   |
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NarrowUint {
  U8(u8),
  U16(u16),
  U32(u32),
  U64(u64),
  Big(BigUint),
}

impl NarrowUint {
  /// Fails with [`AbiErr::UintOverflow`] if `n` needs more than `bit_size`
  /// bits.
  pub fn from_biguint(n: &BigUint, bit_size: u16) -> Result<NarrowUint, AbiErr> {
    let overflow = || err!(debug, AbiErr::UintOverflow { bit_size });
    ensure!(n.bits() <= bit_size as u64, debug, AbiErr::UintOverflow { bit_size });
    Ok(match bit_size.div_ceil(8) {
      0 | 1 => NarrowUint::U8(n.to_u8().ok_or_else(overflow)?),
      2 => NarrowUint::U16(n.to_u16().ok_or_else(overflow)?),
      3 | 4 => NarrowUint::U32(n.to_u32().ok_or_else(overflow)?),
      5..=8 => NarrowUint::U64(n.to_u64().ok_or_else(overflow)?),
      _ => NarrowUint::Big(n.clone()),
    })
  }
}

impl From<NarrowUint> for BigUint {
  fn from(n: NarrowUint) -> Self {
    match n {
      NarrowUint::U8(n) => BigUint::from(n),
      NarrowUint::U16(n) => BigUint::from(n),
      NarrowUint::U32(n) => BigUint::from(n),
      NarrowUint::U64(n) => BigUint::from(n),
      NarrowUint::Big(n) => n,
    }
  }
}

// === Conversions into values ===

impl From<bool> for AbiValue {
  fn from(b: bool) -> Self {
    AbiValue::Bool(b)
  }
}

impl From<u8> for AbiValue {
  fn from(b: u8) -> Self {
    AbiValue::Byte(b)
  }
}

macro_rules! uint_into_value {
  ($($t:ty),*) => {
    $(
      impl From<$t> for AbiValue {
        fn from(n: $t) -> Self {
          AbiValue::Uint(BigUint::from(n))
        }
      }
    )*
  };
}
uint_into_value!(u16, u32, u64, u128, usize);

impl From<BigUint> for AbiValue {
  fn from(n: BigUint) -> Self {
    AbiValue::Uint(n)
  }
}

impl From<NarrowUint> for AbiValue {
  fn from(n: NarrowUint) -> Self {
    AbiValue::Uint(n.into())
  }
}

impl From<String> for AbiValue {
  fn from(s: String) -> Self {
    AbiValue::Text(s)
  }
}

impl From<&str> for AbiValue {
  fn from(s: &str) -> Self {
    AbiValue::Text(s.into())
  }
}

impl From<[u8; ADDRESS_LEN]> for AbiValue {
  fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
    AbiValue::Address(bytes)
  }
}

impl From<crate::Address> for AbiValue {
  fn from(address: crate::Address) -> Self {
    AbiValue::Address(address.0)
  }
}

impl From<Vec<AbiValue>> for AbiValue {
  fn from(items: Vec<AbiValue>) -> Self {
    AbiValue::Sequence(items)
  }
}

impl FromIterator<AbiValue> for AbiValue {
  fn from_iter<I: IntoIterator<Item = AbiValue>>(iter: I) -> Self {
    AbiValue::Sequence(iter.into_iter().collect())
  }
}

// === Fallible conversions out of values ===

impl TryFrom<&AbiValue> for bool {
  type Error = AbiErr;

  fn try_from(value: &AbiValue) -> Result<Self, Self::Error> {
    value.as_bool().ok_or_else(|| {
      err!(debug, AbiErr::ValueKindMismatch {
        expected: TypeKind::Bool,
      })
    })
  }
}

impl TryFrom<&AbiValue> for BigUint {
  type Error = AbiErr;

  fn try_from(value: &AbiValue) -> Result<Self, Self::Error> {
    match value {
      AbiValue::Uint(n) => Ok(n.clone()),
      AbiValue::Byte(b) => Ok(BigUint::from(*b)),
      _ => Err(err!(debug, AbiErr::ValueKindMismatch {
        expected: TypeKind::Uint,
      })),
    }
  }
}

macro_rules! value_into_uint {
  ($($t:ty => $to:ident),*) => {
    $(
      impl TryFrom<&AbiValue> for $t {
        type Error = AbiErr;

        fn try_from(value: &AbiValue) -> Result<Self, Self::Error> {
          match value {
            AbiValue::Uint(n) => n
              .$to()
              .ok_or_else(|| err!(debug, AbiErr::IntConversionOverflow)),
            AbiValue::Byte(b) => Ok(<$t>::from(*b)),
            _ => Err(err!(debug, AbiErr::ValueKindMismatch {
              expected: TypeKind::Uint,
            })),
          }
        }
      }
    )*
  };
}
value_into_uint!(u8 => to_u8, u16 => to_u16, u32 => to_u32, u64 => to_u64, u128 => to_u128);

impl TryFrom<&AbiValue> for String {
  type Error = AbiErr;

  fn try_from(value: &AbiValue) -> Result<Self, Self::Error> {
    value.as_str().map(String::from).ok_or_else(|| {
      err!(debug, AbiErr::ValueKindMismatch {
        expected: TypeKind::String,
      })
    })
  }
}

impl TryFrom<&AbiValue> for [u8; ADDRESS_LEN] {
  type Error = AbiErr;

  fn try_from(value: &AbiValue) -> Result<Self, Self::Error> {
    match value {
      AbiValue::Address(bytes) => Ok(*bytes),
      AbiValue::Sequence(_) => {
        let bytes = value.to_bytes().ok_or_else(|| {
          err!(debug, AbiErr::ValueKindMismatch {
            expected: TypeKind::Address,
          })
        })?;
        let observed = bytes.len();
        bytes.try_into().map_err(|_| {
          err!(debug, AbiErr::ValueLenMismatch {
            expected: ADDRESS_LEN,
            observed,
          })
        })
      },
      _ => Err(err!(debug, AbiErr::ValueKindMismatch {
        expected: TypeKind::Address,
      })),
    }
  }
}
