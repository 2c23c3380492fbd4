//! ABI types: the closed set of kinds, their canonical signatures, and the
//! structural queries the codecs rely on.
//!
//! An [`AbiType`] can only be built through its constructors (or by parsing a
//! signature, see [`AbiType::parse`]), which enforce the allowed ranges:
//!
//! | Signature        | Kind                        | Limits                      |
//! |------------------|-----------------------------|-----------------------------|
//! | `uint<N>`        | [`TypeKind::Uint`]          | `N % 8 == 0`, `8..=512`     |
//! | `byte`           | [`TypeKind::Byte`]          |                             |
//! | `ufixed<N>x<M>`  | [`TypeKind::Ufixed`]        | `N` as above, `M` `1..=160` |
//! | `bool`           | [`TypeKind::Bool`]          |                             |
//! | `<T>[<L>]`       | [`TypeKind::StaticArray`]   | `L` fits in a `u16`         |
//! | `address`        | [`TypeKind::Address`]       |                             |
//! | `<T>[]`          | [`TypeKind::DynamicArray`]  |                             |
//! | `string`         | [`TypeKind::String`]        |                             |
//! | `(<T0>,...)`     | [`TypeKind::Tuple`]         | fewer than `u16::MAX` items |
use crate::{
  AbiErr, ADDRESS_LEN, MAX_BIT_SIZE, MAX_ENCODED_LEN, MAX_PRECISION,
  MIN_BIT_SIZE, MIN_PRECISION,
};
use alloc::{boxed::Box, vec::Vec};
use core::{
  fmt::{Debug, Display, Formatter},
  iter::repeat,
};

pub mod method;
mod parse;

pub(crate) use parse::split_tuple_content;

/// Identifies the kind of an [`AbiType`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
  /// Unsigned integers, `uint<N>`.
  Uint,
  /// A single byte, `byte`.
  Byte,
  /// Unsigned fixed-point decimals, `ufixed<N>x<M>`.
  Ufixed,
  /// `bool`
  Bool,
  /// Arrays of a declared length, `<type>[<length>]`.
  StaticArray,
  /// A 32-byte `address`.
  Address,
  /// Arrays with a length prefix, `<type>[]`.
  DynamicArray,
  /// UTF-8 text, `string`.
  String,
  /// `(<type 0>,...,<type k>)`
  Tuple,
}

/// The internal representation of an [`AbiType`].
///
/// Kept private to the crate so that every instance passes through a
/// constructor that checks its ranges.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum Repr {
  Uint { bit_size: u16 },
  Byte,
  Ufixed { bit_size: u16, precision: u16 },
  Bool,
  StaticArray { elem: Box<AbiType>, len: u16 },
  Address,
  DynamicArray { elem: Box<AbiType> },
  String,
  Tuple { children: Vec<AbiType> },
}

/// An ABI type.
///
/// Types are immutable values; child types are owned, so an `AbiType` can be
/// shared freely between threads and compared structurally.  Two types are
/// equal iff their canonical signatures ([`Display`]) are equal.
///
/// ```
/// use avm_abi::{AbiType, TypeKind};
///
/// let t = AbiType::tuple(vec![
///   AbiType::uint(64).unwrap(),
///   AbiType::dynamic_array(AbiType::byte()),
/// ])
/// .unwrap();
/// assert_eq!(t.to_string(), "(uint64,byte[])");
/// assert_eq!(t.kind(), TypeKind::Tuple);
/// assert!(t.is_dynamic());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AbiType(pub(crate) Repr);

impl AbiType {
  /// Creates a `uint<bit_size>` type.
  pub fn uint(bit_size: u16) -> Result<AbiType, AbiErr> {
    check_bit_size(bit_size)?;
    Ok(AbiType(Repr::Uint { bit_size }))
  }

  /// Creates a `ufixed<bit_size>x<precision>` type.
  pub fn ufixed(bit_size: u16, precision: u16) -> Result<AbiType, AbiErr> {
    check_bit_size(bit_size)?;
    ensure!(
      (MIN_PRECISION..=MAX_PRECISION).contains(&precision),
      debug,
      AbiErr::UfixedPrecision(precision)
    );
    Ok(AbiType(Repr::Ufixed {
      bit_size,
      precision,
    }))
  }

  /// The `byte` type.
  pub const fn byte() -> AbiType {
    AbiType(Repr::Byte)
  }

  /// The `bool` type.
  pub const fn bool() -> AbiType {
    AbiType(Repr::Bool)
  }

  /// The `address` type.
  pub const fn address() -> AbiType {
    AbiType(Repr::Address)
  }

  /// The `string` type.
  pub const fn string() -> AbiType {
    AbiType(Repr::String)
  }

  /// Creates an array type with exactly `len` elements.
  pub fn static_array(elem: AbiType, len: u16) -> AbiType {
    AbiType(Repr::StaticArray {
      elem: Box::new(elem),
      len,
    })
  }

  /// Creates an array type whose length is given by each value.
  pub fn dynamic_array(elem: AbiType) -> AbiType {
    AbiType(Repr::DynamicArray {
      elem: Box::new(elem),
    })
  }

  /// Creates a tuple type from its children.
  ///
  /// Fails if there are `u16::MAX` or more children.
  pub fn tuple(children: Vec<AbiType>) -> Result<AbiType, AbiErr> {
    ensure!(
      children.len() < MAX_ENCODED_LEN,
      debug,
      AbiErr::TupleTooManyItems(children.len())
    );
    Ok(AbiType(Repr::Tuple { children }))
  }

  /// Returns the kind of this type.
  pub fn kind(&self) -> TypeKind {
    match &self.0 {
      Repr::Uint { .. } => TypeKind::Uint,
      Repr::Byte => TypeKind::Byte,
      Repr::Ufixed { .. } => TypeKind::Ufixed,
      Repr::Bool => TypeKind::Bool,
      Repr::StaticArray { .. } => TypeKind::StaticArray,
      Repr::Address => TypeKind::Address,
      Repr::DynamicArray { .. } => TypeKind::DynamicArray,
      Repr::String => TypeKind::String,
      Repr::Tuple { .. } => TypeKind::Tuple,
    }
  }

  /// The element type of arrays, or the children of tuples.  Empty for all
  /// other kinds.
  pub fn child_types(&self) -> &[AbiType] {
    match &self.0 {
      Repr::StaticArray { elem, .. } | Repr::DynamicArray { elem } => {
        core::slice::from_ref(elem.as_ref())
      },
      Repr::Tuple { children } => children,
      _ => &[],
    }
  }

  /// The `N` of `uint<N>` and `ufixed<N>x<M>`.
  pub fn bit_size(&self) -> Option<u16> {
    match &self.0 {
      Repr::Uint { bit_size } | Repr::Ufixed { bit_size, .. } => {
        Some(*bit_size)
      },
      _ => None,
    }
  }

  /// The `M` of `ufixed<N>x<M>`.
  pub fn precision(&self) -> Option<u16> {
    match &self.0 {
      Repr::Ufixed { precision, .. } => Some(*precision),
      _ => None,
    }
  }

  /// The declared length of static arrays, or the number of tuple children.
  pub fn static_length(&self) -> Option<u16> {
    match &self.0 {
      Repr::StaticArray { len, .. } => Some(*len),
      // Bounded by `tuple()`.
      Repr::Tuple { children } => Some(children.len() as u16),
      _ => None,
    }
  }

  #[inline]
  pub(crate) fn is_bool(&self) -> bool {
    matches!(self.0, Repr::Bool)
  }

  /// Returns `true` iff the encoded length of this type depends on the value.
  ///
  /// `string` and dynamic arrays are dynamic, as are static arrays and
  /// tuples containing a dynamic type.
  pub fn is_dynamic(&self) -> bool {
    match &self.0 {
      Repr::DynamicArray { .. } | Repr::String => true,
      Repr::StaticArray { elem, .. } => elem.is_dynamic(),
      Repr::Tuple { children } => children.iter().any(AbiType::is_dynamic),
      Repr::Uint { .. }
      | Repr::Byte
      | Repr::Ufixed { .. }
      | Repr::Bool
      | Repr::Address => false,
    }
  }

  /// Returns the encoded length of a static type, in bytes.
  ///
  /// Consecutive `bool`s in a tuple, and the elements of a `bool[N]`, are
  /// packed 8 to a byte.
  ///
  /// ```
  /// use avm_abi::AbiType;
  ///
  /// let t = AbiType::parse("(bool,bool,uint16,bool[9])").unwrap();
  /// assert_eq!(t.byte_len().unwrap(), 1 + 2 + 2);
  /// assert!(AbiType::parse("(bool,string)").unwrap().byte_len().is_err());
  /// ```
  pub fn byte_len(&self) -> Result<usize, AbiErr> {
    match &self.0 {
      Repr::Address => Ok(ADDRESS_LEN),
      Repr::Byte | Repr::Bool => Ok(1),
      Repr::Uint { bit_size } | Repr::Ufixed { bit_size, .. } => {
        Ok(*bit_size as usize / 8)
      },
      Repr::StaticArray { elem, len } => {
        if elem.is_bool() {
          Ok((*len as usize).div_ceil(8))
        } else {
          Ok(elem.byte_len()? * *len as usize)
        }
      },
      Repr::Tuple { children } => {
        let mut size = 0;
        let mut index = 0;
        while index < children.len() {
          if children[index].is_bool() {
            let after = bool_run_after(children, index);
            index += after;
            size += (after + 1).div_ceil(8);
          } else {
            size += children[index].byte_len()?;
          }
          index += 1;
        }
        Ok(size)
      },
      Repr::DynamicArray { .. } | Repr::String => {
        Err(err!(debug, AbiErr::DynamicTypeLen))
      },
    }
  }

  /// Casts an array-like type into the equivalent tuple of `len` elements.
  ///
  /// This lets the tuple codec handle static arrays, dynamic arrays, strings
  /// and addresses.  For static arrays and addresses `len` must match the
  /// declared length; dynamic arrays and strings take it from the value.
  pub(crate) fn as_tuple_of(&self, len: usize) -> Result<AbiType, AbiErr> {
    let (elem, expected) = match &self.0 {
      Repr::StaticArray {
        elem,
        len: declared,
      } => (elem.as_ref().clone(), *declared as usize),
      Repr::Address => (AbiType::byte(), ADDRESS_LEN),
      Repr::DynamicArray { elem } => (elem.as_ref().clone(), len),
      Repr::String => (AbiType::byte(), len),
      _ => {
        return Err(err!(
          debug,
          AbiErr::ValueKindMismatch {
            expected: self.kind(),
          }
        ))
      },
    };
    ensure!(
      expected == len,
      debug,
      AbiErr::ValueLenMismatch {
        expected,
        observed: len,
      }
    );
    AbiType::tuple(repeat(elem).take(len).collect())
  }
}

fn check_bit_size(bit_size: u16) -> Result<(), AbiErr> {
  ensure!(
    bit_size % 8 == 0 && (MIN_BIT_SIZE..=MAX_BIT_SIZE).contains(&bit_size),
    debug,
    AbiErr::UintBitSize(bit_size)
  );
  Ok(())
}

/// The number of `bool`s directly following `children[index]`.
pub(crate) fn bool_run_after(children: &[AbiType], index: usize) -> usize {
  children[index + 1..]
    .iter()
    .take_while(|child| child.is_bool())
    .count()
}

/// The number of `bool`s directly preceding `children[index]`.
pub(crate) fn bool_run_before(children: &[AbiType], index: usize) -> usize {
  children[..index]
    .iter()
    .rev()
    .take_while(|child| child.is_bool())
    .count()
}

impl Display for AbiType {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    match &self.0 {
      Repr::Uint { bit_size } => write!(f, "uint{}", bit_size),
      Repr::Byte => f.write_str("byte"),
      Repr::Ufixed {
        bit_size,
        precision,
      } => write!(f, "ufixed{}x{}", bit_size, precision),
      Repr::Bool => f.write_str("bool"),
      Repr::StaticArray { elem, len } => write!(f, "{}[{}]", elem, len),
      Repr::Address => f.write_str("address"),
      Repr::DynamicArray { elem } => write!(f, "{}[]", elem),
      Repr::String => f.write_str("string"),
      Repr::Tuple { children } => {
        f.write_str("(")?;
        for (i, child) in children.iter().enumerate() {
          if i != 0 {
            f.write_str(",")?;
          }
          Display::fmt(child, f)?;
        }
        f.write_str(")")
      },
    }
  }
}

impl Debug for AbiType {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    write!(f, "AbiType({})", self)
  }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AbiType {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.collect_str(self)
  }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AbiType {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let signature =
      <alloc::string::String as serde::Deserialize>::deserialize(deserializer)?;
    AbiType::parse(&signature).map_err(serde::de::Error::custom)
  }
}
