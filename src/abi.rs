use crate::{types::TypeKind, AbiType, AbiValue};
use alloc::{string::FromUtf8Error, vec::Vec};
use core::{
  fmt::{Debug, Display, Formatter},
  num::TryFromIntError,
  str::Utf8Error,
};

/// Size of an address, in bytes.
pub const ADDRESS_LEN: usize = 32;
/// Size of the checksum appended to an address before base32 encoding.
pub const CHECKSUM_LEN: usize = 4;
/// Size of the length prefix for dynamic arrays and strings, and of the
/// offsets written in tuple heads.
pub const LENGTH_PREFIX_LEN: usize = 2;
/// The largest length or offset that can be written in an encoding.
pub const MAX_ENCODED_LEN: usize = u16::MAX as usize;
/// Smallest bit size of `uint<N>` and `ufixed<N>x<M>`.
pub const MIN_BIT_SIZE: u16 = 8;
/// Largest bit size of `uint<N>` and `ufixed<N>x<M>`.
pub const MAX_BIT_SIZE: u16 = 512;
/// Smallest precision of `ufixed<N>x<M>`.
pub const MIN_PRECISION: u16 = 1;
/// Largest precision of `ufixed<N>x<M>`.
pub const MAX_PRECISION: u16 = 160;
/// How deeply arrays and tuples may nest in a parsed type signature.
pub const MAX_TYPE_DEPTH: usize = 128;

/// Encodes `value` as the ABI type named by `signature`.
///
/// ```
/// use avm_abi::{abi_encode, AbiValue};
///
/// let bools = AbiValue::from(vec![true.into(), false.into(), true.into()]);
/// assert_eq!(abi_encode("bool[3]", &bools).unwrap(), [0xA0]);
/// ```
pub fn abi_encode(signature: &str, value: &AbiValue) -> Result<Vec<u8>, AbiErr> {
  AbiType::parse(signature)?.encode(value)
}

/// Decodes `encoded` as the ABI type named by `signature`.
pub fn abi_decode(signature: &str, encoded: &[u8]) -> Result<AbiValue, AbiErr> {
  AbiType::parse(signature)?.decode(encoded)
}

/// Various errors associated with ABI types and their encodings.
///
/// Variants are grouped by the stage at which they occur: reading type
/// signatures, matching values against types, numeric ranges, reading encoded
/// bytes, and the JSON, address, and application argument forms.
//
// Note: As with the codecs' other hot paths, this enum is kept `Copy` and free
// of allocations.  Context (e.g., the offending signature) is logged where the
// error is created; see `err!`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AbiErr {
  // === Type and method signatures ===
  /// The string is not any recognized ABI type.
  UnparseableType,

  /// `uint<N>` and `ufixed<N>x<M>` require `N` to be a multiple of 8 in
  /// `[8, 512]`.
  UintBitSize(u16),

  /// `ufixed<N>x<M>` requires `M` in `[1, 160]`.
  UfixedPrecision(u16),

  /// A static array length was not a decimal literal that fits in a `u16`.
  StaticArrayLength,

  /// The counts of `(` and `)` in a tuple signature differ, or a `)`
  /// appears without a matching `(`.
  TupleParenUnbalanced,

  /// The counts of `[` and `]` in a tuple signature differ.
  TupleBracketUnbalanced,

  /// Tuple content had a leading, trailing, or doubled comma.
  TupleComma,

  /// A tuple may hold at most `u16::MAX - 1` items.
  TupleTooManyItems(usize),

  /// A method signature has no `(`.
  MethodNoParen,

  /// A method signature starts with `(`.
  MethodNoName,

  /// The argument list of a method signature is not closed.
  MethodParenUnpaired,

  /// The argument at this index is neither a reference or transaction type
  /// nor a parseable ABI type.
  MethodArgType(usize),

  /// The return type is neither `void` nor a parseable ABI type.
  MethodReturnType,

  // === Values ===
  /// A value of some other kind was provided than the type requires.
  ValueKindMismatch {
    expected: TypeKind,
  },

  /// A sequence did not contain the number of items the type requires.
  ValueLenMismatch {
    expected: usize,
    observed: usize,
  },

  // === Ranges ===
  /// An integer needs more bits than the type provides.
  UintOverflow {
    bit_size: u16,
  },

  /// Unsigned types cannot hold negative values.
  NegativeValue,

  /// A decimal value is not an exact multiple of `10^-precision`.
  UfixedInexact,

  /// A length or offset did not fit in the 16-bit limit of the encoding.
  LengthOverflow(usize),

  /// `byte_len()` was called on a dynamic type.
  DynamicTypeLen,

  // === Encoded bytes ===
  /// An attempt was made to read past the end of the encoded bytes.
  OutOfBounds {
    index:  usize,
    length: usize,
  },

  /// A scalar was decoded from the wrong number of bytes.
  ByteLenMismatch {
    expected: usize,
    observed: usize,
  },

  /// Decoding finished without consuming every byte.
  TrailingBytes {
    consumed: usize,
    length:   usize,
  },

  /// The first dynamic item did not start right after the tuple's heads.
  HeadOffsetMismatch {
    expected: usize,
    observed: usize,
  },

  /// The offsets of dynamic items were not in non-decreasing order.
  OffsetsNotMonotonic,

  /// An encoded `bool` was neither `0x80` nor `0x00`.
  InvalidBool(u8),

  /// A run of booleans in a tuple did not start on an 8-item boundary.
  BoolChunkMisaligned(usize),

  /// An encoded string was not valid UTF-8.
  InvalidUtf8,

  // === JSON ===
  /// The JSON text could not be parsed.
  JsonSyntax,

  /// The JSON value was not of the form the type requires.
  JsonShape {
    expected: TypeKind,
  },

  /// A byte array's JSON string was not valid base64.
  Base64,

  // === Addresses ===
  /// The address text was not valid base32.
  AddressBase32,

  /// The decoded address was not 36 bytes (address and checksum).
  AddressLength(usize),

  /// The checksum of the decoded address did not match.
  AddressChecksumMismatch,

  // === Application arguments and box keys ===
  /// A box key was shorter than its prefix and application id.
  BoxKeyTooShort(usize),

  /// A box key did not start with `bx:`.
  BoxKeyPrefix,

  /// An application argument did not contain an `encoding:` prefix.
  ArgNoEncoding,

  /// An application argument's encoding was not recognized.
  UnknownArgEncoding,

  /// An application argument could not be read as a `u64`.
  ArgInteger,

  /// An application argument could not be decoded as base32 or base64.
  ArgBytes,

  /// An overflow occurred during a checked integer type conversion.
  IntConversionOverflow,
}

impl Display for AbiErr {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    Debug::fmt(self, f)
  }
}

#[cfg(feature = "std")]
impl std::error::Error for AbiErr {}

impl From<Utf8Error> for AbiErr {
  fn from(_src: Utf8Error) -> Self {
    AbiErr::InvalidUtf8
  }
}

impl From<FromUtf8Error> for AbiErr {
  fn from(_src: FromUtf8Error) -> Self {
    AbiErr::InvalidUtf8
  }
}

impl From<TryFromIntError> for AbiErr {
  fn from(_value: TryFromIntError) -> Self {
    AbiErr::IntConversionOverflow
  }
}

impl From<serde_json::Error> for AbiErr {
  fn from(_value: serde_json::Error) -> Self {
    AbiErr::JsonSyntax
  }
}
