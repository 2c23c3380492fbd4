//! Parsing of type signatures, e.g. `(uint64,byte[])`.
use super::AbiType;
use crate::{AbiErr, MAX_TYPE_DEPTH};
use alloc::vec::Vec;
use core::str::FromStr;
use smallvec::SmallVec;

/// A `[left, right)` range of a signature, used while splitting tuple content.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Segment {
  left:  usize,
  right: usize,
}

impl AbiType {
  /// Parses an ABI type signature.
  ///
  /// Only value types are supported; reference types (e.g., `account`) and
  /// transaction types (e.g., `pay`) are rejected.  See
  /// [`crate::verify_method_signature`] for those.
  ///
  /// ```
  /// use avm_abi::AbiType;
  ///
  /// let t = AbiType::parse("(uint64,byte[])").unwrap();
  /// assert_eq!(t.child_types()[1], AbiType::dynamic_array(AbiType::byte()));
  /// assert!(AbiType::parse("uint7").is_err());
  /// assert!(AbiType::parse("ufixed64x0").is_err());
  /// ```
  pub fn parse(signature: &str) -> Result<AbiType, AbiErr> {
    log::trace!("Parsing ABI type {:?}", signature);
    parse_type(signature, 0)
  }
}

impl FromStr for AbiType {
  type Err = AbiErr;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    AbiType::parse(s)
  }
}

/// `depth` counts the arrays and tuples enclosing `s`.
fn parse_type(s: &str, depth: usize) -> Result<AbiType, AbiErr> {
  ensure!(depth <= MAX_TYPE_DEPTH, debug, AbiErr::UnparseableType);
  if let Some(elem) = s.strip_suffix("[]") {
    return Ok(AbiType::dynamic_array(parse_type(elem, depth + 1)?));
  }
  if s.ends_with(']') {
    return parse_static_array(s, depth);
  }
  if let Some(bit_size) = s.strip_prefix("uint") {
    let bit_size = parse_decimal_u16(bit_size)
      .ok_or_else(|| err!(debug, AbiErr::UnparseableType))?;
    return AbiType::uint(bit_size);
  }
  if let Some(sizes) = s.strip_prefix("ufixed") {
    return parse_ufixed(sizes);
  }
  match s {
    "byte" => Ok(AbiType::byte()),
    "bool" => Ok(AbiType::bool()),
    "address" => Ok(AbiType::address()),
    "string" => Ok(AbiType::string()),
    _ if s.len() >= 2 && s.starts_with('(') && s.ends_with(')') => {
      parse_tuple(s, depth)
    },
    _ => Err(err!(debug, AbiErr::UnparseableType)),
  }
}

/// `<elem>[<len>]`, where `len` has no leading zeros.
fn parse_static_array(s: &str, depth: usize) -> Result<AbiType, AbiErr> {
  // Caller checked the trailing `]`.
  let open = s
    .rfind('[')
    .ok_or_else(|| err!(debug, AbiErr::UnparseableType))?;
  let (elem, len) = (&s[..open], &s[open + 1..s.len() - 1]);
  ensure!(
    !elem.is_empty() && elem.bytes().all(is_signature_byte),
    debug,
    AbiErr::UnparseableType
  );
  ensure!(
    is_nonzero_decimal(len),
    debug,
    AbiErr::StaticArrayLength
  );
  let len =
    parse_decimal_u16(len).ok_or_else(|| err!(debug, AbiErr::StaticArrayLength))?;
  Ok(AbiType::static_array(parse_type(elem, depth + 1)?, len))
}

/// The `<N>x<M>` of `ufixed<N>x<M>`, neither with leading zeros.
fn parse_ufixed(sizes: &str) -> Result<AbiType, AbiErr> {
  let (bit_size, precision) = sizes
    .split_once('x')
    .ok_or_else(|| err!(debug, AbiErr::UnparseableType))?;
  ensure!(
    is_nonzero_decimal(bit_size) && is_nonzero_decimal(precision),
    debug,
    AbiErr::UnparseableType
  );
  let bit_size = parse_decimal_u16(bit_size)
    .ok_or_else(|| err!(debug, AbiErr::UnparseableType))?;
  let precision = parse_decimal_u16(precision)
    .ok_or_else(|| err!(debug, AbiErr::UnparseableType))?;
  AbiType::ufixed(bit_size, precision)
}

fn parse_tuple(s: &str, depth: usize) -> Result<AbiType, AbiErr> {
  // A rough check of the brackets; the splitter checks their nesting.
  ensure!(
    s.matches('(').count() == s.matches(')').count(),
    debug,
    AbiErr::TupleParenUnbalanced
  );
  ensure!(
    s.matches('[').count() == s.matches(']').count(),
    debug,
    AbiErr::TupleBracketUnbalanced
  );
  let children = split_tuple_content(&s[1..s.len() - 1])?
    .into_iter()
    .map(|child| parse_type(child, depth + 1))
    .collect::<Result<Vec<_>, _>>()?;
  AbiType::tuple(children)
}

/// Splits the content between the parentheses of a tuple signature into the
/// signatures of its children.
///
/// Commas nested inside parentheses do not split; once a top level `(...)`
/// closes, everything up to the next comma belongs to the same child, so
/// `(a,b)[2],c` yields `(a,b)[2]` and `c`.
pub(crate) fn split_tuple_content(content: &str) -> Result<Vec<&str>, AbiErr> {
  if content.is_empty() {
    return Ok(Vec::new());
  }
  ensure!(
    !content.starts_with(',') && !content.ends_with(','),
    debug,
    AbiErr::TupleComma
  );
  ensure!(!content.contains(",,"), debug, AbiErr::TupleComma);

  let bytes = content.as_bytes();
  let mut segments: SmallVec<Segment, 8> = SmallVec::new();
  let mut depth = 0usize;
  let mut left = 0;
  let mut index = 0;
  while index < bytes.len() {
    match bytes[index] {
      b'(' => depth += 1,
      b')' => {
        depth = depth
          .checked_sub(1)
          .ok_or_else(|| err!(debug, AbiErr::TupleParenUnbalanced))?;
        if depth == 0 {
          // Skip ahead to the next comma, or the end.
          while index + 1 < bytes.len() && bytes[index + 1] != b',' {
            index += 1;
          }
        }
      },
      b',' if depth == 0 => {
        segments.push(Segment {
          left,
          right: index,
        });
        left = index + 1;
      },
      _ => {},
    }
    index += 1;
  }
  ensure!(depth == 0, debug, AbiErr::TupleParenUnbalanced);
  segments.push(Segment {
    left,
    right: bytes.len(),
  });

  // Segments only start or end next to an ASCII comma, so these are always
  // on `char` boundaries.
  Ok(
    segments
      .iter()
      .map(|segment| &content[segment.left..segment.right])
      .collect(),
  )
}

/// Parses a string of only ASCII digits as a `u16`.
fn parse_decimal_u16(digits: &str) -> Option<u16> {
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  digits.parse().ok()
}

fn is_nonzero_decimal(digits: &str) -> bool {
  matches!(digits.as_bytes().first(), Some(b'1'..=b'9'))
    && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_signature_byte(b: u8) -> bool {
  matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'[' | b']' | b'(' | b')' | b',')
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{types::TypeKind, util::init_test_logger};
  use alloc::{string::ToString, vec};
  use std::format;

  #[test]
  fn parse_scalars() -> Result<(), AbiErr> {
    init_test_logger();
    assert_eq!(AbiType::parse("uint64")?, AbiType::uint(64)?);
    assert_eq!(AbiType::parse("uint8")?, AbiType::uint(8)?);
    assert_eq!(AbiType::parse("uint512")?, AbiType::uint(512)?);
    assert_eq!(AbiType::parse("byte")?, AbiType::byte());
    assert_eq!(AbiType::parse("bool")?, AbiType::bool());
    assert_eq!(AbiType::parse("address")?, AbiType::address());
    assert_eq!(AbiType::parse("string")?, AbiType::string());
    assert_eq!(AbiType::parse("ufixed64x3")?, AbiType::ufixed(64, 3)?);
    assert_eq!(
      AbiType::parse("ufixed512x160")?,
      AbiType::ufixed(512, 160)?
    );
    Ok(())
  }

  #[test]
  fn parse_scalar_failures() {
    init_test_logger();
    assert_eq!(AbiType::parse("uint7"), Err(AbiErr::UintBitSize(7)));
    assert_eq!(AbiType::parse("uint520"), Err(AbiErr::UintBitSize(520)));
    assert_eq!(AbiType::parse("uint0"), Err(AbiErr::UintBitSize(0)));
    assert_eq!(AbiType::parse("uint"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("uint+8"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("uint99999"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("ufixed64x0"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("ufixed64x161"), Err(AbiErr::UfixedPrecision(161)));
    assert_eq!(AbiType::parse("ufixed63x1"), Err(AbiErr::UintBitSize(63)));
    assert_eq!(AbiType::parse("ufixed064x1"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("ufixed64"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("int64"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("Bool"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse(""), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("account"), Err(AbiErr::UnparseableType));
  }

  #[test]
  fn parse_arrays() -> Result<(), AbiErr> {
    assert_eq!(
      AbiType::parse("uint64[]")?,
      AbiType::dynamic_array(AbiType::uint(64)?)
    );
    assert_eq!(
      AbiType::parse("bool[65535]")?,
      AbiType::static_array(AbiType::bool(), u16::MAX)
    );
    assert_eq!(
      AbiType::parse("byte[32][]")?,
      AbiType::dynamic_array(AbiType::static_array(AbiType::byte(), 32))
    );
    assert_eq!(
      AbiType::parse("string[][2]")?,
      AbiType::static_array(AbiType::dynamic_array(AbiType::string()), 2)
    );
    assert_eq!(
      AbiType::parse("(uint8,bool)[3]")?.to_string(),
      "(uint8,bool)[3]"
    );

    assert_eq!(AbiType::parse("bool[0]"), Err(AbiErr::StaticArrayLength));
    assert_eq!(AbiType::parse("bool[01]"), Err(AbiErr::StaticArrayLength));
    assert_eq!(AbiType::parse("bool[65536]"), Err(AbiErr::StaticArrayLength));
    assert_eq!(AbiType::parse("bool[x]"), Err(AbiErr::StaticArrayLength));
    assert_eq!(AbiType::parse("[3]"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("Bool[3]"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("[]"), Err(AbiErr::UnparseableType));
    assert_eq!(AbiType::parse("bool]"), Err(AbiErr::UnparseableType));
    Ok(())
  }

  #[test]
  fn nesting_limit() -> Result<(), AbiErr> {
    init_test_logger();
    let nested = |depth: usize| {
      format!("{}bool{}", "(".repeat(depth), ")".repeat(depth))
    };
    AbiType::parse(&nested(MAX_TYPE_DEPTH))?;
    assert_eq!(
      AbiType::parse(&nested(MAX_TYPE_DEPTH + 1)),
      Err(AbiErr::UnparseableType)
    );
    assert_eq!(
      AbiType::parse(&nested(50_000)),
      Err(AbiErr::UnparseableType)
    );

    AbiType::parse(&format!("bool{}", "[1]".repeat(MAX_TYPE_DEPTH)))?;
    assert_eq!(
      AbiType::parse(&format!("bool{}", "[]".repeat(MAX_TYPE_DEPTH + 1))),
      Err(AbiErr::UnparseableType)
    );
    assert_eq!(
      AbiType::parse(&format!("bool{}", "[1]".repeat(50_000))),
      Err(AbiErr::UnparseableType)
    );
    Ok(())
  }

  #[test]
  fn parse_tuples() -> Result<(), AbiErr> {
    let t = AbiType::parse("(uint64,byte[])")?;
    assert_eq!(t.kind(), TypeKind::Tuple);
    assert_eq!(
      t,
      AbiType::tuple(vec![
        AbiType::uint(64)?,
        AbiType::dynamic_array(AbiType::byte())
      ])?
    );
    assert_eq!(t.to_string(), "(uint64,byte[])");

    assert_eq!(AbiType::parse("()")?, AbiType::tuple(vec![])?);
    let nested =
      "(uint16,(byte,(bool,string)[2])[],ufixed8x2,((),address[3]))";
    assert_eq!(AbiType::parse(nested)?.to_string(), nested);

    assert_eq!(
      AbiType::parse("(uint8,(bool)"),
      Err(AbiErr::TupleParenUnbalanced)
    );
    assert_eq!(
      AbiType::parse("(uint8[,bool)"),
      Err(AbiErr::TupleBracketUnbalanced)
    );
    assert_eq!(AbiType::parse("(,bool)"), Err(AbiErr::TupleComma));
    assert_eq!(AbiType::parse("(bool,)"), Err(AbiErr::TupleComma));
    assert_eq!(AbiType::parse("(bool,,byte)"), Err(AbiErr::TupleComma));
    assert_eq!(
      AbiType::parse("(bool)(byte)"),
      Err(AbiErr::TupleParenUnbalanced)
    );
    assert_eq!(
      AbiType::parse("(bool))((byte)"),
      Err(AbiErr::TupleParenUnbalanced)
    );
    assert_eq!(AbiType::parse("(uint9)"), Err(AbiErr::UintBitSize(9)));
    Ok(())
  }

  #[test]
  fn split_content() -> Result<(), AbiErr> {
    assert_eq!(split_tuple_content("")?, Vec::<&str>::new());
    assert_eq!(split_tuple_content("uint64")?, ["uint64"]);
    assert_eq!(
      split_tuple_content("uint64,(byte,bool)[2],string")?,
      ["uint64", "(byte,bool)[2]", "string"]
    );
    assert_eq!(
      split_tuple_content("(a,(b,c)),(d)[],e[3]")?,
      ["(a,(b,c))", "(d)[]", "e[3]"]
    );
    assert_eq!(split_tuple_content("a,b)"), Err(AbiErr::TupleParenUnbalanced));
    assert_eq!(split_tuple_content("(a,b"), Err(AbiErr::TupleParenUnbalanced));
    assert_eq!(split_tuple_content(",a"), Err(AbiErr::TupleComma));
    Ok(())
  }

  #[test]
  fn signature_round_trip() -> Result<(), AbiErr> {
    let signatures = [
      "uint8",
      "ufixed256x77",
      "bool[]",
      "address[7]",
      "(string,(bool,bool,bool),byte[][5])",
      "((uint64)[],())[2]",
    ];
    for signature in signatures {
      let parsed = AbiType::parse(signature)?;
      let reparsed: AbiType = parsed.to_string().parse()?;
      assert_eq!(parsed, reparsed);
      assert_eq!(reparsed.to_string(), signature);
    }
    Ok(())
  }
}
