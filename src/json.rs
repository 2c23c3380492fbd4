//! The JSON form of ABI values.
//!
//! | Kind                     | JSON                                         |
//! |--------------------------|----------------------------------------------|
//! | `bool`                   | `true`, `false`                              |
//! | `byte`, `uint<N>`        | a number, e.g. `117`                         |
//! | `ufixed<N>x<M>`          | a decimal with `M` fraction digits, `1.500`  |
//! | `address`                | the address text, `"CAFF...JAFM"`            |
//! | `byte[]`, `byte[N]`      | a base64 string, `"AAEC"`                    |
//! | `string`                 | a string                                     |
//! | other arrays, tuples     | an array                                     |
//!
//! When reading JSON, byte arrays and strings also accept an array of byte
//! values, and decimals accept exponents (`1.5e2`) and fractions (`3/2`), as
//! long as the value is exact at the type's precision.
use crate::{
  crypto::address::{address_to_text, text_to_address},
  types::{Repr, TypeKind},
  util::LogErr,
  AbiErr, AbiType, AbiValue, ADDRESS_LEN,
};
use alloc::{
  boxed::Box,
  string::{String, ToString},
  vec::Vec,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use num_bigint::BigUint;
use num_traits::Zero;
use serde_json::{error::Category, value::RawValue};

impl AbiType {
  /// Writes a value of this type as JSON.
  ///
  /// ```
  /// use avm_abi::{AbiType, AbiValue};
  ///
  /// let t = AbiType::parse("(bool,byte[],ufixed16x1)").unwrap();
  /// let v = AbiValue::from(vec![
  ///   true.into(),
  ///   AbiValue::bytes(&[0, 1, 2]),
  ///   AbiValue::from(15u64),
  /// ]);
  /// assert_eq!(t.marshal_json(&v).unwrap(), r#"[true,"AAEC",1.5]"#);
  /// ```
  pub fn marshal_json(&self, value: &AbiValue) -> Result<String, AbiErr> {
    match &self.0 {
      Repr::Uint { bit_size } => Ok(self.uint_value(value, *bit_size)?.to_string()),
      Repr::Ufixed {
        bit_size,
        precision,
      } => {
        let n = self.uint_value(value, *bit_size)?;
        Ok(fixed_point(&n, *precision as usize))
      },
      Repr::Bool => {
        let b = value.as_bool().ok_or_else(|| self.value_mismatch())?;
        Ok(b.to_string())
      },
      Repr::Byte => {
        let b = value.as_byte().ok_or_else(|| self.value_mismatch())?;
        Ok(b.to_string())
      },
      Repr::Address => {
        let bytes = <[u8; ADDRESS_LEN]>::try_from(value)?;
        Ok(serde_json::to_string(&address_to_text(&bytes))?)
      },
      Repr::StaticArray { elem, len } => {
        let items = value.items(TypeKind::StaticArray)?;
        check_count(*len as usize, items.len())?;
        marshal_array(elem, items)
      },
      Repr::DynamicArray { elem } => {
        marshal_array(elem, value.items(TypeKind::DynamicArray)?)
      },
      Repr::String => {
        let text = value.as_str().ok_or_else(|| self.value_mismatch())?;
        Ok(serde_json::to_string(text)?)
      },
      Repr::Tuple { children } => {
        let items = value.items(TypeKind::Tuple)?;
        check_count(children.len(), items.len())?;
        let parts = children
          .iter()
          .zip(items)
          .map(|(child, item)| child.marshal_json(item))
          .collect::<Result<Vec<_>, _>>()?;
        json_array(parts)
      },
    }
  }

  /// Reads a value of this type from JSON.
  ///
  /// ```
  /// use avm_abi::{AbiType, AbiValue};
  ///
  /// let t = AbiType::parse("ufixed64x3").unwrap();
  /// let v = t.unmarshal_json("123.456").unwrap();
  /// assert_eq!(v, AbiValue::from(123_456u64));
  /// assert_eq!(t.marshal_json(&v).unwrap(), "123.456");
  /// ```
  pub fn unmarshal_json(&self, json: &str) -> Result<AbiValue, AbiErr> {
    log::trace!("Reading {} from JSON {:?}", self, json);
    let json = json.trim();
    let kind = self.kind();
    match &self.0 {
      Repr::Uint { bit_size } => {
        let n = parse_uint(json)?;
        Ok(AbiValue::Uint(check_bits(n, *bit_size)?))
      },
      Repr::Ufixed {
        bit_size,
        precision,
      } => {
        let n = parse_decimal(json, *precision)?;
        Ok(AbiValue::Uint(check_bits(n, *bit_size)?))
      },
      Repr::Bool => serde_json::from_str::<bool>(json)
        .map(AbiValue::Bool)
        .map_err(|e| json_err(e, kind)),
      Repr::Byte => serde_json::from_str::<u8>(json)
        .map(AbiValue::Byte)
        .map_err(|e| json_err(e, kind)),
      Repr::Address => {
        let text = serde_json::from_str::<String>(json)
          .map_err(|e| json_err(e, kind))?;
        Ok(AbiValue::Address(text_to_address(&text)?))
      },
      Repr::StaticArray { elem, len } => {
        let items = unmarshal_array(elem, json, kind)?;
        check_count(*len as usize, items.len())?;
        Ok(AbiValue::Sequence(items))
      },
      Repr::DynamicArray { elem } => {
        Ok(AbiValue::Sequence(unmarshal_array(elem, json, kind)?))
      },
      Repr::String => {
        if json.starts_with('"') {
          let text = serde_json::from_str::<String>(json)
            .map_err(|e| json_err(e, kind))?;
          Ok(AbiValue::Text(text))
        } else if json.starts_with('[') {
          let bytes = serde_json::from_str::<Vec<u8>>(json)
            .map_err(|e| json_err(e, kind))?;
          Ok(AbiValue::Text(String::from_utf8(bytes)?))
        } else {
          Err(err!(debug, AbiErr::JsonShape { expected: kind }))
        }
      },
      Repr::Tuple { children } => {
        let elems = json_elements(json, kind)?;
        check_count(children.len(), elems.len())?;
        children
          .iter()
          .zip(elems)
          .map(|(child, elem)| child.unmarshal_json(elem.get()))
          .collect::<Result<Vec<_>, _>>()
          .map(AbiValue::Sequence)
      },
    }
  }

  fn uint_value(&self, value: &AbiValue, bit_size: u16) -> Result<BigUint, AbiErr> {
    let n = value.as_uint().ok_or_else(|| self.value_mismatch())?;
    check_bits(n.clone(), bit_size)
  }

  fn value_mismatch(&self) -> AbiErr {
    err!(debug, AbiErr::ValueKindMismatch {
      expected: self.kind(),
    })
  }
}

fn marshal_array(elem: &AbiType, items: &[AbiValue]) -> Result<String, AbiErr> {
  if matches!(elem.0, Repr::Byte) {
    let bytes = items
      .iter()
      .map(AbiValue::as_byte)
      .collect::<Option<Vec<u8>>>()
      .ok_or_else(|| elem.value_mismatch())?;
    return Ok(serde_json::to_string(&STANDARD.encode(bytes))?);
  }
  let parts = items
    .iter()
    .map(|item| elem.marshal_json(item))
    .collect::<Result<Vec<_>, _>>()?;
  json_array(parts)
}

fn unmarshal_array(
  elem: &AbiType,
  json: &str,
  kind: TypeKind,
) -> Result<Vec<AbiValue>, AbiErr> {
  if matches!(elem.0, Repr::Byte) && json.starts_with('"') {
    let encoded =
      serde_json::from_str::<String>(json).map_err(|e| json_err(e, kind))?;
    let bytes = STANDARD
      .decode(encoded)
      .log_err(log::Level::Debug)
      .map_err(|_| AbiErr::Base64)?;
    return Ok(bytes.into_iter().map(AbiValue::Byte).collect());
  }
  json_elements(json, kind)?
    .into_iter()
    .map(|item| elem.unmarshal_json(item.get()))
    .collect()
}

/// Splits a JSON array into the text of its elements.
fn json_elements(json: &str, kind: TypeKind) -> Result<Vec<&RawValue>, AbiErr> {
  serde_json::from_str::<Vec<&RawValue>>(json).map_err(|e| json_err(e, kind))
}

/// Joins marshalled elements into a JSON array.
fn json_array(parts: Vec<String>) -> Result<String, AbiErr> {
  let items = parts
    .into_iter()
    .map(RawValue::from_string)
    .collect::<Result<Vec<Box<RawValue>>, _>>()?;
  Ok(serde_json::to_string(&items)?)
}

fn json_err(error: serde_json::Error, expected: TypeKind) -> AbiErr {
  log::debug!("JSON for {:?}: {}", expected, error);
  match error.classify() {
    Category::Data => err!(debug, AbiErr::JsonShape { expected }),
    _ => err!(debug, AbiErr::JsonSyntax),
  }
}

fn check_count(expected: usize, observed: usize) -> Result<(), AbiErr> {
  ensure!(
    expected == observed,
    debug,
    AbiErr::ValueLenMismatch { expected, observed }
  );
  Ok(())
}

fn check_bits(n: BigUint, bit_size: u16) -> Result<BigUint, AbiErr> {
  ensure!(
    n.bits() <= bit_size as u64,
    debug,
    AbiErr::UintOverflow { bit_size }
  );
  Ok(n)
}

/// Formats `n / 10^precision` with exactly `precision` fraction digits.
fn fixed_point(n: &BigUint, precision: usize) -> String {
  let digits = n.to_string();
  let mut text = String::with_capacity(digits.len().max(precision + 1) + 1);
  for _ in digits.len()..precision + 1 {
    text.push('0');
  }
  text.push_str(&digits);
  text.insert(text.len() - precision, '.');
  text
}

/// Splits an optional leading sign from a number.
fn split_sign(text: &str) -> (bool, &str) {
  if let Some(rest) = text.strip_prefix('-') {
    (true, rest)
  } else {
    (false, text.strip_prefix('+').unwrap_or(text))
  }
}

fn parse_digits(digits: &str) -> Option<BigUint> {
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  BigUint::parse_bytes(digits.as_bytes(), 10)
}

fn parse_uint(text: &str) -> Result<BigUint, AbiErr> {
  let (negative, digits) = split_sign(text);
  let n = parse_digits(digits).ok_or_else(|| {
    err!(debug, AbiErr::JsonShape {
      expected: TypeKind::Uint,
    })
  })?;
  ensure!(!negative || n.is_zero(), debug, AbiErr::NegativeValue);
  Ok(n)
}

/// Parses a decimal (`12.5`, `1.25e1`) or a fraction (`25/2`), scaled by
/// `10^precision`.
fn parse_decimal(text: &str, precision: u16) -> Result<BigUint, AbiErr> {
  let shape = || {
    err!(debug, AbiErr::JsonShape {
      expected: TypeKind::Ufixed,
    })
  };
  let ten = BigUint::from(10u8);
  let (negative, text) = split_sign(text);

  let (numer, denom) = if let Some((numer, denom)) = text.split_once('/') {
    (
      parse_digits(numer).ok_or_else(shape)?,
      parse_digits(denom).ok_or_else(shape)?,
    )
  } else {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
      Some(i) => {
        let exponent = text[i + 1..].parse::<i16>().map_err(|_| shape())?;
        (&text[..i], exponent as i32)
      },
      None => (text, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    ensure!(
      !(whole.is_empty() && fraction.is_empty()),
      debug,
      AbiErr::JsonShape {
        expected: TypeKind::Ufixed,
      }
    );
    let mut digits = String::with_capacity(whole.len() + fraction.len());
    digits.push_str(whole);
    digits.push_str(fraction);
    let digits = parse_digits(&digits).ok_or_else(shape)?;
    let scale = exponent - fraction.len() as i32;
    if scale >= 0 {
      (digits * ten.pow(scale as u32), BigUint::from(1u8))
    } else {
      (digits, ten.pow(scale.unsigned_abs()))
    }
  };
  ensure!(!denom.is_zero(), debug, AbiErr::JsonShape {
    expected: TypeKind::Ufixed,
  });

  let scaled = numer * ten.pow(precision as u32);
  ensure!((&scaled % &denom).is_zero(), debug, AbiErr::UfixedInexact);
  let n = scaled / denom;
  ensure!(!negative || n.is_zero(), debug, AbiErr::NegativeValue);
  Ok(n)
}
