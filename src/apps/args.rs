use crate::{
  crypto::address::text_to_address,
  util::LogErr,
  AbiErr, AbiType,
};
use alloc::{string::String, vec::Vec};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use data_encoding::BASE32;

/// An application call argument given on a command line as
/// `<encoding>:<value>`.
///
/// | Encoding                          | Value                                 |
/// |-----------------------------------|---------------------------------------|
/// | `str`, `string`                   | text, used as its UTF-8 bytes         |
/// | `int`, `integer`                  | a `u64`, as 8 big-endian bytes        |
/// | `addr`, `address`                 | an address, as its 32 bytes           |
/// | `b32`, `base32`, `byte base32`    | padded base32                         |
/// | `b64`, `base64`, `byte base64`    | padded base64                         |
/// | `abi`                             | `<type>:<JSON>`, encoded as the type  |
///
/// ```
/// use avm_abi::apps::AppCallBytes;
///
/// let arg = AppCallBytes::new("int:258").unwrap();
/// assert_eq!(arg.raw().unwrap(), [0, 0, 0, 0, 0, 0, 1, 2]);
/// let arg = AppCallBytes::new("abi:(uint8,bool):[7,true]").unwrap();
/// assert_eq!(arg.raw().unwrap(), [7, 0x80]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AppCallBytes {
  encoding: String,
  value:    String,
}

impl AppCallBytes {
  /// Splits `arg` at its first `:`.
  pub fn new(arg: &str) -> Result<AppCallBytes, AbiErr> {
    let (encoding, value) = arg
      .split_once(':')
      .ok_or_else(|| err!(debug, AbiErr::ArgNoEncoding))?;
    Ok(AppCallBytes {
      encoding: encoding.into(),
      value:    value.into(),
    })
  }

  pub fn encoding(&self) -> &str {
    &self.encoding
  }

  pub fn value(&self) -> &str {
    &self.value
  }

  /// Converts the value to the bytes passed to the application.
  pub fn raw(&self) -> Result<Vec<u8>, AbiErr> {
    log::trace!("Converting {:?} argument {:?}", self.encoding, self.value);
    match self.encoding.as_str() {
      "str" | "string" => Ok(self.value.as_bytes().to_vec()),
      "int" | "integer" => {
        let n = self
          .value
          .parse::<u64>()
          .log_err(log::Level::Debug)
          .map_err(|_| AbiErr::ArgInteger)?;
        Ok(n.to_be_bytes().to_vec())
      },
      "addr" | "address" => Ok(text_to_address(&self.value)?.to_vec()),
      "b32" | "base32" | "byte base32" => BASE32
        .decode(self.value.as_bytes())
        .log_err(log::Level::Debug)
        .map_err(|_| AbiErr::ArgBytes),
      "b64" | "base64" | "byte base64" => STANDARD
        .decode(&self.value)
        .log_err(log::Level::Debug)
        .map_err(|_| AbiErr::ArgBytes),
      "abi" => {
        // Type signatures never contain `:`.
        let (signature, json) = self
          .value
          .split_once(':')
          .ok_or_else(|| err!(debug, AbiErr::ArgNoEncoding))?;
        let abi_type = AbiType::parse(signature)?;
        abi_type.encode(&abi_type.unmarshal_json(json)?)
      },
      _ => Err(err!(debug, AbiErr::UnknownArgEncoding)),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::util::init_test_logger;
  use std::format;

  fn raw(arg: &str) -> Result<Vec<u8>, AbiErr> {
    AppCallBytes::new(arg)?.raw()
  }

  #[test]
  fn malformed_arguments() {
    init_test_logger();
    assert_eq!(AppCallBytes::new("hello"), Err(AbiErr::ArgNoEncoding));
    assert_eq!(raw(":x"), Err(AbiErr::UnknownArgEncoding));
    assert_eq!(raw("bytes:x"), Err(AbiErr::UnknownArgEncoding));
    assert_eq!(raw("int:-1"), Err(AbiErr::ArgInteger));
    assert_eq!(raw("int:18446744073709551616"), Err(AbiErr::ArgInteger));
    assert_eq!(raw("b64:!!"), Err(AbiErr::ArgBytes));
    assert_eq!(raw("b32:NBSWY3DP"), Ok(b"hello".to_vec()));
    assert_eq!(raw("b32:nbswy3dp"), Err(AbiErr::ArgBytes));
    assert_eq!(raw("abi:uint8"), Err(AbiErr::ArgNoEncoding));
    assert_eq!(raw("abi:uint7:1"), Err(AbiErr::UintBitSize(7)));
    assert_eq!(raw("addr:AAAA"), Err(AbiErr::AddressLength(2)));
  }

  #[test]
  fn text_and_bytes() -> Result<(), AbiErr> {
    init_test_logger();
    for value in ["hello", "1:2"] {
      for encoding in ["str", "string"] {
        assert_eq!(raw(&format!("{}:{}", encoding, value))?, value.as_bytes());
      }
      let b32 = BASE32.encode(value.as_bytes());
      for encoding in ["b32", "base32", "byte base32"] {
        assert_eq!(raw(&format!("{}:{}", encoding, b32))?, value.as_bytes());
      }
      let b64 = STANDARD.encode(value);
      for encoding in ["b64", "base64", "byte base64"] {
        assert_eq!(raw(&format!("{}:{}", encoding, b64))?, value.as_bytes());
      }
    }
    Ok(())
  }

  #[test]
  fn integers() -> Result<(), AbiErr> {
    for n in [1u64, 0, u64::MAX] {
      for encoding in ["int", "integer"] {
        assert_eq!(raw(&format!("{}:{}", encoding, n))?, n.to_be_bytes());
      }
    }
    Ok(())
  }

  #[test]
  fn addresses() -> Result<(), AbiErr> {
    let text = "737777777777777777777777777777777777777777777777777UFEJ2CI";
    for encoding in ["addr", "address"] {
      assert_eq!(
        raw(&format!("{}:{}", encoding, text))?,
        text_to_address(text)?
      );
    }
    Ok(())
  }

  #[test]
  fn abi_values() -> Result<(), AbiErr> {
    let signature = "(uint64,string,bool[])";
    let arg = AppCallBytes::new(&format!(
      "abi:{}:{}",
      signature, r#"[399,"should pass",[true,false,false,true]]"#
    ))?;
    assert_eq!(arg.encoding(), "abi");
    let encoded = arg.raw()?;
    assert!(!encoded.is_empty());
    let abi_type = AbiType::parse(signature)?;
    assert_eq!(abi_type.encode(&abi_type.decode(&encoded)?)?, encoded);
    Ok(())
  }
}
