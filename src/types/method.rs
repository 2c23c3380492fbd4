//! Method signatures, `name(arg0,...,argk)returns`.
//!
//! Arguments may name an ABI type, a reference type, or a transaction type;
//! the latter two are only recognized by keyword, their values being opaque
//! to this crate.
use super::{split_tuple_content, AbiType};
use crate::AbiErr;
use alloc::vec::Vec;

/// The return type of a method that does not return a value.
pub const VOID: &str = "void";

/// Reference argument types.
pub const REFERENCE_TYPES: [&str; 3] = ["account", "asset", "application"];

/// Transaction argument types.  `txn` accepts any kind of transaction.
pub const TRANSACTION_TYPES: [&str; 7] =
  ["txn", "pay", "keyreg", "acfg", "axfer", "afrz", "appl"];

/// A method signature split into its parts.
///
/// The parts borrow from the signature and are not checked to be types; see
/// [`verify_method_signature`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSignature<'a> {
  pub name:    &'a str,
  pub args:    Vec<&'a str>,
  pub returns: &'a str,
}

/// Returns `true` iff `s` is `account`, `asset` or `application`.
pub fn is_reference_type(s: &str) -> bool {
  REFERENCE_TYPES.contains(&s)
}

/// Returns `true` iff `s` is one of the transaction argument types, e.g.
/// `pay` or `txn`.
pub fn is_transaction_type(s: &str) -> bool {
  TRANSACTION_TYPES.contains(&s)
}

/// Splits a method signature into its name, argument types, and return type.
///
/// ```
/// use avm_abi::parse_method_signature;
///
/// let m = parse_method_signature("add(uint64,(bool,byte)[2])uint128").unwrap();
/// assert_eq!(m.name, "add");
/// assert_eq!(m.args, ["uint64", "(bool,byte)[2]"]);
/// assert_eq!(m.returns, "uint128");
/// ```
pub fn parse_method_signature(
  signature: &str,
) -> Result<MethodSignature<'_>, AbiErr> {
  log::trace!("Parsing method signature {:?}", signature);
  let args_start = signature
    .find('(')
    .ok_or_else(|| err!(debug, AbiErr::MethodNoParen))?;
  ensure!(args_start != 0, debug, AbiErr::MethodNoName);

  let mut depth = 0usize;
  let mut args_end = None;
  for (index, b) in signature.bytes().enumerate() {
    match b {
      b'(' => depth += 1,
      b')' => {
        depth = depth
          .checked_sub(1)
          .ok_or_else(|| err!(debug, AbiErr::MethodParenUnpaired))?;
        if depth == 0 {
          args_end = Some(index);
          break;
        }
      },
      _ => {},
    }
  }
  let args_end = args_end.ok_or_else(|| err!(debug, AbiErr::MethodParenUnpaired))?;

  Ok(MethodSignature {
    name:    &signature[..args_start],
    args:    split_tuple_content(&signature[args_start + 1..args_end])?,
    returns: &signature[args_end + 1..],
  })
}

/// Checks that every argument of a method signature is a reference type, a
/// transaction type, or an ABI type, and that it returns `void` or an ABI
/// type.
///
/// ```
/// use avm_abi::{verify_method_signature, AbiErr};
///
/// assert!(verify_method_signature("pay(pay,account,uint64)void").is_ok());
/// assert_eq!(
///   verify_method_signature("f(uint64,uint7)void"),
///   Err(AbiErr::MethodArgType(1))
/// );
/// ```
pub fn verify_method_signature(signature: &str) -> Result<(), AbiErr> {
  let method = parse_method_signature(signature)?;
  for (index, arg) in method.args.iter().enumerate() {
    if is_reference_type(arg) || is_transaction_type(arg) {
      continue;
    }
    AbiType::parse(arg).map_err(|_| err!(debug, AbiErr::MethodArgType(index)))?;
  }
  if method.returns != VOID {
    AbiType::parse(method.returns)
      .map_err(|_| err!(debug, AbiErr::MethodReturnType))?;
  }
  Ok(())
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::util::init_test_logger;
  use std::dbg;

  #[test]
  fn split_signatures() -> Result<(), AbiErr> {
    init_test_logger();
    let m = parse_method_signature("add(uint64,uint64)uint128")?;
    assert_eq!(m.name, "add");
    assert_eq!(m.args, ["uint64", "uint64"]);
    assert_eq!(m.returns, "uint128");

    let m = parse_method_signature("tupler((string,uint16),bool)void")?;
    assert_eq!(m.args, ["(string,uint16)", "bool"]);
    assert_eq!(m.returns, VOID);

    let m = parse_method_signature("complex(((uint8)[],txn),pay)(bool,byte)[]")?;
    dbg!(&m);
    assert_eq!(m.name, "complex");
    assert_eq!(m.args, ["((uint8)[],txn)", "pay"]);
    assert_eq!(m.returns, "(bool,byte)[]");

    let m = parse_method_signature("empty()void")?;
    assert!(m.args.is_empty());

    // The return type is not checked here.
    let m = parse_method_signature("f(byte)")?;
    assert_eq!(m.returns, "");
    Ok(())
  }

  #[test]
  fn malformed_signatures() {
    init_test_logger();
    assert_eq!(
      parse_method_signature("nothing"),
      Err(AbiErr::MethodNoParen)
    );
    assert_eq!(
      parse_method_signature("(uint8)void"),
      Err(AbiErr::MethodNoName)
    );
    assert_eq!(
      parse_method_signature("f(uint8,(bool)void"),
      Err(AbiErr::MethodParenUnpaired)
    );
    assert_eq!(
      parse_method_signature("f)(uint8)void"),
      Err(AbiErr::MethodParenUnpaired)
    );
    assert_eq!(
      parse_method_signature("f(uint8,,bool)void"),
      Err(AbiErr::TupleComma)
    );
  }

  #[test]
  fn keyword_sets() {
    for keyword in ["account", "asset", "application"] {
      assert!(is_reference_type(keyword));
      assert!(!is_transaction_type(keyword));
    }
    for keyword in ["txn", "pay", "keyreg", "acfg", "axfer", "afrz", "appl"] {
      assert!(is_transaction_type(keyword));
      assert!(!is_reference_type(keyword));
    }
    assert!(!is_reference_type("Account"));
    assert!(!is_transaction_type("uint64"));
    assert!(!is_transaction_type(VOID));
  }

  #[test]
  fn verify_signatures() {
    init_test_logger();
    assert_eq!(
      verify_method_signature("optIn(account,asset,application)void"),
      Ok(())
    );
    assert_eq!(
      verify_method_signature("swap(axfer,appl,(uint64,address)[])uint64"),
      Ok(())
    );
    assert_eq!(
      verify_method_signature("f(account,blah)void"),
      Err(AbiErr::MethodArgType(1))
    );
    assert_eq!(
      verify_method_signature("f(uint64)pay"),
      Err(AbiErr::MethodReturnType)
    );
    assert_eq!(
      verify_method_signature("f(uint64)"),
      Err(AbiErr::MethodReturnType)
    );
    assert_eq!(
      verify_method_signature("f(uint64"),
      Err(AbiErr::MethodParenUnpaired)
    );
  }
}
