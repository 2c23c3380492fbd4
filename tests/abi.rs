use avm_abi::{
  apps::{make_box_key, split_box_key, AppCallBytes},
  parse_method_signature, text_to_address, verify_method_signature, AbiErr,
  AbiType, AbiValue, Address, NarrowUint,
};

#[test]
fn parse_and_print() -> Result<(), AbiErr> {
  let t = AbiType::parse("(uint64,byte[])")?;
  dbg!(&t);
  assert_eq!(
    t,
    AbiType::tuple(vec![
      AbiType::uint(64)?,
      AbiType::dynamic_array(AbiType::byte())
    ])?
  );
  assert_eq!(t.to_string(), "(uint64,byte[])");

  assert_eq!(AbiType::parse("uint7"), Err(AbiErr::UintBitSize(7)));
  assert!(AbiType::parse("ufixed64x0").is_err());
  Ok(())
}

#[test]
fn head_and_tail() -> Result<(), AbiErr> {
  let t = AbiType::parse("(uint8,string)")?;
  let value = AbiValue::from(vec![5u64.into(), "hi".into()]);
  let encoded = t.encode(&value)?;
  assert_eq!(encoded, [0x05, 0x00, 0x03, 0x00, 0x02, 0x68, 0x69]);
  let decoded = t.decode(&encoded)?;
  dbg!(&decoded);
  assert_eq!(decoded, value);
  assert_eq!(t.marshal_json(&decoded)?, r#"[5,"hi"]"#);
  Ok(())
}

#[test]
fn packed_bools() -> Result<(), AbiErr> {
  let t = AbiType::parse("bool[3]")?;
  let value = t.unmarshal_json("[true, false, true]")?;
  let expected = [true, false, true].into_iter().map(AbiValue::from);
  assert_eq!(value, expected.collect::<AbiValue>());
  assert_eq!(t.encode(&value)?, [0xA0]);
  assert_eq!(t.decode(&[0xA0])?, value);
  Ok(())
}

#[test]
fn fixed_point_json() -> Result<(), AbiErr> {
  let t = AbiType::parse("ufixed64x3")?;
  let value = t.unmarshal_json("123.456")?;
  assert_eq!(value, AbiValue::from(123_456u64));
  assert_eq!(t.marshal_json(&value)?, "123.456");
  assert_eq!(value.narrow(&t)?, NarrowUint::U64(123_456));
  Ok(())
}

#[test]
fn address_checksums() -> Result<(), AbiErr> {
  let text = "OXV2VEY7QJUXGOHEVFSL7LTBMOTYI4VORBJ37CGCHKBPJSH6IZQMHDPFRA";
  let address: Address = text.parse()?;
  assert_eq!(address.to_string(), text);
  let flipped = "PXV2VEY7QJUXGOHEVFSL7LTBMOTYI4VORBJ37CGCHKBPJSH6IZQMHDPFRA";
  assert_eq!(
    text_to_address(flipped),
    Err(AbiErr::AddressChecksumMismatch)
  );

  let t = AbiType::address();
  let json = t.marshal_json(&address.into())?;
  assert_eq!(json, format!("\"{}\"", text));
  assert_eq!(t.unmarshal_json(&json)?, AbiValue::Address(address.0));
  Ok(())
}

#[test]
fn method_signatures() -> Result<(), AbiErr> {
  let signature = "add((uint64,string),pay,account)uint128";
  let method = parse_method_signature(signature)?;
  dbg!(&method);
  assert_eq!(method.name, "add");
  assert_eq!(method.args, ["(uint64,string)", "pay", "account"]);
  assert_eq!(method.returns, "uint128");
  verify_method_signature(signature)?;
  assert_eq!(
    verify_method_signature("add(uint7)void"),
    Err(AbiErr::MethodArgType(0))
  );
  Ok(())
}

#[test]
fn app_arguments() -> Result<(), AbiErr> {
  let arg = AppCallBytes::new(r#"abi:(uint8,string):[5,"hi"]"#)?;
  assert_eq!(arg.raw()?, [0x05, 0x00, 0x03, 0x00, 0x02, 0x68, 0x69]);
  assert_eq!(AppCallBytes::new("int:1")?.raw()?, 1u64.to_be_bytes());

  let key = make_box_key(7, b"votes");
  assert_eq!(split_box_key(&key)?, (7, &b"votes"[..]));
  Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn serde_signatures() {
  use serde_derive::{Deserialize, Serialize};

  #[derive(Debug, PartialEq, Serialize, Deserialize)]
  struct Arg {
    name:     String,
    abi_type: AbiType,
  }

  let arg = Arg {
    name:     "payees".into(),
    abi_type: AbiType::parse("address[]").unwrap(),
  };
  let json = serde_json::to_string(&arg).unwrap();
  assert_eq!(json, r#"{"name":"payees","abi_type":"address[]"}"#);
  assert_eq!(serde_json::from_str::<Arg>(&json).unwrap(), arg);
  assert!(serde_json::from_str::<Arg>(
    r#"{"name":"payees","abi_type":"address[-1]"}"#
  )
  .is_err());
}
