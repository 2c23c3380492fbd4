//! ARC-4 style ABI types for values exchanged with a contract runtime.
//!
//! An [`AbiType`] is parsed from a signature string (e.g., `(uint64,byte[])`)
//! and then used to move [`AbiValue`]s between three forms:
//!
//! - native values ([`AbiValue`]),
//! - the packed big-endian head/tail byte encoding ([`AbiType::encode`] and
//!   [`AbiType::decode`]), and
//! - canonical JSON text ([`AbiType::marshal_json`] and
//!   [`AbiType::unmarshal_json`]).
//!
//! ```
//! use avm_abi::{AbiType, AbiValue};
//!
//! let abi_type: AbiType = "(uint8,string)".parse().unwrap();
//! let value = AbiValue::from(vec![AbiValue::from(5u64), "hi".into()]);
//! let encoded = abi_type.encode(&value).unwrap();
//! // head: `05` and the offset `0003`; tail: length `0002` then "hi".
//! assert_eq!(encoded, [0x05, 0x00, 0x03, 0x00, 0x02, 0x68, 0x69]);
//! assert_eq!(abi_type.decode(&encoded).unwrap(), value);
//! ```
#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

/// Internal Macros
#[macro_use]
mod macros;

mod abi;
pub mod apps;
pub mod codec;
pub mod crypto;
pub mod json;
pub mod types;
mod util;
pub mod value;

pub use self::{
  abi::*,
  crypto::address::{
    address_checksum, address_to_text, text_to_address, Address,
  },
  types::{
    method::{
      is_reference_type, is_transaction_type, parse_method_signature,
      verify_method_signature, MethodSignature,
    },
    AbiType, TypeKind,
  },
  value::{AbiValue, NarrowUint},
};
