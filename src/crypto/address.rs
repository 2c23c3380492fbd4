//! Account addresses and their checksummed base32 text form.
//!
//! The text form is the unpadded RFC 4648 base32 encoding of the 32 address
//! bytes followed by a 4-byte checksum, the last 4 bytes of the SHA-512/256
//! digest of the address.  It is always 58 characters long.
use crate::{util::debug::ShortHexDump, util::LogErr, AbiErr, ADDRESS_LEN, CHECKSUM_LEN};
use alloc::string::String;
use core::{
  fmt::{Debug, Display, Formatter},
  str::FromStr,
};
use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha512_256};

/// A 32-byte account address.
///
/// ```
/// use avm_abi::Address;
///
/// let text = "CAFFDSU6TYXNDC6V6R5XAOHBWBD4MH36TNUWCW4D6HKV7EKHP33Q74JAFM";
/// let address: Address = text.parse().unwrap();
/// assert_eq!(address.0[..4], [16, 10, 81, 202]);
/// assert_eq!(address.to_string(), text);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
  pub fn checksum(&self) -> [u8; CHECKSUM_LEN] {
    address_checksum(&self.0)
  }
}

impl From<[u8; ADDRESS_LEN]> for Address {
  fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
    Address(bytes)
  }
}

impl AsRef<[u8]> for Address {
  fn as_ref(&self) -> &[u8] {
    &self.0[..]
  }
}

impl Debug for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    write!(f, "Address({})", ShortHexDump(&self.0[..], 4))
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(&address_to_text(&self.0))
  }
}

impl FromStr for Address {
  type Err = AbiErr;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    text_to_address(s).map(Address)
  }
}

/// The last 4 bytes of the SHA-512/256 digest of `address`.
pub fn address_checksum(address: &[u8; ADDRESS_LEN]) -> [u8; CHECKSUM_LEN] {
  let digest = Sha512_256::digest(address);
  let mut checksum = [0u8; CHECKSUM_LEN];
  checksum.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
  checksum
}

/// Encodes an address and its checksum as base32 text.
pub fn address_to_text(address: &[u8; ADDRESS_LEN]) -> String {
  let mut bytes = [0u8; ADDRESS_LEN + CHECKSUM_LEN];
  bytes[..ADDRESS_LEN].copy_from_slice(address);
  bytes[ADDRESS_LEN..].copy_from_slice(&address_checksum(address));
  BASE32_NOPAD.encode(&bytes)
}

/// Decodes the base32 text of an address, verifying its checksum.
pub fn text_to_address(text: &str) -> Result<[u8; ADDRESS_LEN], AbiErr> {
  let decoded = BASE32_NOPAD
    .decode(text.as_bytes())
    .log_err(log::Level::Debug)
    .map_err(|_| AbiErr::AddressBase32)?;
  ensure!(
    decoded.len() == ADDRESS_LEN + CHECKSUM_LEN,
    debug,
    AbiErr::AddressLength(decoded.len())
  );
  let mut address = [0u8; ADDRESS_LEN];
  address.copy_from_slice(&decoded[..ADDRESS_LEN]);
  ensure!(
    address_checksum(&address) == decoded[ADDRESS_LEN..],
    debug,
    AbiErr::AddressChecksumMismatch
  );
  Ok(address)
}
