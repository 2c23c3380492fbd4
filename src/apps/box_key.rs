use crate::AbiErr;
use alloc::vec::Vec;

/// The prefix of every box key.
pub const BOX_PREFIX: &[u8; 3] = b"bx:";

/// Where the box name starts in a key: after the prefix and the 8-byte
/// application id.
pub const BOX_NAME_INDEX: usize = BOX_PREFIX.len() + 8;

/// Makes the storage key of the box `name` owned by application `app_id`.
///
/// Keys of one application share a prefix, so its boxes sort together.
///
/// ```
/// use avm_abi::apps::make_box_key;
///
/// assert_eq!(make_box_key(42, b"name"), b"bx:\0\0\0\0\0\0\0*name");
/// ```
pub fn make_box_key(app_id: u64, name: &[u8]) -> Vec<u8> {
  let mut key = Vec::with_capacity(BOX_NAME_INDEX + name.len());
  key.extend_from_slice(BOX_PREFIX);
  key.extend_from_slice(&app_id.to_be_bytes());
  key.extend_from_slice(name);
  key
}

/// Splits a key made by [`make_box_key`] into the application id and box
/// name.
pub fn split_box_key(key: &[u8]) -> Result<(u64, &[u8]), AbiErr> {
  ensure!(
    key.len() >= BOX_NAME_INDEX,
    debug,
    AbiErr::BoxKeyTooShort(key.len())
  );
  ensure!(key.starts_with(BOX_PREFIX), debug, AbiErr::BoxKeyPrefix);
  let mut app_id = [0u8; 8];
  app_id.copy_from_slice(&key[BOX_PREFIX.len()..BOX_NAME_INDEX]);
  Ok((u64::from_be_bytes(app_id), &key[BOX_NAME_INDEX..]))
}
