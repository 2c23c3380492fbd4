//! The head/tail layout of tuples.
//!
//! Each child of a tuple contributes a head and possibly a tail:
//!
//! - Static children are written in place, as their head.
//! - Dynamic children have a 2-byte head holding the offset of their tail,
//!   measured from the start of the tuple.  Tails follow all the heads, in
//!   the order of their children.
//! - Runs of consecutive `bool` children are packed into chunks of up to 8,
//!   one byte per chunk, the first `bool` in the most significant bit.
//!
//! ```text
//! (uint8,string,bool,bool)  with  (5, "hi", true, true)
//!
//!  05 | 00 04 | C0 | 00 02 68 69
//!  u8 | offset| 2x bool | tail of "hi"
//! ```
use super::BOOL_TRUE;
use crate::{
  types::{bool_run_after, bool_run_before},
  util::{checked_u16, read_bytes, read_u16_be},
  AbiErr, AbiType, AbiValue, LENGTH_PREFIX_LEN,
};
use alloc::vec::Vec;
use smallvec::SmallVec;

/// The most bools packed into one byte.
const BOOL_CHUNK_LEN: usize = 8;

/// Returns the number of bools in the chunk starting at `children[index]`.
///
/// A chunk must start at a multiple of 8 into its run of bools.
fn bool_chunk_len(children: &[AbiType], index: usize) -> Result<usize, AbiErr> {
  let before = bool_run_before(children, index);
  ensure!(
    before % BOOL_CHUNK_LEN == 0,
    debug,
    AbiErr::BoolChunkMisaligned(index)
  );
  Ok(bool_run_after(children, index).min(BOOL_CHUNK_LEN - 1) + 1)
}

fn pack_bools(values: &[AbiValue]) -> Result<u8, AbiErr> {
  let mut packed = 0u8;
  for (i, value) in values.iter().enumerate() {
    match value {
      AbiValue::Bool(true) => packed |= BOOL_TRUE >> i,
      AbiValue::Bool(false) => {},
      _ => {
        return Err(err!(debug, AbiErr::ValueKindMismatch {
          expected: crate::TypeKind::Bool,
        }))
      },
    }
  }
  Ok(packed)
}

pub(crate) fn encode_tuple(
  children: &[AbiType],
  values: &[AbiValue],
) -> Result<Vec<u8>, AbiErr> {
  ensure!(
    values.len() == children.len(),
    debug,
    AbiErr::ValueLenMismatch {
      expected: children.len(),
      observed: values.len(),
    }
  );

  let mut heads = Vec::new();
  let mut tails = Vec::new();
  // (placeholder position in `heads`, tail position in `tails`)
  let mut dynamics: SmallVec<(usize, usize), 8> = SmallVec::new();

  let mut index = 0;
  while index < children.len() {
    let child = &children[index];
    if child.is_dynamic() {
      dynamics.push((heads.len(), tails.len()));
      heads.extend_from_slice(&[0; LENGTH_PREFIX_LEN]);
      tails.extend(child.encode_value(&values[index])?);
    } else if child.is_bool() {
      let chunk = bool_chunk_len(children, index)?;
      heads.push(pack_bools(&values[index..index + chunk])?);
      index += chunk - 1;
    } else {
      heads.extend(child.encode_value(&values[index])?);
    }
    index += 1;
  }

  let head_len = heads.len();
  for (placeholder, tail) in dynamics {
    let offset = checked_u16(head_len + tail)?;
    heads[placeholder..placeholder + LENGTH_PREFIX_LEN]
      .copy_from_slice(&offset.to_be_bytes());
  }
  heads.extend(tails);
  Ok(heads)
}

pub(crate) fn decode_tuple(
  children: &[AbiType],
  encoded: &[u8],
) -> Result<Vec<AbiValue>, AbiErr> {
  // Dynamic children are `None` until their tails are located.
  let mut values: Vec<Option<AbiValue>> = Vec::with_capacity(children.len());
  let mut offsets: SmallVec<usize, 8> = SmallVec::new();
  let cursor = &mut 0;

  let mut index = 0;
  while index < children.len() {
    let child = &children[index];
    if child.is_dynamic() {
      offsets.push(read_u16_be(encoded, cursor)? as usize);
      values.push(None);
    } else if child.is_bool() {
      let chunk = bool_chunk_len(children, index)?;
      let packed = read_bytes(encoded, cursor, 1)?[0];
      for i in 0..chunk {
        values.push(Some(AbiValue::Bool(packed & (BOOL_TRUE >> i) != 0)));
      }
      index += chunk - 1;
    } else {
      let bytes = read_bytes(encoded, cursor, child.byte_len()?)?;
      values.push(Some(child.decode_value(bytes)?));
    }
    index += 1;
  }

  let head_len = *cursor;
  if offsets.is_empty() {
    ensure!(
      head_len == encoded.len(),
      debug,
      AbiErr::TrailingBytes {
        consumed: head_len,
        length:   encoded.len(),
      }
    );
    return Ok(values.into_iter().flatten().collect());
  }

  ensure!(
    offsets[0] == head_len,
    debug,
    AbiErr::HeadOffsetMismatch {
      expected: head_len,
      observed: offsets[0],
    }
  );
  offsets.push(encoded.len());
  ensure!(
    offsets.windows(2).all(|pair| pair[0] <= pair[1]),
    debug,
    AbiErr::OffsetsNotMonotonic
  );

  let mut tails = offsets.windows(2);
  for (child, value) in children.iter().zip(values.iter_mut()) {
    if value.is_none() {
      let bounds = tails
        .next()
        .ok_or_else(|| err!(error, AbiErr::OffsetsNotMonotonic))?;
      *value = Some(child.decode_value(&encoded[bounds[0]..bounds[1]])?);
    }
  }
  Ok(values.into_iter().flatten().collect())
}
