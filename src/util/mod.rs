//! Misc non-public utility code for the crate itself.
pub(crate) mod debug;
mod log;


pub(crate) use self::log::*;
#[cfg(test)]
pub(crate) use self::test::*;
use crate::AbiErr;

/// Reads `len` bytes at `cursor`, advancing it past them.
///
/// ```ignore
/// let cursor = &mut 1usize;
/// let bytes = read_bytes(&[1, 2, 3, 4], cursor, 2)?;
/// assert_eq!(bytes, &[2, 3]);
/// assert_eq!(*cursor, 3);
/// ```
#[inline]
pub(crate) fn read_bytes<'a>(
  source: &'a [u8],
  cursor: &mut usize,
  len: usize,
) -> Result<&'a [u8], AbiErr> {
  let end = cursor.saturating_add(len);
  let bytes = source.get(*cursor..end).ok_or_log(
    ::log::Level::Debug,
    AbiErr::OutOfBounds {
      index:  end,
      length: source.len(),
    },
  )?;
  *cursor = end;
  Ok(bytes)
}

/// Reads a big-endian `u16` length or offset at `cursor`, advancing it.
#[inline]
pub(crate) fn read_u16_be(
  source: &[u8],
  cursor: &mut usize,
) -> Result<u16, AbiErr> {
  let bytes = read_bytes(source, cursor, 2)?;
  Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Converts a length or offset to the 16-bit form used in encodings.
#[inline]
pub(crate) fn checked_u16(len: usize) -> Result<u16, AbiErr> {
  u16::try_from(len).map_err(|_| err!(debug, AbiErr::LengthOverflow(len)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cursor_reads() -> Result<(), AbiErr> {
    let source = [0x01, 0x02, 0x03, 0x04];
    let cursor = &mut 1;
    assert_eq!(read_bytes(&source, cursor, 2)?, &[0x02, 0x03]);
    assert_eq!(*cursor, 3);
    assert_eq!(
      read_u16_be(&source, cursor),
      Err(AbiErr::OutOfBounds {
        index:  5,
        length: 4,
      })
    );
    // Failed reads leave the cursor alone.
    assert_eq!(*cursor, 3);
    assert_eq!(read_u16_be(&source, &mut 0)?, 0x0102);
    assert_eq!(checked_u16(65_535)?, u16::MAX);
    assert_eq!(checked_u16(65_536), Err(AbiErr::LengthOverflow(65_536)));
    Ok(())
  }
}
