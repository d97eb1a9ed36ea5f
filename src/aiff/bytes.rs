//! Big-endian field accessors over raw byte offsets.
//!
//! Every access is bounds-checked and reports `BufferTooShort` instead of
//! panicking, so parsers can walk untrusted buffers without aliasing tricks.

use crate::error::{Error, Result};

/// Borrow `N` bytes starting at `offset`.
pub fn window<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    let end = offset.checked_add(N).ok_or(Error::BufferTooShort {
        offset,
        needed: N,
        len: buf.len(),
    })?;
    buf.get(offset..end)
        .and_then(|s| s.try_into().ok())
        .ok_or(Error::BufferTooShort {
            offset,
            needed: N,
            len: buf.len(),
        })
}

pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16> {
    window::<2>(buf, offset).map(u16::from_be_bytes)
}

pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32> {
    window::<4>(buf, offset).map(u32::from_be_bytes)
}

/// `ckSize` fields are declared signed by the format.
pub fn read_i32(buf: &[u8], offset: usize) -> Result<i32> {
    window::<4>(buf, offset).map(i32::from_be_bytes)
}

pub fn write_u32(buf: &mut [u8], offset: usize, value: u32) -> Result<()> {
    let len = buf.len();
    let slot = offset
        .checked_add(4)
        .and_then(|end| buf.get_mut(offset..end))
        .ok_or(Error::BufferTooShort {
            offset,
            needed: 4,
            len,
        })?;
    slot.copy_from_slice(&value.to_be_bytes());
    Ok(())
}
