//! Bounds-checked little-endian reads over the source buffer

use byteorder::{ByteOrder, LE};

use crate::{Error, Result};

/// Borrow `len` bytes at `offset`, failing if the range leaves the buffer
#[inline]
pub fn slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(Error::OutOfBounds {
            offset,
            len,
            buffer_len: data.len(),
        })
}

#[inline]
pub fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    slice(data, offset, 4).map(LE::read_u32)
}

#[inline]
pub fn read_i32(data: &[u8], offset: usize) -> Result<i32> {
    slice(data, offset, 4).map(LE::read_i32)
}

/// Read a u32 that is used as a length or count
#[inline]
pub fn read_len(data: &[u8], offset: usize) -> Result<usize> {
    read_u32(data, offset).map(|v| v as usize)
}

/// Borrow `[start, end)` clamped to the buffer; inverted ranges are empty
#[inline]
pub fn clamped(data: &[u8], start: usize, end: usize) -> &[u8] {
    let end = end.min(data.len());
    &data[start.min(end)..end]
}

/// Decode a packed run of LE int32 values; trailing partial words are ignored
pub fn i32_values(bytes: &[u8]) -> Vec<i32> {
    bytes.chunks_exact(4).map(LE::read_i32).collect()
}

/// Decode a packed run of LE float32 values; trailing partial words are ignored
pub fn f32_values(bytes: &[u8]) -> Vec<f32> {
    bytes.chunks_exact(4).map(LE::read_f32).collect()
}

/// Decode `(u32, u32)` pairs, as used by every index table in the format
pub fn u32_pairs(data: &[u8], offset: usize, count: usize) -> Result<Vec<(u32, u32)>> {
    let len = count.checked_mul(8).ok_or(Error::OutOfBounds {
        offset,
        len: usize::MAX,
        buffer_len: data.len(),
    })?;
    let table = slice(data, offset, len)?;
    Ok(table
        .chunks_exact(8)
        .map(|pair| (LE::read_u32(&pair[..4]), LE::read_u32(&pair[4..])))
        .collect())
}

/// Length-prefixed byte pattern (`u32 LE length` followed by the text)
pub fn length_prefixed(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + text.len());
    out.extend_from_slice(&(text.len() as u32).to_le_bytes());
    out.extend_from_slice(text.as_bytes());
    out
}
