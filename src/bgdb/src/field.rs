//! Primitive field decoding
//!
//! A field is a named column stored at a fixed byte offset:
//!
//! ```text
//! field_off + 0       u32 name_length
//! field_off + 4       name bytes (ASCII)
//! data_region + 0     31-byte opaque header
//! data_region + 31    u32 data_size
//! data_region + 35    payload (data_size bytes)
//! ```
//!
//! where `data_region = field_off + 4 + name_length`.

use serde::Serialize;

use crate::bytes::{self, read_len};
use crate::Result;

/// Bytes of opaque header between the field name and the payload size
pub const HEADER_LEN: usize = 31;

/// Offset of the payload relative to the data region
pub const PAYLOAD_SHIFT: usize = HEADER_LEN + 4;

/// Gap between the end of one payload and the next field's name prefix
pub const FIELD_GAP: usize = 22;

/// Decoded field header (zero-copy view into the source buffer)
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    /// Offset of the name-length prefix
    pub offset: usize,
    /// Raw field name bytes
    pub name_bytes: &'a [u8],
    /// Start of the 31-byte header
    pub data_start: usize,
    /// Payload size declared in the header
    pub data_size: usize,
    /// Start of the payload
    pub payload_start: usize,
    payload: &'a [u8],
}

impl<'a> Field<'a> {
    /// Parse the field whose name-length prefix sits at `offset`
    ///
    /// Fails if the header or the declared payload runs past the buffer.
    pub fn at(data: &'a [u8], offset: usize) -> Result<Self> {
        let name_len = read_len(data, offset)?;
        let name_bytes = bytes::slice(data, offset + 4, name_len)?;
        let data_start = offset + 4 + name_len;
        let data_size = read_len(data, data_start + HEADER_LEN)?;
        let payload_start = data_start + PAYLOAD_SHIFT;
        let payload = bytes::slice(data, payload_start, data_size)?;

        Ok(Self {
            offset,
            name_bytes,
            data_start,
            data_size,
            payload_start,
            payload,
        })
    }

    /// Field name as text (non-ASCII bytes replaced)
    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.name_bytes).into_owned()
    }

    /// Payload bytes
    #[inline]
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Offset of the next field's name-length prefix
    #[inline]
    pub fn next_offset(&self) -> usize {
        self.payload_start + self.data_size + FIELD_GAP
    }

    /// One LE int32 per row
    pub fn int32(&self) -> Vec<i32> {
        bytes::i32_values(self.payload)
    }

    /// One LE float32 per row
    pub fn float32(&self) -> Vec<f32> {
        bytes::f32_values(self.payload)
    }

    /// int32 column whose words actually hold float32 bit patterns
    pub fn int32_as_float32(&self) -> Vec<f32> {
        self.int32()
            .into_iter()
            .map(|v| f32::from_bits(v as u32))
            .collect()
    }

    /// One byte per row, non-zero is true
    pub fn bool(&self) -> Vec<bool> {
        self.payload.iter().map(|&b| b != 0).collect()
    }

    /// Rank column: skip the embedded row count, then take the second int32
    /// of each pair.
    ///
    /// The embedded count is not trusted; `row_count` comes from the table
    /// layout. Pairs past the end of the payload yield rank 0.
    pub fn rank(&self, row_count: usize) -> Vec<i32> {
        let flat = bytes::i32_values(self.payload.get(4..).unwrap_or_default());
        (0..row_count)
            .map(|i| flat.get(2 * i + 1).copied().unwrap_or(0))
            .collect()
    }
}

/// Read the ASCII name of the field at `offset`
pub fn read_field_name(data: &[u8], offset: usize) -> Result<String> {
    let name_len = read_len(data, offset)?;
    let name = bytes::slice(data, offset + 4, name_len)?;
    Ok(String::from_utf8_lossy(name).into_owned())
}

/// Offset immediately following the field at `offset` (plus separator)
pub fn next_field_offset(data: &[u8], offset: usize) -> Result<usize> {
    Field::at(data, offset).map(|f| f.next_offset())
}

/// Column guessed from payload shape alone
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum DetectedColumn {
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Bool(Vec<bool>),
}

impl DetectedColumn {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int32(_) => "int32",
            Self::Float32(_) => "float32",
            Self::Bool(_) => "bool",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int32(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guess a field's column type from its payload
///
/// - size not a multiple of 4 → bool
/// - any NaN/infinite reinterpretation as float → int32
/// - more than 10% of values with a fractional part → float32
/// - otherwise int32
///
/// Best effort only; known fields should use the typed decoders.
pub fn auto_detect(field: &Field<'_>) -> DetectedColumn {
    if field.data_size == 0 {
        return DetectedColumn::Int32(Vec::new());
    }
    if field.data_size % 4 != 0 {
        return DetectedColumn::Bool(field.bool());
    }

    let floats = field.float32();
    if floats.iter().any(|v| !v.is_finite()) {
        return DetectedColumn::Int32(field.int32());
    }

    let fractional = floats
        .iter()
        .filter(|v| v.abs() < 1e10 && v.fract() != 0.0)
        .count();
    if fractional as f64 > floats.len() as f64 * 0.1 {
        DetectedColumn::Float32(floats)
    } else {
        DetectedColumn::Int32(field.int32())
    }
}
