//! Nested (per-row variable-length) array fields
//!
//! Payload layout:
//!
//! ```text
//! u32 row_count
//! row_count × (u32 row_id, u32 byte_offset)   index table
//! concatenated row data                       blob
//! ```
//!
//! Row slices are taken in byte-offset order; each runs to the next entry's
//! offset, the last one to the end of the blob.

use std::collections::HashMap;

use tracing::debug;

use crate::bytes::{self, read_len};
use crate::field::Field;
use crate::Result;

/// Decoded index table over a nested-array payload
#[derive(Debug, Clone)]
pub struct NestedArray<'a> {
    row_count: usize,
    slices: HashMap<u32, (usize, usize)>,
    blob: &'a [u8],
}

impl<'a> NestedArray<'a> {
    /// Parse a nested-array payload
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        let row_count = read_len(payload, 0)?;
        let mut entries = bytes::u32_pairs(payload, 4, row_count)?;
        let blob = payload.get(4 + row_count * 8..).unwrap_or_default();

        // Stable: entries sharing an offset keep index-table order
        entries.sort_by_key(|&(_, offset)| offset);

        let mut slices = HashMap::with_capacity(entries.len());
        for (i, &(row_id, offset)) in entries.iter().enumerate() {
            let end = entries
                .get(i + 1)
                .map_or(blob.len(), |&(_, next)| next as usize);
            slices.insert(row_id, (offset as usize, end));
        }

        debug!(row_count, blob_len = blob.len(), "Parsed nested array index");

        Ok(Self {
            row_count,
            slices,
            blob,
        })
    }

    /// Parse the nested array stored in a field's payload
    pub fn from_field(field: &Field<'a>) -> Result<Self> {
        Self::parse(field.payload())
    }

    /// Row count declared by the payload
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Raw bytes of one row; rows missing from the index are empty
    pub fn row(&self, row_id: u32) -> &'a [u8] {
        match self.slices.get(&row_id) {
            Some(&(start, end)) => bytes::clamped(self.blob, start, end),
            None => {
                debug!(row_id, row_count = self.row_count, "Nested row missing from index");
                &[]
            }
        }
    }

    fn rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.row_count as u32).map(|row_id| self.row(row_id))
    }

    /// One int32 list per row
    pub fn int32_rows(&self) -> Vec<Vec<i32>> {
        self.rows().map(bytes::i32_values).collect()
    }

    /// One float32 list per row
    pub fn float32_rows(&self) -> Vec<Vec<f32>> {
        self.rows().map(bytes::f32_values).collect()
    }

    /// One string per row (invalid UTF-8 replaced)
    pub fn string_rows(&self) -> Vec<String> {
        self.rows()
            .map(|row| String::from_utf8_lossy(row).into_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{capture_logs, f32_payload, field, i32_payload, nested_payload};
    use crate::Error;

    #[test]
    fn test_int32_rows() {
        let rows = vec![i32_payload(&[1, 2]), i32_payload(&[]), i32_payload(&[7])];
        let payload = nested_payload(&rows, &[0, 1, 2]);
        let nested = NestedArray::parse(&payload).unwrap();
        assert_eq!(nested.row_count(), 3);
        assert_eq!(nested.int32_rows(), vec![vec![1, 2], vec![], vec![7]]);
    }

    #[test]
    fn test_index_order_differs_from_row_order() {
        let rows = vec![f32_payload(&[0.5]), f32_payload(&[1.5, 2.5])];
        let payload = nested_payload(&rows, &[1, 0]);
        let nested = NestedArray::parse(&payload).unwrap();
        assert_eq!(nested.float32_rows(), vec![vec![0.5], vec![1.5, 2.5]]);
    }

    #[test]
    fn test_missing_row_is_empty() {
        // Index table lists rows 0 and 0; row 1 never appears
        let rows = vec![i32_payload(&[4]), i32_payload(&[5])];
        let mut payload = nested_payload(&rows, &[0, 1]);
        payload[12..16].copy_from_slice(&0u32.to_le_bytes());
        let nested = NestedArray::parse(&payload).unwrap();
        assert_eq!(nested.int32_rows()[1], Vec::<i32>::new());
        assert!(nested.row(99).is_empty());
    }

    #[test]
    fn test_missing_row_logged() {
        let payload = nested_payload(&[i32_payload(&[4])], &[0]);
        let nested = NestedArray::parse(&payload).unwrap();
        let logs = capture_logs(|| assert!(nested.row(7).is_empty()));
        assert!(logs.contains("Nested row missing from index"));
        assert!(logs.contains("row_id=7"));
    }

    #[test]
    fn test_partial_trailing_element_ignored() {
        let mut row = i32_payload(&[3]);
        row.extend_from_slice(&[0xaa, 0xbb]);
        let payload = nested_payload(&[row], &[0]);
        let nested = NestedArray::parse(&payload).unwrap();
        assert_eq!(nested.int32_rows(), vec![vec![3]]);
    }

    #[test]
    fn test_string_rows() {
        let rows = vec![
            "공격력".as_bytes().to_vec(),
            b"plain".to_vec(),
            vec![b'a', 0xff, b'b'],
        ];
        let payload = nested_payload(&rows, &[0, 1, 2]);
        let nested = NestedArray::parse(&payload).unwrap();
        assert_eq!(
            nested.string_rows(),
            vec!["공격력".to_string(), "plain".to_string(), "a\u{fffd}b".to_string()]
        );
    }

    #[test]
    fn test_from_field() {
        let payload = nested_payload(&[i32_payload(&[9, 8])], &[0]);
        let data = field("aType", &payload);
        let f = Field::at(&data, 0).unwrap();
        let nested = NestedArray::from_field(&f).unwrap();
        assert_eq!(nested.int32_rows(), vec![vec![9, 8]]);
    }

    #[test]
    fn test_truncated_index_table() {
        let mut payload = 5u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0u8; 8]);
        assert!(matches!(
            NestedArray::parse(&payload),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(NestedArray::parse(&[]).is_err());
    }
}
