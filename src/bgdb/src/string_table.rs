//! Localized string pool and the global name map
//!
//! The string pool maps string ids to UTF-8 text. Its layout:
//!
//! ```text
//! u32 total_size
//! u32 count
//! count × (u32 id, u32 byte_offset)
//! string bytes
//! ```
//!
//! A string spans from its own offset to the offset of the next larger id,
//! the last one to `total_size`.
//!
//! The name map is a flat `(row_id, string_id)` list; each table owns a fixed
//! slice of it.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::bytes::{self, read_len};
use crate::Result;

/// Fixed offset of the string pool in the v1 layout
pub const STRING_TABLE_OFFSET: usize = 629_160;

/// Fixed offset of the name map in the v1 layout
pub const NAME_MAP_OFFSET: usize = 485_191;

/// Decoded string pool (id → text)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringTable {
    strings: BTreeMap<u32, String>,
}

impl StringTable {
    pub fn get(&self, id: u32) -> Option<&str> {
        self.strings.get(&id).map(String::as_str)
    }

    /// Largest id present, 0 when empty
    pub fn max_id(&self) -> u32 {
        self.strings.keys().next_back().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Entries in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.strings.iter().map(|(&id, text)| (id, text.as_str()))
    }

    /// Entries with `start <= id`, at most `count` of them
    pub fn range(&self, start: u32, count: usize) -> impl Iterator<Item = (u32, &str)> {
        self.strings
            .range(start..)
            .take(count)
            .map(|(&id, text)| (id, text.as_str()))
    }
}

impl FromIterator<(u32, String)> for StringTable {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            strings: iter.into_iter().collect(),
        }
    }
}

/// Parse the string pool at `offset`
///
/// Invalid UTF-8 is replaced with U+FFFD. Duplicate ids keep the last offset.
pub fn parse_strings(data: &[u8], offset: usize) -> Result<StringTable> {
    let total_size = read_len(data, offset)?;
    let count = read_len(data, offset + 4)?;
    let pairs = bytes::u32_pairs(data, offset + 8, count)?;
    let text_start = offset + 8 + count * 8;

    let offsets: HashMap<u32, usize> = pairs
        .into_iter()
        .map(|(id, off)| (id, off as usize))
        .collect();

    let mut ids: Vec<u32> = offsets.keys().copied().collect();
    ids.sort_unstable();

    let strings = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let start = offsets[id];
            let end = ids.get(i + 1).map_or(total_size, |next| offsets[next]);
            let raw = bytes::clamped(data, text_start + start, text_start + end);
            (*id, String::from_utf8_lossy(raw).into_owned())
        })
        .collect::<BTreeMap<_, _>>();

    debug!(
        offset,
        count = strings.len(),
        max_id = strings.keys().next_back().copied().unwrap_or(0),
        "Parsed string table"
    );

    Ok(StringTable { strings })
}

/// Global row → string id map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameMap {
    entries: Vec<(u32, u32)>,
}

impl NameMap {
    pub fn new(entries: Vec<(u32, u32)>) -> Self {
        Self { entries }
    }

    /// `(row_id, string_id)` at a position in the map
    pub fn get(&self, index: usize) -> Option<(u32, u32)> {
        self.entries.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the name map at `offset`
pub fn parse_name_map(data: &[u8], offset: usize) -> Result<NameMap> {
    let count = read_len(data, offset)?;
    let entries = bytes::u32_pairs(data, offset + 4, count)?;
    debug!(offset, count, "Parsed name map");
    Ok(NameMap { entries })
}

/// Per-row string lists for one table's slice of the name map
///
/// Each row yields `stride` consecutive strings starting at its mapped id,
/// trimmed, with missing ids as `""`. A row whose map index is out of range,
/// or whose mapped id lies past the end of the pool, yields an empty list.
pub fn table_strings(
    name_map: &NameMap,
    strings: &StringTable,
    start: usize,
    row_count: usize,
    stride: usize,
) -> Vec<Vec<String>> {
    let max_id = strings.max_id();

    (0..row_count)
        .map(|row| {
            let Some((_, base_id)) = name_map.get(start + row) else {
                debug!(start, row, map_len = name_map.len(), "Name map index out of range");
                return Vec::new();
            };
            if base_id > max_id {
                debug!(start, row, base_id, max_id, "Mapped string id past end of pool");
                return Vec::new();
            }
            (0..stride as u32)
                .map(|k| {
                    base_id
                        .checked_add(k)
                        .and_then(|id| strings.get(id))
                        .map(|text| text.trim().to_string())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}
