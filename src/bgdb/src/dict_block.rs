//! Dictionary block discovery
//!
//! Dictionary blocks have the string-table shape but no fixed offset. They
//! are found by searching for a length-prefixed marker string and trying
//! every header position in a short window after it.
//!
//! ```text
//! u32 total_len
//! u32 count                  1..=200_000
//! count × (u32 key, u32 offset)   keys and offsets non-decreasing
//! blob (total_len bytes)
//! ```

use std::collections::BTreeMap;

use memchr::memmem;
use tracing::debug;

use crate::bytes::{self, read_len};
use crate::heuristic::{best_of, CandidateRanking};
use crate::{Error, Result};

/// Largest plausible entry count
pub const MAX_COUNT: usize = 200_000;

/// Bytes after a probe occurrence that are tried as header positions
pub const SCAN_WINDOW: usize = 700;

/// Structurally valid dictionary block
#[derive(Debug, Clone, PartialEq)]
pub struct DictBlock<'a> {
    /// Offset of the `total_len` word
    pub start: usize,
    pub total_len: usize,
    pub count: usize,
    pub pairs: Vec<(u32, u32)>,
    pub blob_start: usize,
    pub blob: &'a [u8],
}

impl DictBlock<'_> {
    /// Decode `{key: text}` from the offset spans
    ///
    /// Invalid UTF-8 bytes are dropped. Duplicate keys keep the last span.
    pub fn decode(&self) -> BTreeMap<u32, String> {
        self.pairs
            .iter()
            .enumerate()
            .map(|(i, &(key, offset))| {
                let end = self
                    .pairs
                    .get(i + 1)
                    .map_or(self.total_len, |&(_, next)| next as usize);
                let chunk = bytes::clamped(self.blob, offset as usize, end);
                (key, valid_utf8(chunk))
            })
            .collect()
    }
}

/// Concatenate the valid UTF-8 runs of `bytes`
fn valid_utf8(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Try to parse a dictionary block header at `start`
///
/// Returns `None` on any structural violation; this is a probe, not a read.
pub fn try_parse_block(data: &[u8], start: usize) -> Option<DictBlock<'_>> {
    let total_len = read_len(data, start).ok()?;
    let count = read_len(data, start + 4).ok()?;

    if !(1..=MAX_COUNT).contains(&count) {
        return None;
    }
    if !(1..=data.len()).contains(&total_len) {
        return None;
    }

    let pair_start = start + 8;
    let blob_start = pair_start + count * 8;
    let blob = bytes::slice(data, blob_start, total_len).ok()?;
    let raw_pairs = bytes::u32_pairs(data, pair_start, count).ok()?;

    let mut last: Option<(u32, u32)> = None;
    for &(key, offset) in &raw_pairs {
        if offset as usize >= total_len {
            return None;
        }
        if let Some((last_key, last_offset)) = last {
            if offset < last_offset || key < last_key {
                return None;
            }
        }
        last = Some((key, offset));
    }

    Some(DictBlock {
        start,
        total_len,
        count,
        pairs: raw_pairs,
        blob_start,
        blob,
    })
}

/// Default ranking: most entries, then largest blob
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestBlock;

impl CandidateRanking<DictBlock<'_>> for LargestBlock {
    type Key = (usize, usize);

    fn key(&self, block: &DictBlock<'_>) -> Option<Self::Key> {
        Some((block.count, block.total_len))
    }
}

/// Every structurally valid block near an occurrence of `probe`
///
/// Occurrences may overlap. Candidates are returned in discovery order.
pub fn candidates<'a>(data: &'a [u8], probe: &str, min_count: usize) -> Vec<DictBlock<'a>> {
    let pattern = bytes::length_prefixed(probe);
    let finder = memmem::Finder::new(&pattern);

    let mut found = Vec::new();
    let mut search_from = 0;
    while let Some(hit) = data.get(search_from..).and_then(|rest| finder.find(rest)) {
        let pos = search_from + hit;
        search_from = pos + 1;

        let scan_start = pos + pattern.len();
        let scan_end = (pos + SCAN_WINDOW).min(data.len().saturating_sub(16));
        for pair_start in scan_start..scan_end {
            let Some(start) = pair_start.checked_sub(8) else {
                continue;
            };
            if let Some(block) = try_parse_block(data, start) {
                if block.count >= min_count {
                    found.push(block);
                }
            }
        }
    }

    debug!(probe, candidates = found.len(), "Scanned for dictionary blocks");
    found
}

/// Locate a dictionary block by marker string using a custom ranking
pub fn find_block_with<'a, R>(
    data: &'a [u8],
    probe: &str,
    min_count: usize,
    ranking: &R,
) -> Result<DictBlock<'a>>
where
    R: for<'b> CandidateRanking<DictBlock<'b>>,
{
    let block = best_of(candidates(data, probe, min_count), ranking).ok_or_else(|| {
        Error::BlockNotFound {
            probe: probe.to_string(),
        }
    })?;

    debug!(
        probe,
        start = block.start,
        count = block.count,
        total_len = block.total_len,
        "Selected dictionary block"
    );
    Ok(block)
}

/// Locate a dictionary block by marker string, preferring the largest block
pub fn find_block<'a>(data: &'a [u8], probe: &str, min_count: usize) -> Result<DictBlock<'a>> {
    find_block_with(data, probe, min_count, &LargestBlock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{offset_block, probe};

    fn keyed(count: u32, base: u32) -> Vec<u8> {
        let texts: Vec<String> = (0..count).map(|i| format!("k{}", base + i)).collect();
        let entries: Vec<(u32, &str)> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| (i as u32, t.as_str()))
            .collect();
        offset_block(&entries)
    }

    /// Buffer: padding, probe, `gap` filler bytes, block, trailing padding
    fn with_probe(text: &str, gap: usize, block: &[u8]) -> (Vec<u8>, usize) {
        let mut data = vec![0xcc; 5];
        data.extend(probe(text));
        data.extend(std::iter::repeat(0xcc).take(gap));
        let start = data.len();
        data.extend_from_slice(block);
        data.extend_from_slice(&[0xcc; 32]);
        (data, start)
    }

    #[test]
    fn test_try_parse_block() {
        let data = offset_block(&[(1, "hn1"), (2, "hc1"), (2, "dup")]);
        let block = try_parse_block(&data, 0).unwrap();
        assert_eq!(block.count, 3);
        assert_eq!(block.total_len, 9);
        let decoded = block.decode();
        assert_eq!(decoded.get(&1).map(String::as_str), Some("hn1"));
        assert_eq!(decoded.get(&2).map(String::as_str), Some("dup"));
    }

    #[test]
    fn test_try_parse_rejects_bad_headers() {
        // Decreasing keys
        let data = offset_block(&[(5, "a"), (4, "b")]);
        assert!(try_parse_block(&data, 0).is_none());

        // Zero count
        let mut data = offset_block(&[(0, "a")]);
        data[4..8].copy_from_slice(&0u32.to_le_bytes());
        assert!(try_parse_block(&data, 0).is_none());

        // Blob past the buffer
        let mut data = offset_block(&[(0, "abc")]);
        data.truncate(data.len() - 1);
        assert!(try_parse_block(&data, 0).is_none());

        // Offset at or past total_len
        let mut data = offset_block(&[(0, "a"), (1, "")]);
        assert!(try_parse_block(&data, 0).is_none());
        data.truncate(0);
        assert!(try_parse_block(&data, 0).is_none());
    }

    #[test]
    fn test_decode_drops_invalid_utf8() {
        let mut data = offset_block(&[(0, "a_b")]);
        let at = data.len() - 2;
        data[at] = 0xff;
        let block = try_parse_block(&data, 0).unwrap();
        assert_eq!(block.decode().get(&0).map(String::as_str), Some("ab"));
    }

    #[test]
    fn test_find_single_block() {
        let block = keyed(12, 0);
        let (data, start) = with_probe("name", 7, &block);
        let found = find_block(&data, "name", 10).unwrap();
        assert_eq!(found.start, start);
        assert_eq!(found.count, 12);
        assert_eq!(found.decode().get(&11).map(String::as_str), Some("k11"));
    }

    #[test]
    fn test_find_block_not_found() {
        let block = keyed(3, 0);
        let (data, _) = with_probe("name", 0, &block);
        let err = find_block(&data, "name", 10).unwrap_err();
        assert!(err.is_heuristic_miss());
        assert!(matches!(err, Error::BlockNotFound { ref probe } if probe == "name"));

        let err = find_block(&data, "koKR", 1).unwrap_err();
        assert!(err.is_heuristic_miss());
    }

    #[test]
    fn test_block_outside_window_ignored() {
        let block = keyed(12, 0);
        let (data, _) = with_probe("name", SCAN_WINDOW, &block);
        assert!(find_block(&data, "name", 10).is_err());
    }

    #[test]
    fn test_largest_block_wins() {
        let small = keyed(10, 0);
        let large = keyed(20, 100);
        let (mut data, _) = with_probe("koKR", 0, &small);
        let (second, _) = with_probe("koKR", 0, &large);
        let large_start = data.len() + 5 + 8;
        data.extend(second);

        let found = find_block(&data, "koKR", 10).unwrap();
        assert_eq!(found.count, 20);
        assert_eq!(found.start, large_start);
    }

    #[test]
    fn test_tie_prefers_earliest() {
        let block = keyed(10, 0);
        let (mut data, first_start) = with_probe("koKR", 0, &block);
        let (second, _) = with_probe("koKR", 0, &block);
        data.extend(second);

        let found = find_block(&data, "koKR", 10).unwrap();
        assert_eq!(found.start, first_start);
    }

    struct FewestEntries;

    impl CandidateRanking<DictBlock<'_>> for FewestEntries {
        type Key = std::cmp::Reverse<usize>;

        fn key(&self, block: &DictBlock<'_>) -> Option<Self::Key> {
            Some(std::cmp::Reverse(block.count))
        }
    }

    #[test]
    fn test_injected_ranking() {
        let small = keyed(10, 0);
        let large = keyed(20, 100);
        let (mut data, large_start) = with_probe("koKR", 0, &large);
        let small_start = data.len() + 5 + 8;
        let (second, _) = with_probe("koKR", 0, &small);
        data.extend(second);

        let found = find_block_with(&data, "koKR", 10, &FewestEntries).unwrap();
        assert_eq!(found.count, 10);
        assert_eq!(found.start, small_start);
        assert_ne!(found.start, large_start);
    }
}
