//! Localization key lookup
//!
//! Two dictionary blocks form the localization system: the `name` block maps
//! numeric ids to key strings (`hn96`, `sn97`, `Race26`) and the `koKR` block
//! maps the same ids to Korean text. Keys are usually a prefix plus a numeric
//! id taken from a table column.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::dict_block::find_block;
use crate::{Result, KOKR_PROBE, LOCALIZATION_MIN_COUNT, NAME_PROBE};

/// Inline colour markup: `[RRGGBB]` opens, `[-]` closes
static COLOR_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[0-9A-Fa-f]{6}\]|\[-\]").expect("valid colour tag pattern"));

/// Key → Korean text lookup
#[derive(Debug, Clone, Default)]
pub struct Localization {
    key_to_id: HashMap<String, u32>,
    texts: BTreeMap<u32, String>,
}

impl Localization {
    /// Build from decoded `id → key` and `id → text` maps
    ///
    /// When two ids share a key, the larger id wins.
    pub fn from_maps(keys: BTreeMap<u32, String>, texts: BTreeMap<u32, String>) -> Self {
        let key_to_id = keys.into_iter().map(|(id, key)| (key, id)).collect();
        Self { key_to_id, texts }
    }

    /// Locate both dictionary blocks in the source buffer
    pub fn from_buffer(data: &[u8]) -> Result<Self> {
        Self::locate(data, LOCALIZATION_MIN_COUNT as usize)
    }

    /// [`Localization::from_buffer`] with a custom minimum block size
    pub fn locate(data: &[u8], min_count: usize) -> Result<Self> {
        let keys = find_block(data, NAME_PROBE, min_count)?.decode();
        let texts = find_block(data, KOKR_PROBE, min_count)?.decode();
        debug!(keys = keys.len(), texts = texts.len(), "Built localization");
        Ok(Self::from_maps(keys, texts))
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.key_to_id.len()
    }

    /// Number of translated strings
    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    /// Text for a key with colour tags and outer whitespace removed
    ///
    /// `None` when the key is unknown; a known key without text yields `""`.
    pub fn text(&self, key: &str) -> Option<String> {
        let id = self.key_to_id.get(key)?;
        let raw = self.texts.get(id).map_or("", String::as_str);
        Some(COLOR_TAG.replace_all(raw, "").trim().to_string())
    }

    /// Text for a key, or `""` when unknown
    pub fn text_or_empty(&self, key: &str) -> String {
        self.text(key).unwrap_or_else(|| {
            debug!(key, "Unknown localization key");
            String::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{capture_logs, offset_block, probe};

    fn maps(pairs: &[(u32, &str)]) -> BTreeMap<u32, String> {
        pairs.iter().map(|&(id, s)| (id, s.to_string())).collect()
    }

    #[test]
    fn test_text_lookup() {
        let loc = Localization::from_maps(
            maps(&[(1, "hn96"), (2, "sn97"), (3, "Race26")]),
            maps(&[(1, " 제리 "), (2, "[FF0000]발목[-] 공격"), (3, "인간")]),
        );
        assert_eq!(loc.text("hn96").as_deref(), Some("제리"));
        assert_eq!(loc.text("sn97").as_deref(), Some("발목 공격"));
        assert_eq!(loc.text("Race26").as_deref(), Some("인간"));
        assert_eq!(loc.text("hn1"), None);
        assert_eq!(loc.text_or_empty("hn1"), "");
    }

    #[test]
    fn test_unknown_key_logged() {
        let loc = Localization::from_maps(maps(&[(1, "hn96")]), maps(&[(1, "제리")]));
        let logs = capture_logs(|| assert_eq!(loc.text_or_empty("hn1"), ""));
        assert!(logs.contains("Unknown localization key"));
        assert!(logs.contains("key=\"hn1\""));
    }

    #[test]
    fn test_known_key_without_text() {
        let loc = Localization::from_maps(maps(&[(7, "hc7")]), BTreeMap::new());
        assert_eq!(loc.text("hc7").as_deref(), Some(""));
    }

    #[test]
    fn test_duplicate_key_takes_larger_id() {
        let loc = Localization::from_maps(
            maps(&[(1, "bn0"), (4, "bn0")]),
            maps(&[(1, "old"), (4, "new")]),
        );
        assert_eq!(loc.key_count(), 1);
        assert_eq!(loc.text("bn0").as_deref(), Some("new"));
    }

    #[test]
    fn test_non_hex_brackets_kept() {
        let loc = Localization::from_maps(maps(&[(1, "k")]), maps(&[(1, "[세트] 효과 [GGGGGG]")]));
        assert_eq!(loc.text("k").as_deref(), Some("[세트] 효과 [GGGGGG]"));
    }

    fn block_with_probe(text: &str, entries: &[(u32, &str)]) -> Vec<u8> {
        let mut data = probe(text);
        data.extend(offset_block(entries));
        data.extend_from_slice(&[0u8; 32]);
        data
    }

    #[test]
    fn test_from_buffer() {
        let keys: Vec<String> = (0..4000).map(|i| format!("hn{i}")).collect();
        let texts: Vec<String> = (0..4000).map(|i| format!("이름{i}")).collect();
        let key_entries: Vec<(u32, &str)> =
            keys.iter().enumerate().map(|(i, k)| (i as u32, k.as_str())).collect();
        let text_entries: Vec<(u32, &str)> =
            texts.iter().enumerate().map(|(i, t)| (i as u32, t.as_str())).collect();

        let mut data = block_with_probe(NAME_PROBE, &key_entries);
        data.extend(block_with_probe(KOKR_PROBE, &text_entries));

        let loc = Localization::from_buffer(&data).unwrap();
        assert_eq!(loc.key_count(), 4000);
        assert_eq!(loc.text_count(), 4000);
        assert_eq!(loc.text("hn1234").as_deref(), Some("이름1234"));
    }

    #[test]
    fn test_from_buffer_missing_block() {
        let data = block_with_probe(NAME_PROBE, &[(0, "hn0")]);
        let err = Localization::from_buffer(&data).unwrap_err();
        assert!(err.is_heuristic_miss());
    }
}
