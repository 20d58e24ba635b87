//! BGDatabase binary asset store decoder
//!
//! BGDatabase blobs are table-oriented asset stores serialized without a
//! schema. Every column of every table is stored as a named field at a fixed
//! byte offset, and localized text lives in separate string pools.
//!
//! # Format Overview
//!
//! ## Field (`[name_len][name][header][size][payload]`)
//!
//! - Bytes 0-3: Name length (u32 LE)
//! - Bytes 4..4+n: ASCII field name
//! - Next 31 bytes: Opaque header
//! - Next 4 bytes: Payload size (u32 LE)
//! - Remaining: Payload (one value per table row, or a nested array block)
//!
//! Consecutive fields are separated by a 22-byte gap (type marker + GUID).
//!
//! ## String table
//!
//! - Bytes 0-3: Total string bytes
//! - Bytes 4-7: Entry count
//! - Entry count × (id, byte offset) pairs
//! - Concatenated UTF-8 string data
//!
//! ## Dictionary block
//!
//! Same shape as the string table, but located by scanning near a known
//! length-prefixed marker string instead of a fixed offset. Two such blocks
//! (`name` and `koKR`) form the localization key map.

mod bytes;
pub mod dict_block;
pub mod effect;
mod extract;
pub mod field;
pub mod grade;
pub mod heuristic;
pub mod layout;
pub mod localization;
pub mod nested;
pub mod string_table;
pub mod tables;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use dict_block::{find_block, find_block_with, try_parse_block, DictBlock, LargestBlock};
pub use effect::{
    Calibration, EffectDescriptor, EffectResolver, MainTypeEntry, Policy, PolicyKind, ValueFormat,
};
pub use extract::{Extraction, Extractor, TableOutcome};
pub use field::{auto_detect, read_field_name, DetectedColumn, Field};
pub use grade::{scan_grade_codes, scan_grade_codes_with, ClosestRun};
pub use layout::{FieldKind, FieldSpec, Layout, TableLayout};
pub use localization::Localization;
pub use nested::NestedArray;
pub use string_table::{parse_name_map, parse_strings, table_strings, NameMap, StringTable};

/// Probe string preceding the localization key block
pub const NAME_PROBE: &str = "name";

/// Probe string preceding the Korean translation block
pub const KOKR_PROBE: &str = "koKR";

/// Minimum entry count for a localization dictionary block
pub const LOCALIZATION_MIN_COUNT: u32 = 4000;

/// Errors from BGDatabase decoding
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Read out of bounds: need {len} bytes at offset {offset}, buffer is {buffer_len} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    #[error("Dictionary block not found for probe '{probe}'")]
    BlockNotFound { probe: String },

    #[error("Unknown field '{field}' in table '{table}'")]
    UnknownField { table: &'static str, field: String },

    #[error("Invalid calibration entry {key:?}: {reason}")]
    InvalidCalibration { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error came from a heuristic scan rather than a bad read
    pub fn is_heuristic_miss(&self) -> bool {
        matches!(self, Error::BlockNotFound { .. })
    }
}

/// Round to 6 decimal places
///
/// Applied to every float written to output so repeated runs produce
/// byte-identical JSON.
pub fn round6(value: f64) -> f64 {
    round_to(value, 6)
}

/// Round to a fixed number of decimal places
///
/// Scales in binary floating point, then rounds half to even. This can differ
/// from exact-decimal rounding on halfway inputs that are not exactly
/// representable (`404.305` to 2 places gives `404.30`, not `404.31`). Values
/// decoded from f32 columns and the fixed damage scales do not hit that case.
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}
