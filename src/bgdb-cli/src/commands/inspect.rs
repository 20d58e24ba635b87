//! Low-level inspection commands: inspect, locate, strings

use anyhow::{Context, Result};
use bgdb::layout::V1;
use bgdb::{auto_detect, find_block, parse_strings, DetectedColumn, Field};
use std::fs;
use std::path::Path;

fn read_bin(bin: &Path) -> Result<Vec<u8>> {
    fs::read(bin).with_context(|| format!("Failed to read {}", bin.display()))
}

/// First `limit` values of a detected column, space separated
fn column_preview(column: &DetectedColumn, limit: usize) -> String {
    let values: Vec<String> = match column {
        DetectedColumn::Int32(v) => v.iter().take(limit).map(ToString::to_string).collect(),
        DetectedColumn::Float32(v) => v.iter().take(limit).map(ToString::to_string).collect(),
        DetectedColumn::Bool(v) => v.iter().take(limit).map(ToString::to_string).collect(),
    };
    let mut line = values.join(" ");
    if column.len() > limit {
        line.push_str(" ...");
    }
    line
}

/// Show the field header at `offset` and a guessed preview of its payload
pub fn inspect(bin: &Path, offset: usize, limit: usize) -> Result<()> {
    let data = read_bin(bin)?;
    let field = Field::at(&data, offset).with_context(|| format!("No field at offset {offset}"))?;

    println!("Field: {}", field.name());
    if let Some((table, spec)) = V1.field_at(offset) {
        println!("Layout: {}.{} ({:?})", table.name, spec.name, spec.kind);
    }
    println!("Offset: {offset} (0x{offset:x})");
    println!("Header: {}", field.data_start);
    println!("Payload: {} bytes at {}", field.data_size, field.payload_start);
    println!("Next field: {}", field.next_offset());

    let column = auto_detect(&field);
    println!("Detected: {} x {}", column.kind(), column.len());
    if !column.is_empty() {
        println!("  {}", column_preview(&column, limit));
    }

    Ok(())
}

/// Run the dictionary-block locator for one marker string
pub fn locate(bin: &Path, probe: &str, min_count: u32, limit: usize) -> Result<()> {
    let data = read_bin(bin)?;
    let block = find_block(&data, probe, min_count as usize)
        .with_context(|| format!("No block with at least {min_count} entries near '{probe}'"))?;

    println!("Block for '{probe}'");
    println!("  Start: {} (0x{:x})", block.start, block.start);
    println!("  Entries: {}", block.count);
    println!("  Blob: {} bytes at {}", block.total_len, block.blob_start);

    let entries = block.decode();
    println!("\nFirst {} entries:", limit.min(entries.len()));
    for (key, text) in entries.iter().take(limit) {
        println!("  {key:>7}  {text}");
    }

    Ok(())
}

/// Dump `count` strings starting at id `start`
pub fn strings(bin: &Path, start: u32, count: usize) -> Result<()> {
    let data = read_bin(bin)?;
    let table = parse_strings(&data, V1.string_table_offset).context("Failed to parse string table")?;

    println!("{} strings (max id {})", table.len(), table.max_id());
    for (id, text) in table.range(start, count) {
        println!("  {id:>7}  {text}");
    }

    Ok(())
}
