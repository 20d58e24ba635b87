//! Full extraction command
//!
//! Reads the database, runs the extractor, writes one JSON file per output
//! and prints a summary of what was written.

use anyhow::{bail, Context, Result};
use bgdb::tables::{CommandersFull, MercenariesByGrade};
use bgdb::{Calibration, Extraction, Extractor};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Settings;
use crate::output::{print_list_summary, size_line, with_commas, JsonWriter};

/// One written file, kept for the summary
enum Written {
    List {
        label: &'static str,
        rows: Vec<Value>,
        path: PathBuf,
        size: u64,
    },
    Commanders {
        full: CommandersFull,
        path: PathBuf,
        size: u64,
    },
    ByGrade {
        view: MercenariesByGrade,
        path: PathBuf,
        size: u64,
    },
}

fn write_list<T: Serialize>(
    writer: &JsonWriter,
    label: &'static str,
    rows: &[T],
) -> Result<Written> {
    let (path, size) = writer.write(label, rows)?;
    let rows = rows
        .iter()
        .take(3)
        .map(serde_json::to_value)
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(Written::List {
        label,
        rows,
        path,
        size,
    })
}

/// Load calibration from `dir`, or the built-in tables without one
fn load_calibration(dir: Option<&Path>) -> Result<Calibration> {
    match dir {
        Some(dir) => Calibration::load_dir(dir)
            .with_context(|| format!("Failed to load calibration from {}", dir.display())),
        None => Ok(Calibration::builtin()),
    }
}

/// Write every extracted output, in the published file order
fn write_outputs(extraction: &Extraction, writer: &JsonWriter) -> Result<Vec<Written>> {
    let mut written = Vec::new();

    if let Some(creatures) = extraction.creatures.extracted() {
        written.push(write_list(writer, "creatures.json", creatures)?);
    }
    if let Some(items) = extraction.items.extracted() {
        written.push(write_list(writer, "mercenary_skills.json", &items.mercenary_skills)?);
        written.push(write_list(writer, "random_merc_skills.json", &items.random_merc_skills)?);
        written.push(write_list(writer, "sub_slot_troops.json", &items.sub_slot_troops)?);
    }
    if let Some(enemies) = extraction.enemies.extracted() {
        written.push(write_list(writer, "enemies.json", enemies)?);
    }
    if let Some(bosses) = extraction.bosses.extracted() {
        written.push(write_list(writer, "bosses.json", bosses)?);
    }
    if let Some(equipment) = extraction.equipment.extracted() {
        written.push(write_list(writer, "equipment.json", equipment)?);
    }
    if let Some(full) = extraction.commanders.extracted() {
        let (path, size) = writer.write("commanders_full.json", full)?;
        written.push(Written::Commanders {
            full: full.clone(),
            path,
            size,
        });
    }
    if let Some(artifacts) = extraction.artifacts.extracted() {
        written.push(write_list(writer, "artifacts.json", artifacts)?);
    }
    if let Some(view) = extraction.by_grade.extracted() {
        let (path, size) = writer.write("mercenaries_by_grade.json", view)?;
        written.push(Written::ByGrade {
            view: view.clone(),
            path,
            size,
        });
    }

    Ok(written)
}

fn print_written(written: &Written) {
    match written {
        Written::List {
            label,
            rows,
            path,
            size,
        } => print_list_summary(label, rows, path, *size),

        Written::Commanders { full, path, size } => {
            println!("\n{}", "=".repeat(60));
            println!("  commanders_full.json");
            println!("  {}", size_line(*size));
            println!("  Path: {}", path.display());
            println!(
                "  Commanders: {}  |  Global specialties: {}",
                full.commanders.len(),
                full.global_specialties.len()
            );
            for (i, commander) in full.commanders.iter().take(3).enumerate() {
                let strings: Vec<&str> = commander.strings.iter().take(2).map(String::as_str).collect();
                println!(
                    "    commander[{i}] index={} strings={:?} rarity={} specialties_count={}",
                    display_opt(commander.index),
                    strings,
                    display_opt(commander.rarity),
                    commander.specialties.len()
                );
            }
        }

        Written::ByGrade { view, path, size } => {
            println!("\n{}", "=".repeat(60));
            println!("  mercenaries_by_grade.json");
            println!("  Records: {}  |  {}", view.meta.count, size_line(*size));
            println!("  Path: {}", path.display());
            for (i, record) in view.records.iter().take(3).enumerate() {
                println!("    [{i}] {} ({}) - {}", record.name, record.grade, record.subtitle);
            }
        }
    }
}

fn display_opt(value: Option<i32>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

/// Run the extraction and write all outputs
///
/// Fails after writing when any table was skipped.
pub fn handle(settings: &Settings) -> Result<()> {
    println!("Loading binary: {}", settings.bin.display());
    let data = fs::read(&settings.bin)
        .with_context(|| format!("Failed to read {}", settings.bin.display()))?;
    println!("  File size: {} bytes", with_commas(data.len() as u64));

    let calibration = load_calibration(settings.calibration.as_deref())?;
    info!(
        premium = calibration.has_premium(),
        calibration = ?settings.calibration,
        "Loaded calibration"
    );

    let extraction = Extractor::new(&data, &calibration)
        .run()
        .context("Extraction failed; no files written")?;

    println!("\nDecoded shared tables");
    println!("  {} strings, {} name map entries", extraction.string_count, extraction.name_map_len);
    match extraction.localization_keys {
        Some(keys) => println!("  {keys} localization keys"),
        None => println!("  Localization blocks not found"),
    }
    if let Some(items) = extraction.items.extracted() {
        println!("  mercenary_skills:   {}", items.mercenary_skills.len());
        println!("  random_merc_skills: {}", items.random_merc_skills.len());
        println!("  sub_slot_troops:    {}", items.sub_slot_troops.len());
    }
    if extraction.premium_applied > 0 {
        println!("  Premium artifacts enriched: {}", extraction.premium_applied);
    }

    println!("\nSaving output files to {}", settings.out.display());
    let writer = JsonWriter::new(&settings.out, settings.ascii)?;
    let written = write_outputs(&extraction, &writer)?;
    println!("  {} files written.", written.len());

    println!("\n\n========== EXTRACTION SUMMARY ==========");
    for entry in &written {
        print_written(entry);
    }
    println!("\n{}", "=".repeat(60));

    let skipped = extraction.skipped();
    if !skipped.is_empty() {
        for (table, reason) in &skipped {
            warn!(%table, %reason, "Output skipped");
            println!("  Skipped {table}: {reason}");
        }
        bail!("{} of 8 outputs skipped", skipped.len());
    }

    println!("Done. All {} files written to: {}", written.len(), settings.out.display());
    Ok(())
}
