//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up bgdb CLI defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::Path;

/// Handle the configure command
///
/// # Arguments
/// * `path` - Config file to edit
/// * `update` - Keys to set; unset keys are left alone
/// * `show` - If true, show current configuration
pub fn handle(path: &Path, update: Config, show: bool) -> Result<()> {
    let mut config = Config::load_from(path)?;

    if show {
        show_config(&config, path);
        return Ok(());
    }

    if update == Config::default() {
        show_usage();
        return Ok(());
    }

    config.merge(update);
    config.save_to(path)?;
    println!("Configuration saved to: {}", path.display());
    show_config(&config, path);

    Ok(())
}

fn describe(value: Option<&Path>) -> String {
    value.map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
}

/// Display current configuration
fn show_config(config: &Config, path: &Path) {
    println!("Database binary: {}", describe(config.bin.as_deref()));
    println!("Output directory: {}", describe(config.out.as_deref()));
    println!("Calibration directory: {}", describe(config.calibration.as_deref()));
    match config.ascii {
        Some(ascii) => println!("ASCII output: {ascii}"),
        None => println!("ASCII output: (not set)"),
    }
    println!("Config file: {}", path.display());
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: bgdb configure --bin PATH [--out DIR] [--calibration DIR] [--ascii true|false]");
    println!("   or: bgdb configure --show");
}
