//! Core CLI definitions

use clap::{Args, Parser, Subcommand};
use std::num::ParseIntError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bgdb")]
#[command(about = "BGDatabase table extractor", long_about = None)]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Input database selection shared by every reading command
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to the database binary (uses configured default if not provided)
    #[arg(short, long)]
    pub bin: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract every table and write the JSON files
    #[command(visible_alias = "x")]
    Extract {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Directory holding calibration JSON files
        #[arg(long)]
        calibration: Option<PathBuf>,

        /// Escape non-ASCII characters in the output
        #[arg(long)]
        ascii: bool,
    },

    /// Show the field at a byte offset with a guessed column preview
    #[command(visible_alias = "i")]
    Inspect {
        /// Offset of the field's name-length prefix (decimal or 0x-hex)
        #[arg(value_parser = parse_offset)]
        offset: usize,

        #[command(flatten)]
        source: SourceArgs,

        /// Number of values to preview
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Find the dictionary block that follows a marker string
    #[command(visible_alias = "l")]
    Locate {
        /// Marker string, e.g. "name" or "koKR"
        probe: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Minimum entry count for a candidate block
        #[arg(long, default_value_t = bgdb::LOCALIZATION_MIN_COUNT)]
        min_count: u32,

        /// Number of entries to preview
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Dump part of the string table
    Strings {
        #[command(flatten)]
        source: SourceArgs,

        /// First string id
        #[arg(long, default_value_t = 0)]
        start: u32,

        /// Number of strings to show
        #[arg(long, default_value_t = 20)]
        count: usize,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default database binary
        #[arg(long)]
        bin: Option<PathBuf>,

        /// Set default output directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Set default calibration directory
        #[arg(long)]
        calibration: Option<PathBuf>,

        /// Set default ASCII output (true/false)
        #[arg(long)]
        ascii: Option<bool>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

/// Parse a decimal or `0x`-prefixed hex offset
pub fn parse_offset(text: &str) -> Result<usize, ParseIntError> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => text.parse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("629160").unwrap(), 629_160);
        assert_eq!(parse_offset("0x999a8").unwrap(), 629_160);
        assert!(parse_offset("0xzz").is_err());
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from([
            "bgdb", "-vv", "extract", "--bin", "db.bin", "--out", "json", "--ascii",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Extract {
                source,
                out,
                calibration,
                ascii,
            } => {
                assert_eq!(source.bin, Some(PathBuf::from("db.bin")));
                assert_eq!(out, Some(PathBuf::from("json")));
                assert_eq!(calibration, None);
                assert!(ascii);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_parse_locate_defaults() {
        let cli = Cli::try_parse_from(["bgdb", "locate", "koKR"]).unwrap();
        match cli.command {
            Commands::Locate {
                probe, min_count, ..
            } => {
                assert_eq!(probe, "koKR");
                assert_eq!(min_count, 4000);
            }
            _ => panic!("expected locate"),
        }
    }
}
