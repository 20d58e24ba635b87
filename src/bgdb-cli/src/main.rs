mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::EnvFilter;

use cli::*;

/// Log to stderr; RUST_LOG wins over the -v count
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let config = Config::load_from(&config_path)?;
    let source = |args: SourceArgs| {
        config
            .resolve(Config {
                bin: args.bin,
                ..Default::default()
            })
            .bin
    };

    match cli.command {
        Commands::Extract {
            source,
            out,
            calibration,
            ascii,
        } => {
            let settings = config.resolve(Config {
                bin: source.bin,
                out,
                calibration,
                ascii: ascii.then_some(true),
            });
            commands::extract::handle(&settings)?;
        }

        Commands::Inspect {
            offset,
            source: args,
            limit,
        } => {
            commands::inspect::inspect(&source(args), offset, limit)?;
        }

        Commands::Locate {
            probe,
            source: args,
            min_count,
            limit,
        } => {
            commands::inspect::locate(&source(args), &probe, min_count, limit)?;
        }

        Commands::Strings {
            source: args,
            start,
            count,
        } => {
            commands::inspect::strings(&source(args), start, count)?;
        }

        Commands::Configure {
            bin,
            out,
            calibration,
            ascii,
            show,
        } => {
            let update = Config {
                bin,
                out,
                calibration,
                ascii,
            };
            commands::configure::handle(&config_path, update, show)?;
        }
    }

    Ok(())
}
