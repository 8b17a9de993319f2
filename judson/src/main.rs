//! judson - A helpful music sorting utility
//!
//! Looks for audio files tagged with an AcoustID and moves each one to
//! `<output>/<Artist> - <Album>/<Track> - <Title>.<ext>`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use judson::{Librarian, LoftyTagReader, SortSettings};
use judson_common::config::resolve_output_folder;
use judson_common::{LoggingConfig, TomlConfig};

/// Command-line arguments for judson
#[derive(Parser, Debug)]
#[command(name = "judson")]
#[command(about = "Judson - A helpful music sorting utility")]
#[command(after_help = "ex. judson -i \"/media/My Unsorted Music/\" -o \"/media/sorted_music/\"")]
#[command(version)]
struct Args {
    /// Input directory of unsorted files
    #[arg(short, long, value_name = "DIR")]
    input: PathBuf,

    /// Output directory where sorted files are saved
    ///
    /// If not set, files are saved to 'library/' under the input directory.
    /// judson will attempt to create the output directory if it does not exist.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Configuration file (default: <config dir>/judson/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    // Parse command-line arguments; clap prints usage and exits on bad input
    let args = Args::parse();

    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging, args.verbose)?;

    info!("Starting judson {}", env!("CARGO_PKG_VERSION"));
    match &config.loaded_from {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using built-in defaults"),
    }

    let source = args.input.as_path();
    let destination = resolve_output_folder(args.output.as_deref(), &config, source);

    let librarian = match Librarian::new(
        source,
        &destination,
        LoftyTagReader::new(),
        SortSettings::from_config(&config),
    ) {
        Ok(librarian) => librarian,
        Err(e) => return Ok(show_help(&e.to_string())),
    };

    let files = match librarian.source_files() {
        Ok(files) => files,
        Err(e) => return Ok(show_help(&e.to_string())),
    };

    let summary = librarian.sort_all(&files, |outcome| match &outcome.result {
        Ok(report) => {
            if let Some(e) = &report.cleanup_error {
                println!("{}", e);
            }
        }
        Err(e) => println!("{}; file skipped", e),
    });

    println!(
        "{} files sorted, {} files remain",
        summary.sorted,
        summary.remaining()
    );
    if summary.stale_sources > 0 {
        println!(
            "{} sorted files could not be removed from the source folder",
            summary.stale_sources
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Print an error followed by usage guidance
fn show_help(message: &str) -> ExitCode {
    eprintln!("{}", message);
    eprintln!();
    // Nothing sensible to do if stderr is gone
    let _ = Args::command().write_help(&mut std::io::stderr());
    ExitCode::from(2)
}

/// Initialize tracing
///
/// RUST_LOG wins; otherwise the configured level, raised by `-v`.
fn init_tracing(logging: &LoggingConfig, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("judson={level},judson_common={level}")))
        .context("Invalid log level")?;

    let registry = tracing_subscriber::registry().with(filter);

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            registry
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
