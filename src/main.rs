//! Memory View CLI.
//!
//! The main executable of the analysis. It handles command-line argument
//! parsing, logging setup, and drives the analysis over a design library.
//!
//! # Usage
//!
//! The tool can run in two modes:
//! 1. **Listing Mode**: Resolves the memory view of a top component and
//!    writes it as a semicolon-separated listing.
//! 2. **Validation Mode**: Additionally checks every memory container of the
//!    library and fails if any check fails.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

extern crate memview;

use memview::analysis::{analyze, validator};
use memview::common::ParameterEvaluator;
use memview::config::Config;
use memview::design::loader;
use memview::report;

/// Command-line arguments for the memory view tool.
#[derive(Parser, Debug)]
#[command(author, version, about = "Memory view generator for hierarchical hardware designs")]
struct Args {
    /// Design library (`.toml` or `.json`).
    #[arg(short, long)]
    library: PathBuf,

    /// Name of the top component.
    #[arg(short, long)]
    top: String,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listing destination; standard output when absent.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Validate every memory container of the library.
    #[arg(long)]
    validate: bool,

    /// Print analysis statistics to standard error.
    #[arg(long)]
    stats: bool,
}

/// Main entry point for the memory view tool.
///
/// # Behavior
///
/// 1. **Configuration**: Parses command-line arguments and loads the optional
///    TOML configuration file.
/// 2. **Logging**: Installs a `tracing` subscriber on standard error, filtered
///    by `RUST_LOG` or the configured level.
/// 3. **Analysis**: Loads the library and resolves the memory view of the top
///    component. Diagnostics are logged and never abort the run.
/// 4. **Output**: Writes the listing and, if requested, validation reports and
///    statistics.
/// 5. **Exit**: Exits with code 1 if validation failed.
fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}

fn run() -> Result<bool> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let library = loader::load_library(&args.library)?;
    let evaluator = ParameterEvaluator::with_parameters(library.parameters.clone());

    let mut analysis = analyze(&library, &args.top, &evaluator, &config.analysis);
    for diagnostic in &analysis.diagnostics {
        tracing::warn!("[Analysis] {}", diagnostic);
    }

    let options = config.output.listing_options();
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create '{}'", path.display()))?;
            let mut out = BufWriter::new(file);
            report::write_listing(&mut out, &analysis.regions, options)
                .and_then(|_| out.flush())
                .with_context(|| format!("could not write '{}'", path.display()))?;
            tracing::info!(
                "[Output] Wrote {} regions to {}",
                analysis.stats.regions_resolved,
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            report::write_listing(&mut out, &analysis.regions, options)
                .and_then(|_| out.flush())
                .context("could not write listing")?;
        }
    }

    let mut passed = true;
    if args.validate {
        let reports = validator::validate_library(&library, &evaluator, config.analysis.default_aub);
        analysis.stats.containers_validated = reports.len() as u64;
        analysis.stats.containers_failed = reports.iter().filter(|r| !r.valid).count() as u64;

        let stderr = io::stderr();
        passed = report::write_reports(&mut stderr.lock(), &reports)
            .context("could not write validation reports")?;
    }

    if args.stats {
        analysis.stats.print();
    }
    Ok(passed)
}
