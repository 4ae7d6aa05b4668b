use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use comma_core::serde::to_canonical_json_bytes;
use comma_core::{load_config, CommaConfig};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use commands::{
    consistency::{self, CheckConsistencyArgs},
    features::{self, FeaturesArgs},
    fetch_tests::{self, FetchTestsArgs},
    filter_dates::{self, FilterDatesArgs},
    init::{self, InitArgs},
    validate::{self, ValidateArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "comma", about = "Hypothesis parameter and calibration data tooling")]
struct Cli {
    /// YAML configuration overriding vocabulary, file layout and remote sources.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log per-file steps.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that a parameter directory holds every hypothesis file with the expected schema.
    Validate(ValidateArgs),
    /// Compare every lockdown/actions file of a directory against the first one.
    CheckConsistency(CheckConsistencyArgs),
    /// Write zero-filled hypothesis templates.
    Init(InitArgs),
    /// Print the one-hot feature names derived from the attribute file.
    Features(FeaturesArgs),
    /// Keep the listed paths whose embedded date falls inside a window.
    FilterDates(FilterDatesArgs),
    /// Download RIVM test counts for one security region.
    FetchTests(FetchTestsArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = resolve_config(cli.config.as_deref())?;
    match cli.command {
        Command::Validate(args) => validate::run(&args, &config),
        Command::CheckConsistency(args) => consistency::run(&args, &config),
        Command::Init(args) => init::run(&args, &config),
        Command::Features(args) => features::run(&args, &config),
        Command::FilterDates(args) => filter_dates::run(&args),
        Command::FetchTests(args) => fetch_tests::run(&args, &config),
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info,comma_hyp=debug,comma_data=debug")
        } else {
            EnvFilter::new("warn,comma_hyp=info,comma_data=info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(path: Option<&Path>) -> Result<CommaConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            debug!(config = %path.display(), "loading configuration");
            Ok(load_config(path)?)
        }
        None => Ok(CommaConfig::default()),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(&to_canonical_json_bytes(value)?)?;
    writeln!(stdout)?;
    Ok(())
}
