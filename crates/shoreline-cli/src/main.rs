//! Shoreline Segments - command line entry point
//!
//! Converts a transect GeoJSON file plus a CSV table of per-date intersect distances
//! into a GeoJSON file of shoreline segments.

mod cli;
mod logging;

use cli::{Cli, CliError};
use shoreline_lib::{Converter, ShorelineError};
use std::process::ExitCode;

/// Anything that ends the run early
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Arguments(#[from] CliError),

    #[error(transparent)]
    Conversion(#[from] ShorelineError),
}

fn main() -> ExitCode {
    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    logging::setup_logging();
    logging::log_version_info();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    cli.validate()?;

    let converter = Converter::new(cli.to_config());
    converter.run(&cli.transects, &cli.intersects, &cli.output)?;
    Ok(())
}
