//! relnotes CLI - changelog to release notes converter.
//!
//! Reads one section of a `CHANGELOG.md` (the latest versioned one by
//! default) and prints it as devsite release notes.

mod commands;
mod error;
mod output;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::ConvertArgs;
use error::CliError;
use output::Output;

/// Create release notes from a changelog.
#[derive(Parser)]
#[command(name = "relnotes", version, about)]
struct Cli {
    #[command(flatten)]
    convert: ConvertArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.convert.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let notes = cli.convert.execute()?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{notes}")?;
    Ok(())
}
