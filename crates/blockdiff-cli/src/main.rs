//! `blkdiff`: computes and applies blockdiff deltas from the command line.

mod cli;
mod error;

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use error::CliError;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    if let Err(err) = logging::init(logging::Verbosity::from_count(cli.verbose)) {
        eprintln!("warning: {err}");
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("blkdiff: {err}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(command: cli::Command) -> Result<(), CliError> {
    match command {
        cli::Command::Diff {
            reference,
            target,
            output,
            max_size,
        } => {
            let reference_bytes = read(&reference)?;
            let target_bytes = read(&target)?;
            tracing::info!(
                reference_len = reference_bytes.len(),
                target_len = target_bytes.len(),
                max_size,
                "encoding delta"
            );
            let delta = blockdiff::diff(&reference_bytes, &target_bytes, max_size)?;
            tracing::info!(delta_len = delta.len(), "delta encoded");
            write(&output, &delta)
        }
        cli::Command::Apply {
            reference,
            delta,
            output,
        } => {
            let reference_bytes = read(&reference)?;
            let delta_bytes = read(&delta)?;
            let target_bytes = blockdiff_apply::apply(&reference_bytes, &delta_bytes)?;
            tracing::info!(target_len = target_bytes.len(), "delta applied");
            write(&output, &target_bytes)
        }
    }
}

fn read(path: &std::path::Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::io(path, source))
}

fn write(path: &std::path::Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes).map_err(|source| CliError::io(path, source))
}
