//! Argument parsing for the `blkdiff` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Computes and applies binary deltas between two buffers.
#[derive(Debug, Parser)]
#[command(name = "blkdiff", version, about)]
pub struct Cli {
    /// Increases log verbosity; repeatable up to `-vvv`.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Computes a delta from `reference` to `target` and writes it to `output`.
    Diff {
        /// Path to the older revision.
        reference: PathBuf,
        /// Path to the newer revision.
        target: PathBuf,
        /// Path the encoded delta is written to.
        output: PathBuf,
        /// Caps the delta's length; `0` means unlimited.
        #[arg(long, default_value_t = 0)]
        max_size: u64,
    },
    /// Reconstructs a target buffer from `reference` and a previously
    /// encoded `delta`, writing the result to `output`.
    Apply {
        /// Path to the reference buffer the delta was computed against.
        reference: PathBuf,
        /// Path to a delta produced by `blkdiff diff`.
        delta: PathBuf,
        /// Path the reconstructed buffer is written to.
        output: PathBuf,
    },
}
