#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` maps the CLI's repeatable `-v` flag onto a [`tracing`]
//! [`EnvFilter`](tracing_subscriber::EnvFilter) and installs the global
//! subscriber. It exists so `blockdiff-cli` (and any other binary built on
//! top of [`blockdiff`](../blockdiff/index.html)) gets consistent,
//! one-line-per-call log formatting without repeating subscriber wiring.
//!
//! # Design
//!
//! [`Verbosity`] holds a `-v` count; [`Verbosity::into_filter`] turns it into
//! an [`EnvFilter`](tracing_subscriber::EnvFilter) directive string, and
//! [`init`] installs a subscriber built from it. `RUST_LOG`, when set,
//! overrides the verbosity-derived directive entirely, matching the
//! convention used throughout the workspace's `tracing`-backed crates.
//!
//! # Invariants
//!
//! - [`init`] may be called at most once per process; a second call returns
//!   an error rather than panicking, since library code embedding the CLI
//!   may have already installed its own subscriber.
//! - Verbosity counts beyond [`Verbosity::MAX`] saturate rather than panic.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Highest verbosity level recognised by [`Verbosity::from_count`].
pub const MAX_VERBOSITY: u8 = 3;

/// Number of times `-v` was supplied on the command line, saturated to
/// [`MAX_VERBOSITY`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Alias for [`MAX_VERBOSITY`], kept on the type for call-site brevity.
    pub const MAX: u8 = MAX_VERBOSITY;

    /// Builds a verbosity level from a `-v` repeat count, saturating at
    /// [`MAX_VERBOSITY`].
    #[must_use]
    pub const fn from_count(count: u8) -> Self {
        if count > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(count)
        }
    }

    /// The raw, saturated count.
    #[must_use]
    pub const fn count(self) -> u8 {
        self.0
    }

    /// Translates the verbosity count into the default `EnvFilter` directive
    /// used when `RUST_LOG` is unset.
    ///
    /// | count | directive |
    /// |-------|-----------|
    /// | 0     | `warn`    |
    /// | 1     | `info`    |
    /// | 2     | `debug`   |
    /// | 3+    | `trace`   |
    #[must_use]
    pub const fn default_directive(self) -> &'static str {
        match self.0 {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    fn into_filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{}", "v".repeat(self.0 as usize))
    }
}

/// Error returned when a subscriber is already installed for this process.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AlreadyInitialized;

impl fmt::Display for AlreadyInitialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a tracing subscriber is already installed for this process")
    }
}

impl std::error::Error for AlreadyInitialized {}

/// Installs a global `tracing` subscriber configured from `verbosity`.
///
/// Output is written to stderr, one line per event, with no ANSI color
/// codes (so output stays readable when redirected to a log file).
///
/// # Errors
///
/// Returns [`AlreadyInitialized`] if a global subscriber was already set.
pub fn init(verbosity: Verbosity) -> Result<(), AlreadyInitialized> {
    tracing_subscriber::fmt()
        .with_env_filter(verbosity.into_filter())
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init()
        .map_err(|_| AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_saturates() {
        assert_eq!(Verbosity::from_count(10).count(), MAX_VERBOSITY);
        assert_eq!(Verbosity::from_count(1).count(), 1);
    }

    #[test]
    fn directive_escalates_with_count() {
        assert_eq!(Verbosity::from_count(0).default_directive(), "warn");
        assert_eq!(Verbosity::from_count(1).default_directive(), "info");
        assert_eq!(Verbosity::from_count(2).default_directive(), "debug");
        assert_eq!(Verbosity::from_count(3).default_directive(), "trace");
    }

    #[test]
    fn display_renders_dashes() {
        assert_eq!(Verbosity::from_count(2).to_string(), "-vv");
    }
}
