#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `checksums` provides the rolling checksum primitive used to fingerprint
//! fixed-size blocks of a reference buffer during delta encoding. The
//! algorithm is an Adler-32 style weak checksum: two 16-bit accumulators
//! (a byte sum and a running sum of that sum) that are cheap to compute over
//! short windows.
//!
//! # Design
//!
//! The crate exposes a single type, [`RollingChecksum`], built by feeding it
//! a byte slice and reading back a packed 32-bit [`RollingChecksum::value`].
//! Higher layers treat this as a pure function: construct, update once with
//! the window's bytes, read the value, discard.
//!
//! # Invariants
//!
//! - Both accumulators are truncated to 16 bits after every update, so the
//!   packed value is stable regardless of how many bytes have been observed.
//! - `value()` never panics and has no failure mode; there is nothing to
//!   validate because the checksum consumes arbitrary bytes unconditionally.
//!
//! # Examples
//!
//! ```
//! use checksums::RollingChecksum;
//!
//! let mut checksum = RollingChecksum::new();
//! checksum.update(b"abcdefghijklmnop");
//! assert_eq!(checksum.len(), 16);
//! ```

mod rolling;

pub use rolling::{checksum, RollingChecksum};
