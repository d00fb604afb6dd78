#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `blockdiff` computes a compact binary delta between a reference buffer
//! and a target buffer for a content-addressed object store: given an older
//! revision and a newer one, it produces a byte stream that a companion
//! patch applier can combine with the reference to reproduce the target.
//!
//! # Design
//!
//! Three pieces, built fresh on every [`diff`] call and torn down before it
//! returns:
//!
//! - [`index`] — a checksum-keyed hash table over fixed-size blocks of the
//!   reference, backed by a chunked [`arena`] allocator.
//! - [`encoder`] — walks the target byte by byte, probes the index, and
//!   greedily decides whether the cheapest encoding of the current position
//!   is a literal insert or a copy from the reference.
//! - [`varint`] — the little-endian base-128 integers used for the delta's
//!   two header fields.
//!
//! # Invariants
//!
//! - Both buffers are held fully in memory; there is no streaming mode.
//! - The encoder is greedy, not optimal: it never backtracks a decision once
//!   a byte has been emitted.
//! - `diff` either returns a complete, self-contained delta or a typed
//!   error; it never returns a partial buffer.
//!
//! # Examples
//!
//! ```
//! let reference = b"abcdefghijklmnop";
//! let target = b"abcdefghijklmnopQ";
//! let delta = blockdiff::diff(reference, target, 0).unwrap();
//! assert!(!delta.is_empty());
//! ```

mod arena;
mod encoder;
mod error;
mod index;
mod varint;

pub use error::DiffError;

/// Computes the delta that reconstructs `target` when combined with
/// `reference`.
///
/// `max_output_size` caps the returned delta's length; pass `0` for no
/// limit. The limit is checked after each opcode is fully emitted, so a
/// successful result's length never exceeds `max_output_size`; the moment an
/// opcode would push the buffer past it, encoding stops and the partial
/// buffer is discarded in favor of a [`DiffError::SizeLimitExceeded`] error.
///
/// # Errors
///
/// - [`DiffError::InvalidInput`] if `reference` or `target` is empty.
/// - [`DiffError::OutOfMemory`] if building the block index or growing the
///   output buffer fails.
/// - [`DiffError::SizeLimitExceeded`] if the delta would exceed
///   `max_output_size`.
pub fn diff(
    reference: &[u8],
    target: &[u8],
    max_output_size: u64,
) -> Result<Vec<u8>, DiffError> {
    encoder::encode(reference, target, max_output_size)
}
