//! Greedy match-and-emit driver that turns `(reference, target)` into a
//! delta byte stream.

use checksums::checksum;

use crate::error::DiffError;
use crate::index::{Index, BLOCK_SIZE};
use crate::varint;

/// Largest byte count a single opcode emission can add to the output: one
/// opcode byte, up to four offset bytes, up to two size bytes.
pub(crate) const MAX_OP_SIZE: usize = 7;

/// Cap on a single match's extension length, shared with the copy size
/// wire encoding (`0x10000` is represented as an all-zero size field).
const MAX_MATCH_LEN: usize = 0x1_0000;

/// Longest run of literal bytes a single insert opcode can carry.
const MAX_INSERT_RUN: u8 = 127;

#[cfg_attr(feature = "tracing", tracing::instrument(skip(reference, target)))]
pub(crate) fn encode(
    reference: &[u8],
    target: &[u8],
    max_output_size: u64,
) -> Result<Vec<u8>, DiffError> {
    if reference.is_empty() || target.is_empty() {
        return Err(DiffError::InvalidInput);
    }
    if reference.len() > u32::MAX as usize {
        // Copy opcodes carry a 4-byte reference offset; a larger reference
        // has no representable wire encoding rather than a truncated one.
        return Err(DiffError::InvalidInput);
    }

    let index = Index::build(reference)?;
    let ceiling = (max_output_size != 0)
        .then(|| usize::try_from(max_output_size).unwrap_or(usize::MAX));

    let mut out = Vec::new();
    varint::write(&mut out, reference.len() as u64);
    varint::write(&mut out, target.len() as u64);

    let mut cursor = Cursor::new();
    let mut pos = 0usize;

    while pos < target.len() {
        let window_end = (pos + BLOCK_SIZE).min(target.len());
        let fingerprint = checksum(&target[pos..window_end]);

        let best = best_match(&index, reference, target, pos, fingerprint);

        match best {
            Some((offset, len)) if len >= copy_cost(offset, len) => {
                cursor.close_insert_run(&mut out);
                emit_copy(&mut out, offset, len);
                pos += len;
            }
            _ => {
                cursor.push_literal(&mut out, target[pos]);
                pos += 1;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(pos, out_len = out.len(), "emitted opcode");

        if exceeds_ceiling(&out, ceiling) {
            return Err(DiffError::SizeLimitExceeded);
        }
    }

    cursor.close_insert_run(&mut out);

    if exceeds_ceiling(&out, ceiling) {
        return Err(DiffError::SizeLimitExceeded);
    }

    Ok(out)
}

fn exceeds_ceiling(out: &[u8], ceiling: Option<usize>) -> bool {
    matches!(ceiling, Some(limit) if out.len() > limit)
}

/// Best `(reference_offset, length)` match for the block starting at
/// `target[pos..]`, or `None` if nothing in the index shares `fingerprint`.
///
/// Ties on match length favor the record seen *later* while probing the
/// chain, which (per [`Index`]'s construction order) is the one at the
/// highest reference offset. The chain is abandoned as soon as a candidate
/// reaches `MAX_MATCH_LEN`, since no later record can extend a match past
/// that cap; a chain with more than one record saturating the cap at the
/// same position resolves to whichever of those is visited first (the
/// lowest offset among the saturated ones), trading strict tie-break
/// optimality for a bounded probe on adversarial collision chains.
fn best_match(
    index: &Index,
    reference: &[u8],
    target: &[u8],
    pos: usize,
    fingerprint: u32,
) -> Option<(u32, usize)> {
    let mut best: Option<(u32, usize)> = None;

    for record in index.probe(fingerprint) {
        if record.checksum != fingerprint {
            continue;
        }

        let offset = record.offset as usize;
        let max_len = (reference.len() - offset)
            .min(target.len() - pos)
            .min(MAX_MATCH_LEN);

        let mut len = 0;
        while len < max_len && reference[offset + len] == target[pos + len] {
            len += 1;
        }

        let better = match best {
            Some((_, best_len)) => len >= best_len,
            None => len > 0,
        };
        if better {
            best = Some((record.offset, len));
        }
        if len >= MAX_MATCH_LEN {
            break;
        }
    }

    best
}

/// `COPYOP_SIZE`: the number of bytes a copy opcode encoding `(offset,
/// size)` would actually occupy, used to decide whether a match is worth
/// copying or cheaper to leave as a literal.
fn copy_cost(offset: u32, size: usize) -> usize {
    let offset_bytes = offset.to_le_bytes();
    let size_bytes = (size as u16).to_le_bytes();
    let nonzero = |bytes: &[u8]| bytes.iter().filter(|&&b| b != 0).count();
    nonzero(&offset_bytes) + nonzero(&size_bytes) + 1
}

fn emit_copy(out: &mut Vec<u8>, offset: u32, size: usize) {
    let mask_pos = out.len();
    out.push(0x80);
    let mut mask = 0x80u8;

    for (i, &byte) in offset.to_le_bytes().iter().enumerate() {
        if byte != 0 {
            out.push(byte);
            mask |= 1 << i;
        }
    }
    for (i, &byte) in (size as u16).to_le_bytes().iter().enumerate() {
        if byte != 0 {
            out.push(byte);
            mask |= 1 << (4 + i);
        }
    }

    out[mask_pos] = mask;
    debug_assert!(out.len() - mask_pos <= MAX_OP_SIZE);
}

/// Tracks the currently-open insert run, if any.
///
/// An insert run reserves its length byte in `out` before any literal bytes
/// are appended, then backfills it once the run closes (hits 127 bytes, is
/// interrupted by a copy, or the target is exhausted).
struct Cursor {
    run_start: Option<usize>,
    run_len: u8,
}

impl Cursor {
    const fn new() -> Self {
        Self {
            run_start: None,
            run_len: 0,
        }
    }

    fn push_literal(&mut self, out: &mut Vec<u8>, byte: u8) {
        if self.run_start.is_none() {
            self.run_start = Some(out.len());
            out.push(0);
        }
        out.push(byte);
        self.run_len += 1;
        if self.run_len == MAX_INSERT_RUN {
            self.close_insert_run(out);
        }
    }

    fn close_insert_run(&mut self, out: &mut [u8]) {
        if let Some(start) = self.run_start.take() {
            out[start] = self.run_len;
            self.run_len = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_cost_counts_nonzero_bytes_plus_opcode() {
        assert_eq!(copy_cost(0, 0), 1);
        assert_eq!(copy_cost(16, 16), 1 + 1 + 1);
        assert_eq!(copy_cost(0x1_0000, 1), 1 + 1 + 1);
    }

    #[test]
    fn max_match_length_caps_at_zero_size_convention() {
        assert_eq!(copy_cost(0, MAX_MATCH_LEN), 1);
    }

    #[test]
    fn tied_match_length_favors_the_higher_reference_offset() {
        let mut reference = vec![b'X'; BLOCK_SIZE];
        reference.extend(std::iter::repeat(b'Y').take(BLOCK_SIZE));
        reference.extend(std::iter::repeat(b'X').take(BLOCK_SIZE));
        let target = vec![b'X'; BLOCK_SIZE];

        let index = Index::build(&reference).expect("build");
        let fingerprint = checksum(&target);

        let (offset, len) = best_match(&index, &reference, &target, 0, fingerprint)
            .expect("both X blocks should match");
        assert_eq!(len, BLOCK_SIZE);
        assert_eq!(offset, 2 * BLOCK_SIZE as u32);
    }
}
