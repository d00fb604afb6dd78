#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `blockdiff-apply` reconstructs a target buffer from a reference buffer
//! and a delta produced by `blockdiff::diff`. It exists as a testing
//! oracle: `blockdiff`'s own test suite round-trips through it, and it is
//! not meant to be a hardened, untrusted-input parser.
//!
//! # Design
//!
//! [`apply`] reads the two header varints, then walks the opcode stream one
//! opcode at a time: a clear high bit means an insert run of literal bytes,
//! a set high bit means a copy from the reference at a decoded offset and
//! size. Both layouts mirror the wire format `blockdiff` writes.

/// Failure reconstructing a target buffer from a delta.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum ApplyError {
    /// The delta ended mid-opcode.
    #[error("delta ended before an opcode was complete")]
    Truncated,
    /// An insert opcode declared a run length of zero, which is reserved.
    #[error("insert opcode declared a zero-length run")]
    EmptyInsertRun,
    /// A copy opcode's offset and size run past the end of the reference.
    #[error("copy opcode reads past the end of the reference buffer")]
    ReferenceOutOfBounds,
    /// The reconstructed buffer's length did not match the header's
    /// `target_size`.
    #[error("delta produced {actual} bytes, header declared {expected}")]
    SizeMismatch {
        /// Length declared by the delta header.
        expected: u64,
        /// Length actually produced.
        actual: u64,
    },
}

/// Reconstructs the target buffer described by `delta` against `reference`.
///
/// # Errors
///
/// Returns an [`ApplyError`] if `delta` is truncated, contains a reserved
/// zero-length insert run, a copy opcode that reads past `reference`'s end,
/// or if the reconstructed length disagrees with the header.
pub fn apply(reference: &[u8], delta: &[u8]) -> Result<Vec<u8>, ApplyError> {
    let mut pos = 0usize;
    let _reference_size = read_varint(delta, &mut pos)?;
    let target_size = read_varint(delta, &mut pos)?;

    let mut out = Vec::with_capacity(target_size.min(1 << 20) as usize);

    while pos < delta.len() {
        let opcode = *delta.get(pos).ok_or(ApplyError::Truncated)?;
        pos += 1;

        if opcode & 0x80 == 0 {
            let count = opcode as usize;
            if count == 0 {
                return Err(ApplyError::EmptyInsertRun);
            }
            let literal = delta.get(pos..pos + count).ok_or(ApplyError::Truncated)?;
            out.extend_from_slice(literal);
            pos += count;
        } else {
            let mask = opcode;
            let mut offset: u32 = 0;
            for bit in 0..4 {
                if mask & (1 << bit) != 0 {
                    let byte = *delta.get(pos).ok_or(ApplyError::Truncated)?;
                    pos += 1;
                    offset |= u32::from(byte) << (8 * bit);
                }
            }
            let mut size_bits: u16 = 0;
            for bit in 0..2 {
                if mask & (1 << (4 + bit)) != 0 {
                    let byte = *delta.get(pos).ok_or(ApplyError::Truncated)?;
                    pos += 1;
                    size_bits |= u16::from(byte) << (8 * bit);
                }
            }
            let size = if size_bits == 0 {
                0x1_0000usize
            } else {
                size_bits as usize
            };

            let start = offset as usize;
            let end = start.checked_add(size).ok_or(ApplyError::ReferenceOutOfBounds)?;
            let slice = reference
                .get(start..end)
                .ok_or(ApplyError::ReferenceOutOfBounds)?;
            out.extend_from_slice(slice);
        }
    }

    if out.len() as u64 != target_size {
        return Err(ApplyError::SizeMismatch {
            expected: target_size,
            actual: out.len() as u64,
        });
    }

    Ok(out)
}

/// A `u64` varint never needs more than 10 continuation bytes (7 bits each).
const MAX_VARINT_BYTES: u32 = 10;

fn read_varint(delta: &[u8], pos: &mut usize) -> Result<u64, ApplyError> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        let byte = *delta.get(*pos).ok_or(ApplyError::Truncated)?;
        *pos += 1;
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift >= MAX_VARINT_BYTES * 7 {
            return Err(ApplyError::Truncated);
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_blockdiff() {
        let reference = b"abcdefghijklmnop".to_vec();
        let target = b"abcdefghijklmnopQ".to_vec();
        let delta = blockdiff::diff(&reference, &target, 0).unwrap();
        assert_eq!(apply(&reference, &delta).unwrap(), target);
    }

    #[test]
    fn rejects_truncated_delta() {
        assert_eq!(apply(b"ref", &[0x03]), Err(ApplyError::Truncated));
    }

    #[test]
    fn rejects_copy_past_reference_end() {
        // header: reference_size=3, target_size=5, then a copy opcode with
        // offset=0 and size bits set to 5 bytes reaching past "ref".
        let delta = vec![0x03, 0x05, 0x80 | 0x10, 0x05, 0x00];
        assert_eq!(
            apply(b"ref", &delta),
            Err(ApplyError::ReferenceOutOfBounds)
        );
    }

    #[test]
    fn rejects_a_varint_with_too_many_continuation_bytes() {
        // 11 bytes, every one with the continuation bit set: not a valid
        // encoding of any u64, so this must error rather than panic or
        // silently wrap the shift amount.
        let delta = vec![0x80; 11];
        assert_eq!(apply(b"ref", &delta), Err(ApplyError::Truncated));
    }
}
