//! Hash table over fixed-size blocks of the reference buffer.

use checksums::checksum;

use crate::arena::Arena;
use crate::error::DiffError;

/// Size of a logical reference block, in bytes.
pub(crate) const BLOCK_SIZE: usize = 16;

/// Fibonacci hashing multiplier used to spread rolling checksums across
/// buckets.
const HASH_MULTIPLIER: u32 = 0x9E37_0001;

/// One block's checksum and the offset in the reference it was taken from.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Record {
    pub(crate) checksum: u32,
    pub(crate) offset: u32,
    next: Option<u32>,
}

/// Checksum-keyed lookup over the reference buffer's blocks.
///
/// Built once per [`crate::diff`] call and probed once per target position.
/// Chains are populated by walking the reference from its last block back to
/// its first and prepending each record, so traversing a chain head-to-tail
/// visits records in *increasing* reference offset. [`Index::probe`] relies
/// on this order to make the encoder's match tie-break deterministic: among
/// equal-length matches, the one at the highest reference offset wins.
pub(crate) struct Index {
    bucket_bits: u8,
    buckets: Vec<Option<u32>>,
    records: Arena<Record>,
}

impl Index {
    /// Builds an index over every `BLOCK_SIZE`-byte window of `reference`.
    ///
    /// `reference` must be non-empty; callers are expected to reject empty
    /// buffers before reaching this point.
    pub(crate) fn build(reference: &[u8]) -> Result<Self, DiffError> {
        debug_assert!(!reference.is_empty());

        let bucket_bits = bucket_bits_for(reference.len());
        let bucket_count = 1usize << bucket_bits;

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(bucket_count)
            .map_err(|_| DiffError::OutOfMemory)?;
        buckets.resize(bucket_count, None);

        let slots_per_chunk = bucket_count / 4 + 1;
        let mut records = Arena::new(slots_per_chunk);

        let mut start = (reference.len() / BLOCK_SIZE) * BLOCK_SIZE;
        if start == reference.len() {
            start -= BLOCK_SIZE;
        }

        let mut offset = start;
        loop {
            let end = (offset + BLOCK_SIZE).min(reference.len());
            let sum = checksum(&reference[offset..end]);
            let bucket = hash(sum, bucket_bits);
            let id = records
                .alloc(Record {
                    checksum: sum,
                    offset: offset as u32,
                    next: buckets[bucket],
                })
                .map_err(|_| DiffError::OutOfMemory)?;
            buckets[bucket] = Some(id);

            if offset == 0 {
                break;
            }
            offset -= BLOCK_SIZE;
        }

        Ok(Self {
            bucket_bits,
            buckets,
            records,
        })
    }

    /// Returns an iterator over every record whose checksum hashed to the
    /// same bucket as `fingerprint`, in increasing reference-offset order.
    ///
    /// Callers still need to compare `record.checksum` against `fingerprint`
    /// themselves: a bucket may hold records for other checksums that hashed
    /// to the same slot.
    pub(crate) fn probe(&self, fingerprint: u32) -> Chain<'_> {
        let bucket = hash(fingerprint, self.bucket_bits);
        Chain {
            index: self,
            next: self.buckets[bucket],
        }
    }
}

/// Iterator over one bucket's chain of [`Record`]s.
pub(crate) struct Chain<'a> {
    index: &'a Index,
    next: Option<u32>,
}

impl Iterator for Chain<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let id = self.next?;
        let record = *self.index.records.get(id);
        self.next = record.next;
        Some(record)
    }
}

fn hash(checksum: u32, bucket_bits: u8) -> usize {
    let mixed = checksum.wrapping_mul(HASH_MULTIPLIER);
    (mixed >> (32 - u32::from(bucket_bits))) as usize
}

fn bucket_bits_for(reference_size: usize) -> u8 {
    let target = reference_size / BLOCK_SIZE + 1;
    let mut bits: u32 = 0;
    while (1usize << bits) < target {
        bits += 1;
    }
    bits.max(1) as u8
}
