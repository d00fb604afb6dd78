//! Error type returned by [`crate::diff`].

/// Failure modes of [`crate::diff`].
///
/// All three are terminal: the call releases every transient allocation
/// (the block index, the output buffer) before returning and never hands
/// back a partial delta.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum DiffError {
    /// `reference` or `target` was empty.
    #[error("reference and target buffers must both be non-empty")]
    InvalidInput,
    /// Growing the block index or the output buffer failed.
    #[error("allocation failed while encoding the delta")]
    OutOfMemory,
    /// The encoded delta would exceed the caller-supplied size ceiling.
    #[error("delta exceeds the requested maximum output size")]
    SizeLimitExceeded,
}
