//! Error types for filter construction and checked bit-vector access.

use thiserror::Error;

/// Errors reported by construction and by the checked `try_*` accessors.
///
/// Absent keys and exhausted iterators are ordinary results, never errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input keys were not in strictly ascending lexicographic order.
    #[error("keys must be strictly ascending: key {index} is not greater than its predecessor")]
    UnsortedKeys {
        /// Index of the first offending key.
        index: usize,
    },

    /// Hash suffix width outside `1..=64` bits.
    #[error("hash suffix length must be within 1..=64 bits, got {0}")]
    InvalidHashSuffixLen(u32),

    /// Real suffix width outside `1..=255` bytes.
    #[error("real suffix length must be within 1..=255 bytes, got {0}")]
    InvalidRealSuffixLen(u32),

    /// A select sample interval of zero.
    #[error("select sample interval must be non-zero")]
    InvalidSampleInterval,

    /// `select1(k)` with `k == 0` or `k` greater than the number of set bits.
    #[error("select rank {rank} out of range 1..={ones}")]
    SelectOutOfRange {
        /// Requested rank.
        rank: usize,
        /// Number of set bits in the vector.
        ones: usize,
    },

    /// A bit position beyond the end of the vector.
    #[error("bit position {pos} out of bounds for length {len}")]
    PositionOutOfBounds {
        /// Requested position.
        pos: usize,
        /// Vector length in bits.
        len: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
