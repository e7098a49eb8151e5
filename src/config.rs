//! Build-time configuration.

use crate::error::{Error, Result};
use crate::select::DEFAULT_SAMPLE_INTERVAL;
use crate::suffix::SuffixType;

pub const DEFAULT_SPARSE_DENSE_RATIO: u32 = 16;
pub const DEFAULT_HASH_SUFFIX_LEN: u32 = 8;
pub const DEFAULT_REAL_SUFFIX_LEN: u32 = 8;

/// Configuration for building a [`Surf`](crate::Surf).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Allow dense encoding for the top levels.
    pub include_dense: bool,
    /// Level `l` is dense iff all shallower levels are dense and
    /// `edges(l) * ratio >= 256 * nodes(l)`. Zero disables dense levels.
    pub sparse_dense_ratio: u32,
    /// Per-key disambiguation payload.
    pub suffix_type: SuffixType,
    /// Hash bits kept per key (`Hash` and `Mixed`), `1..=64`.
    pub hash_suffix_len: u32,
    /// Real suffix bytes kept per key (`Real` and `Mixed`), `1..=255`.
    pub real_suffix_len: u32,
    /// Sample interval of the LOUDS select index.
    pub select_sample_interval: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_dense: true,
            sparse_dense_ratio: DEFAULT_SPARSE_DENSE_RATIO,
            suffix_type: SuffixType::Real,
            hash_suffix_len: DEFAULT_HASH_SUFFIX_LEN,
            real_suffix_len: DEFAULT_REAL_SUFFIX_LEN,
            select_sample_interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }
}

impl Config {
    pub fn with_suffix(mut self, suffix_type: SuffixType) -> Self {
        self.suffix_type = suffix_type;
        self
    }

    /// Sparse-only encoding.
    pub fn sparse_only(mut self) -> Self {
        self.include_dense = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.suffix_type.has_hash() && !(1..=64).contains(&self.hash_suffix_len) {
            return Err(Error::InvalidHashSuffixLen(self.hash_suffix_len));
        }
        if self.suffix_type.has_real() && !(1..=255).contains(&self.real_suffix_len) {
            return Err(Error::InvalidRealSuffixLen(self.real_suffix_len));
        }
        if self.select_sample_interval == 0 {
            return Err(Error::InvalidSampleInterval);
        }
        Ok(())
    }
}
