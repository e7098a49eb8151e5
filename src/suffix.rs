//! Per-leaf disambiguation payload.
//!
//! The trie keeps only as many bytes of each key as are needed to tell it
//! apart from its neighbours. A leaf may additionally carry:
//!
//! - a hash of the full key (`Hash`): point lookups get a false-positive rate
//!   of about `2^-hash_suffix_len`, ordering is unknown;
//! - up to `real_suffix_len` of the key bytes following the trie path
//!   (`Real`): lookups and seeks are exact whenever the remainder fits;
//! - both (`Mixed`).
//!
//! Entries are indexed by leaf ordinal (see [`Surf`](crate::Surf)).

use std::cmp::Ordering;

use crate::encoding::hash_key;
use crate::packed::PackedArray;

/// Which payload is stored per leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum SuffixType {
    /// Pure prefix trie; queries past a leaf cannot be refuted.
    None,
    /// Truncated FNV-1a hash of the whole key.
    Hash,
    /// Leading bytes of the key remainder beyond the trie path.
    Real,
    /// Hash and real suffix together.
    Mixed,
}

impl SuffixType {
    #[inline]
    pub fn has_hash(self) -> bool {
        matches!(self, Self::Hash | Self::Mixed)
    }

    #[inline]
    pub fn has_real(self) -> bool {
        matches!(self, Self::Real | Self::Mixed)
    }
}

/// Number of bits needed to represent `v`.
#[inline]
fn bits_for(v: u64) -> u32 {
    64 - v.leading_zeros()
}

/// Packed suffix entries, one per leaf.
#[derive(Clone, Debug)]
pub struct SuffixStore {
    suffix_type: SuffixType,
    hash_len: u32,
    /// Real bytes kept per entry; also the stride of `real_bytes`.
    real_len: usize,
    hashes: PackedArray,
    /// Length code per entry: `0..=real_len` is the exact remainder length,
    /// `real_len + 1` marks a remainder longer than `real_len`.
    real_lens: PackedArray,
    real_bytes: Vec<u8>,
    len: usize,
}

impl SuffixStore {
    pub fn new(suffix_type: SuffixType, hash_len: u32, real_len: u32) -> Self {
        let hash_len = if suffix_type.has_hash() { hash_len } else { 0 };
        let real_len = if suffix_type.has_real() {
            real_len as usize
        } else {
            0
        };
        let len_width = if real_len > 0 {
            bits_for(real_len as u64 + 1)
        } else {
            0
        };
        Self {
            suffix_type,
            hash_len,
            real_len,
            hashes: PackedArray::new(hash_len),
            real_lens: PackedArray::new(len_width),
            real_bytes: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub fn suffix_type(&self) -> SuffixType {
        self.suffix_type
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Records the suffix of `key`, whose trie path is `key[..depth]`.
    pub(crate) fn push(&mut self, key: &[u8], depth: usize) {
        self.len += 1;
        if self.hash_len > 0 {
            self.hashes.push(hash_key(key));
        }
        if self.real_len > 0 {
            let rest = &key[depth.min(key.len())..];
            let (code, kept) = if rest.len() > self.real_len {
                (self.real_len + 1, &rest[..self.real_len])
            } else {
                (rest.len(), rest)
            };
            self.real_lens.push(code as u64);
            self.real_bytes.extend_from_slice(kept);
            self.real_bytes
                .resize(self.real_bytes.len() + self.real_len - kept.len(), 0);
        }
    }

    pub(crate) fn extend_from(&mut self, other: &SuffixStore) {
        debug_assert_eq!(self.suffix_type, other.suffix_type);
        self.hashes.extend_from(&other.hashes);
        self.real_lens.extend_from(&other.real_lens);
        self.real_bytes.extend_from_slice(&other.real_bytes);
        self.len += other.len;
    }

    /// Stored hash bits of entry `idx`, if hashes are kept.
    #[inline]
    pub fn hash(&self, idx: usize) -> Option<u64> {
        (self.hash_len > 0).then(|| self.hashes.get(idx))
    }

    /// Stored real bytes of entry `idx` and whether the key continued past them.
    #[inline]
    pub fn real_suffix(&self, idx: usize) -> (&[u8], bool) {
        if self.real_len == 0 {
            return (&[], false);
        }
        let code = self.real_lens.get(idx) as usize;
        let start = idx * self.real_len;
        let truncated = code > self.real_len;
        let n = if truncated { self.real_len } else { code };
        (&self.real_bytes[start..start + n], truncated)
    }

    /// Orders the stored key of entry `idx` against `key`, both sharing the
    /// trie path `key[..depth]`.
    ///
    /// `Equal` means the stored payload cannot tell them apart. When only a
    /// hash is available a mismatch reports `Greater`, since order is unknown
    /// and the stored key must not be skipped.
    pub fn compare(&self, idx: usize, key: &[u8], depth: usize) -> Ordering {
        if self.real_len > 0 {
            let ord = self.compare_real(idx, &key[depth.min(key.len())..]);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        if self.hash_len > 0 {
            let mask = if self.hash_len == 64 {
                u64::MAX
            } else {
                (1u64 << self.hash_len) - 1
            };
            if self.hashes.get(idx) != hash_key(key) & mask {
                return Ordering::Greater;
            }
        }
        Ordering::Equal
    }

    fn compare_real(&self, idx: usize, rest: &[u8]) -> Ordering {
        let (stored, truncated) = self.real_suffix(idx);
        if !truncated {
            return stored.cmp(rest);
        }
        let query = &rest[..rest.len().min(self.real_len)];
        match stored.cmp(query) {
            // Stored key continues past `rest`.
            Ordering::Equal if rest.len() <= self.real_len => Ordering::Greater,
            ord => ord,
        }
    }

    /// Whether entry `idx` matches `key` exactly as far as the payload can tell.
    #[inline]
    pub fn matches(&self, idx: usize, key: &[u8], depth: usize) -> bool {
        self.compare(idx, key, depth) == Ordering::Equal
    }

    pub fn memory_usage(&self) -> usize {
        self.hashes.memory_usage() + self.real_lens.memory_usage() + self.real_bytes.capacity()
    }

    pub fn shrink_to_fit(&mut self) {
        self.hashes.shrink_to_fit();
        self.real_lens.shrink_to_fit();
        self.real_bytes.shrink_to_fit();
    }
}
