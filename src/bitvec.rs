//! Densely packed bit array, the substrate for rank/select and the LOUDS levels.
//!
//! Bit `i` lives in word `i / 64` at bit `i % 64` (LSB first). The builder
//! produces per-level word arrays in the same layout, so a level's bits can be
//! concatenated without reshuffling.

use crate::error::{Error, Result};

pub(crate) const WORD_BITS: usize = 64;

/// A growable, densely packed sequence of bits.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
}

impl BitVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// All-zero vector of `len` bits.
    pub fn with_len(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut bv = Self::new();
        for b in bits {
            bv.push(b);
        }
        bv
    }

    /// Concatenates per-level bit arrays in level order.
    ///
    /// `lens[l]` is the number of meaningful bits in `levels[l]`; trailing
    /// bits of the last word of each level are ignored.
    pub fn from_levels(levels: &[Vec<u64>], lens: &[usize]) -> Self {
        debug_assert_eq!(levels.len(), lens.len());
        let total: usize = lens.iter().sum();
        let mut bv = Self {
            words: Vec::with_capacity(total.div_ceil(WORD_BITS)),
            len: 0,
        };
        for (words, &len) in levels.iter().zip(lens) {
            bv.append_words(words, len);
        }
        bv
    }

    fn append_words(&mut self, words: &[u64], len: usize) {
        debug_assert!(len <= words.len() * WORD_BITS);
        let full = len / WORD_BITS;
        for &w in &words[..full] {
            self.push_bits(w, WORD_BITS);
        }
        let rest = len % WORD_BITS;
        if rest != 0 {
            self.push_bits(words[full], rest);
        }
    }

    /// Appends the low `n` bits of `bits` (`n <= 64`).
    fn push_bits(&mut self, bits: u64, n: usize) {
        debug_assert!(n <= WORD_BITS);
        if n == 0 {
            return;
        }
        let bits = if n < WORD_BITS {
            bits & ((1u64 << n) - 1)
        } else {
            bits
        };
        let shift = self.len % WORD_BITS;
        if shift == 0 {
            self.words.push(bits);
        } else {
            let last = self.words.len() - 1;
            self.words[last] |= bits << shift;
            if n > WORD_BITS - shift {
                self.words.push(bits >> (WORD_BITS - shift));
            }
        }
        self.len += n;
    }

    #[inline]
    pub fn push(&mut self, bit: bool) {
        if self.len % WORD_BITS == 0 {
            self.words.push(0);
        }
        if bit {
            let last = self.words.len() - 1;
            self.words[last] |= 1u64 << (self.len % WORD_BITS);
        }
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Raw O(1) bit access. `pos` must be `< len()`.
    #[inline]
    pub fn read_bit(&self, pos: usize) -> bool {
        debug_assert!(pos < self.len, "bit {pos} out of bounds ({})", self.len);
        read_bit(&self.words, pos)
    }

    pub fn try_read_bit(&self, pos: usize) -> Result<bool> {
        if pos >= self.len {
            return Err(Error::PositionOutOfBounds { pos, len: self.len });
        }
        Ok(read_bit(&self.words, pos))
    }

    #[inline]
    pub fn set_bit(&mut self, pos: usize) {
        debug_assert!(pos < self.len);
        set_bit(&mut self.words, pos);
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// First set bit in `[from, end)`.
    pub fn next_one(&self, from: usize, end: usize) -> Option<usize> {
        let end = end.min(self.len);
        if from >= end {
            return None;
        }
        let mut w = from / WORD_BITS;
        let mut word = self.words[w] & (u64::MAX << (from % WORD_BITS));
        loop {
            if word != 0 {
                let pos = w * WORD_BITS + word.trailing_zeros() as usize;
                return (pos < end).then_some(pos);
            }
            w += 1;
            if w * WORD_BITS >= end {
                return None;
            }
            word = self.words[w];
        }
    }

    /// Last set bit in `[start, from]`.
    pub fn prev_one(&self, from: usize, start: usize) -> Option<usize> {
        if from < start || from >= self.len {
            return None;
        }
        let mut w = from / WORD_BITS;
        let shift = WORD_BITS - 1 - from % WORD_BITS;
        let mut word = self.words[w] & (u64::MAX >> shift);
        loop {
            if word != 0 {
                let pos = w * WORD_BITS + (WORD_BITS - 1 - word.leading_zeros() as usize);
                return (pos >= start).then_some(pos);
            }
            if w == 0 || w * WORD_BITS <= start {
                return None;
            }
            w -= 1;
            word = self.words[w];
        }
    }

    pub fn memory_usage(&self) -> usize {
        self.words.capacity() * std::mem::size_of::<u64>()
    }

    pub fn shrink_to_fit(&mut self) {
        self.words.shrink_to_fit();
    }
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitVector")
            .field("len", &self.len)
            .field("ones", &self.count_ones())
            .finish()
    }
}

#[inline]
pub(crate) fn read_bit(words: &[u64], pos: usize) -> bool {
    (words[pos / WORD_BITS] >> (pos % WORD_BITS)) & 1 != 0
}

#[inline]
pub(crate) fn set_bit(words: &mut [u64], pos: usize) {
    words[pos / WORD_BITS] |= 1u64 << (pos % WORD_BITS);
}

// =============================================================================
// Select within a word (PDEP helpers)
// =============================================================================

#[inline]
fn select_in_word_fallback(mut word: u64, k: u32) -> u32 {
    for _ in 0..k {
        word &= word - 1;
    }
    word.trailing_zeros()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "bmi2")]
unsafe fn pdep_u64_bmi2(value: u64, mask: u64) -> u64 {
    // SAFETY: Caller guarantees BMI2.
    #[allow(unused_unsafe)]
    unsafe {
        core::arch::x86_64::_pdep_u64(value, mask)
    }
}

/// Position of the `k`-th (0-based) set bit of `word`. `k < word.count_ones()`.
#[inline]
pub(crate) fn select_in_word(word: u64, k: u32) -> u32 {
    debug_assert!(k < word.count_ones());
    #[cfg(target_arch = "x86_64")]
    {
        if std::is_x86_feature_detected!("bmi2") {
            // SAFETY: feature detected at runtime.
            return unsafe { pdep_u64_bmi2(1u64 << k, word) }.trailing_zeros();
        }
    }
    select_in_word_fallback(word, k)
}
