//! Constant-time rank over a [`BitVector`].
//!
//! Two-level directory: an absolute `u64` count per 512-bit basic block, and a
//! `u16` count per 64-bit word relative to its block. `rank1` adds the two and
//! popcounts the masked word.

use crate::bitvec::{BitVector, WORD_BITS};
use crate::error::{Error, Result};

const BLOCK_BITS: usize = 512;
const WORDS_PER_BLOCK: usize = BLOCK_BITS / WORD_BITS;

/// Bit vector with O(1) `rank1`.
#[derive(Clone, Debug, Default)]
pub struct RankBitVector {
    bits: BitVector,
    /// `blocks[b]` = set bits in `[0, b * BLOCK_BITS)`.
    blocks: Vec<u64>,
    /// `words[w]` = set bits from the start of `w`'s block up to word `w`.
    words: Vec<u16>,
    ones: usize,
}

impl RankBitVector {
    pub fn new(bits: BitVector) -> Self {
        let data = bits.words();
        let mut blocks = Vec::with_capacity(data.len().div_ceil(WORDS_PER_BLOCK));
        let mut words = Vec::with_capacity(data.len());

        let mut total = 0u64;
        let mut in_block = 0u16;
        for (i, &w) in data.iter().enumerate() {
            if i % WORDS_PER_BLOCK == 0 {
                blocks.push(total);
                in_block = 0;
            }
            words.push(in_block);
            let c = w.count_ones();
            in_block += c as u16;
            total += u64::from(c);
        }

        Self {
            ones: total as usize,
            bits,
            blocks,
            words,
        }
    }

    pub fn from_levels(levels: &[Vec<u64>], lens: &[usize]) -> Self {
        Self::new(BitVector::from_levels(levels, lens))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    pub fn count_ones(&self) -> usize {
        self.ones
    }

    #[inline]
    pub fn bits(&self) -> &BitVector {
        &self.bits
    }

    #[inline]
    pub fn read_bit(&self, pos: usize) -> bool {
        self.bits.read_bit(pos)
    }

    /// Number of set bits in `[0, pos)`. Requires `pos <= len()`.
    #[inline]
    pub fn rank1(&self, pos: usize) -> usize {
        debug_assert!(pos <= self.len(), "rank position {pos} > {}", self.len());
        if pos >= self.len() {
            return self.ones;
        }
        let w = pos / WORD_BITS;
        let off = pos % WORD_BITS;
        let mut r = self.blocks[pos / BLOCK_BITS] as usize + self.words[w] as usize;
        if off != 0 {
            r += (self.bits.words()[w] & ((1u64 << off) - 1)).count_ones() as usize;
        }
        r
    }

    pub fn try_rank1(&self, pos: usize) -> Result<usize> {
        if pos > self.len() {
            return Err(Error::PositionOutOfBounds {
                pos,
                len: self.len(),
            });
        }
        Ok(self.rank1(pos))
    }

    #[inline]
    pub fn next_one(&self, from: usize, end: usize) -> Option<usize> {
        self.bits.next_one(from, end)
    }

    #[inline]
    pub fn prev_one(&self, from: usize, start: usize) -> Option<usize> {
        self.bits.prev_one(from, start)
    }

    pub fn memory_usage(&self) -> usize {
        self.bits.memory_usage()
            + self.blocks.capacity() * std::mem::size_of::<u64>()
            + self.words.capacity() * std::mem::size_of::<u16>()
    }

    pub fn shrink_to_fit(&mut self) {
        self.bits.shrink_to_fit();
        self.blocks.shrink_to_fit();
        self.words.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_rank_edges() {
        let rv = RankBitVector::new(BitVector::from_bits([true, false, true, true, false]));
        assert_eq!(rv.rank1(0), 0);
        assert_eq!(rv.rank1(1), 1);
        assert_eq!(rv.rank1(4), 3);
        assert_eq!(rv.rank1(5), 3);
        assert_eq!(
            rv.try_rank1(6),
            Err(Error::PositionOutOfBounds { pos: 6, len: 5 })
        );
    }

    #[test]
    fn test_rank_empty() {
        let rv = RankBitVector::new(BitVector::new());
        assert_eq!(rv.rank1(0), 0);
        assert_eq!(rv.count_ones(), 0);
    }

    #[test]
    fn test_rank_matches_naive_random() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [1usize, 63, 64, 65, 511, 512, 513, 4000] {
            let bits: Vec<bool> = (0..len).map(|_| rng.gen_bool(0.3)).collect();
            let rv = RankBitVector::new(BitVector::from_bits(bits.iter().copied()));
            let mut expected = 0;
            for pos in 0..=len {
                assert_eq!(rv.rank1(pos), expected, "len={len} pos={pos}");
                if pos < len && bits[pos] {
                    expected += 1;
                }
            }
            assert_eq!(rv.count_ones(), expected);
        }
    }

    #[test]
    fn test_rank_all_ones_block_boundary() {
        let rv = RankBitVector::new(BitVector::from_bits(std::iter::repeat(true).take(1100)));
        for pos in [0, 511, 512, 513, 1024, 1099, 1100] {
            assert_eq!(rv.rank1(pos), pos);
        }
    }

    #[test]
    fn test_block_counts_are_absolute() {
        let len = 200_000;
        let rv = RankBitVector::new(BitVector::from_bits(std::iter::repeat(true).take(len)));
        assert_eq!(rv.blocks.len(), len.div_ceil(BLOCK_BITS));
        for (b, &count) in rv.blocks.iter().enumerate() {
            assert_eq!(count, (b * BLOCK_BITS) as u64);
        }
        assert_eq!(rv.rank1(len), len);
        assert_eq!(rv.count_ones(), len);
    }
}
