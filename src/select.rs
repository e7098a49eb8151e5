//! Sampled select over a [`BitVector`].
//!
//! Every `sample_interval`-th set bit has its absolute position recorded.
//! `select1(k)` jumps to the sample at or before the `k`-th set bit and
//! popcounts forward word by word until it is reached.

use crate::bitvec::{select_in_word, BitVector, WORD_BITS};
use crate::error::{Error, Result};

pub const DEFAULT_SAMPLE_INTERVAL: usize = 64;

/// Bit vector with sampled `select1` (1-indexed).
#[derive(Clone, Debug)]
pub struct SelectBitVector {
    bits: BitVector,
    /// `samples[i]` = position of the `(i * sample_interval + 1)`-th set bit.
    samples: Vec<usize>,
    sample_interval: usize,
    ones: usize,
}

impl SelectBitVector {
    pub fn new(bits: BitVector, sample_interval: usize) -> Self {
        debug_assert!(sample_interval > 0);
        let sample_interval = sample_interval.max(1);
        let mut samples = Vec::new();
        let mut ones = 0usize;
        for (w, &word) in bits.words().iter().enumerate() {
            let c = word.count_ones() as usize;
            // Next sampled rank (0-based) is `samples.len() * interval`.
            while samples.len() * sample_interval < ones + c {
                let k = samples.len() * sample_interval - ones;
                let pos = w * WORD_BITS + select_in_word(word, k as u32) as usize;
                samples.push(pos);
            }
            ones += c;
        }
        Self {
            bits,
            samples,
            sample_interval,
            ones,
        }
    }

    pub fn from_levels(sample_interval: usize, levels: &[Vec<u64>], lens: &[usize]) -> Self {
        Self::new(BitVector::from_levels(levels, lens), sample_interval)
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
    pub fn sample_interval(&self) -> usize {
        self.sample_interval
    }

    #[inline]
    pub fn bits(&self) -> &BitVector {
        &self.bits
    }

    #[inline]
    pub fn read_bit(&self, pos: usize) -> bool {
        self.bits.read_bit(pos)
    }

    /// Position of the `k`-th set bit, `1 <= k <= count_ones()`.
    pub fn select1(&self, k: usize) -> usize {
        debug_assert!(
            (1..=self.ones).contains(&k),
            "select rank {k} out of range 1..={}",
            self.ones
        );
        let idx = (k - 1) / self.sample_interval;
        let sample = self.samples[idx];
        // Set bits still to pass after the sampled one.
        let mut remaining = k - 1 - idx * self.sample_interval;
        if remaining == 0 {
            return sample;
        }

        let words = self.bits.words();
        let start = sample + 1;
        let mut w = start / WORD_BITS;
        let mut word = if start % WORD_BITS == 0 {
            words[w]
        } else {
            words[w] & (u64::MAX << (start % WORD_BITS))
        };
        loop {
            let c = word.count_ones() as usize;
            if remaining <= c {
                return w * WORD_BITS + select_in_word(word, (remaining - 1) as u32) as usize;
            }
            remaining -= c;
            w += 1;
            word = words[w];
        }
    }

    pub fn try_select1(&self, k: usize) -> Result<usize> {
        if k == 0 || k > self.ones {
            return Err(Error::SelectOutOfRange {
                rank: k,
                ones: self.ones,
            });
        }
        Ok(self.select1(k))
    }

    pub fn memory_usage(&self) -> usize {
        self.bits.memory_usage() + self.samples.capacity() * std::mem::size_of::<usize>()
    }

    pub fn shrink_to_fit(&mut self) {
        self.bits.shrink_to_fit();
        self.samples.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::RankBitVector;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_select_small() {
        let sv = SelectBitVector::new(
            BitVector::from_bits([true, false, true, true, false]),
            DEFAULT_SAMPLE_INTERVAL,
        );
        assert_eq!(sv.select1(1), 0);
        assert_eq!(sv.select1(2), 2);
        assert_eq!(sv.select1(3), 3);
        assert_eq!(
            sv.try_select1(4),
            Err(Error::SelectOutOfRange { rank: 4, ones: 3 })
        );
        assert_eq!(
            sv.try_select1(0),
            Err(Error::SelectOutOfRange { rank: 0, ones: 3 })
        );
    }

    #[test]
    fn test_select_every_position_across_intervals() {
        let mut rng = StdRng::seed_from_u64(11);
        for interval in [1usize, 3, 64, 100] {
            for density in [0.02, 0.5, 0.97] {
                let bits: Vec<bool> = (0..5000).map(|_| rng.gen_bool(density)).collect();
                let sv = SelectBitVector::new(BitVector::from_bits(bits.iter().copied()), interval);
                let mut k = 1;
                for (pos, &b) in bits.iter().enumerate() {
                    if b {
                        assert_eq!(sv.select1(k), pos, "interval={interval} k={k}");
                        k += 1;
                    }
                }
                assert_eq!(sv.count_ones(), k - 1);
            }
        }
    }

    #[test]
    fn test_rank_select_inverse() {
        let mut rng = StdRng::seed_from_u64(12);
        let bits = BitVector::from_bits((0..3000).map(|_| rng.gen_bool(0.4)));
        let rv = RankBitVector::new(bits.clone());
        let sv = SelectBitVector::new(bits, 64);
        for k in 1..=sv.count_ones() {
            let pos = sv.select1(k);
            assert!(sv.read_bit(pos));
            assert_eq!(rv.rank1(pos + 1), k);
            assert_eq!(rv.rank1(pos), k - 1);
        }
    }

    #[test]
    fn test_empty_has_no_samples() {
        let sv = SelectBitVector::new(BitVector::with_len(130), 64);
        assert_eq!(sv.count_ones(), 0);
        assert!(sv.try_select1(1).is_err());
    }

    #[test]
    fn test_samples_hold_absolute_positions() {
        let bits = BitVector::from_bits((0..300_000).map(|i| i == 3 || i == 70_000 || i == 299_999));
        let sv = SelectBitVector::new(bits, 2);
        assert_eq!(sv.sample_interval(), 2);
        assert_eq!(sv.samples, vec![3usize, 299_999]);
        assert_eq!(sv.select1(2), 70_000);
        assert_eq!(sv.select1(3), 299_999);
    }
}
