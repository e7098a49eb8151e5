//! Fixed-width integer array packed into 64-bit words.

use crate::bitvec::WORD_BITS;

/// Integers of `width` bits (`0..=64`), stored back to back.
///
/// A width of zero stores nothing and reads back zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedArray {
    words: Vec<u64>,
    width: u32,
    len: usize,
}

impl PackedArray {
    pub fn new(width: u32) -> Self {
        debug_assert!(width as usize <= WORD_BITS);
        Self {
            words: Vec::new(),
            width,
            len: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
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
    fn mask(&self) -> u64 {
        if self.width as usize == WORD_BITS {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    /// Appends `value`, keeping only its low `width` bits.
    pub fn push(&mut self, value: u64) {
        let width = self.width as usize;
        self.len += 1;
        if width == 0 {
            return;
        }
        let value = value & self.mask();
        let pos = (self.len - 1) * width;
        let shift = pos % WORD_BITS;
        if shift == 0 {
            self.words.push(value);
        } else {
            let last = self.words.len() - 1;
            self.words[last] |= value << shift;
            if width > WORD_BITS - shift {
                self.words.push(value >> (WORD_BITS - shift));
            }
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> u64 {
        debug_assert!(index < self.len);
        let width = self.width as usize;
        if width == 0 {
            return 0;
        }
        let pos = index * width;
        let (w, shift) = (pos / WORD_BITS, pos % WORD_BITS);
        if shift + width <= WORD_BITS {
            (self.words[w] >> shift) & self.mask()
        } else {
            ((self.words[w] >> shift) | (self.words[w + 1] << (WORD_BITS - shift))) & self.mask()
        }
    }

    pub fn extend_from(&mut self, other: &PackedArray) {
        debug_assert_eq!(self.width, other.width);
        for i in 0..other.len() {
            self.push(other.get(i));
        }
    }

    pub fn memory_usage(&self) -> usize {
        self.words.capacity() * std::mem::size_of::<u64>()
    }

    pub fn shrink_to_fit(&mut self) {
        self.words.shrink_to_fit();
    }
}
