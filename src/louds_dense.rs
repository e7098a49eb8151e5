//! Dense encoding for the top levels of the trie.
//!
//! Every node owns a 256-bit label bitmap (edge exists) and a 256-bit child
//! bitmap (edge leads to an internal node), plus one prefix-key bit. Nodes are
//! numbered in level order across all dense levels, root first, so node `n`
//! owns bits `[n * 256, (n + 1) * 256)` and the child reached through the
//! edge at bit `pos` is node `rank1(children, pos + 1)`.

use crate::bitvec::{read_bit, BitVector};
use crate::rank::RankBitVector;

pub const FANOUT: usize = 256;

#[derive(Clone, Debug, Default)]
pub struct LoudsDense {
    labels: RankBitVector,
    children: RankBitVector,
    prefix_keys: BitVector,
    num_nodes: usize,
    height: usize,
}

impl LoudsDense {
    /// Re-encodes builder levels (sparse layout) into dense bitmaps.
    pub(crate) fn new(
        labels: &[Vec<u8>],
        child_bits: &[Vec<u64>],
        louds_bits: &[Vec<u64>],
        prefix_key_bits: &[Vec<u64>],
        node_counts: &[usize],
    ) -> Self {
        let height = labels.len();
        let num_nodes: usize = node_counts[..height].iter().sum();
        let mut label_bits = BitVector::with_len(num_nodes * FANOUT);
        let mut child_bitmap = BitVector::with_len(num_nodes * FANOUT);

        let mut level_base = 0usize;
        for level in 0..height {
            // Node index within the level; the first edge always opens node 0.
            let mut node = 0usize;
            for (i, &label) in labels[level].iter().enumerate() {
                if i > 0 && read_bit(&louds_bits[level], i) {
                    node += 1;
                }
                let pos = (level_base + node) * FANOUT + label as usize;
                label_bits.set_bit(pos);
                if read_bit(&child_bits[level], i) {
                    child_bitmap.set_bit(pos);
                }
            }
            level_base += node_counts[level];
        }

        let prefix_keys = BitVector::from_levels(&prefix_key_bits[..height], &node_counts[..height]);

        Self {
            labels: RankBitVector::new(label_bits),
            children: RankBitVector::new(child_bitmap),
            prefix_keys,
            num_nodes,
            height,
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn find_edge(&self, node: usize, label: u8) -> Option<usize> {
        let pos = node * FANOUT + label as usize;
        self.labels.read_bit(pos).then_some(pos)
    }

    /// Edge with the smallest label greater than `label`.
    #[inline]
    pub fn successor(&self, node: usize, label: u8) -> Option<usize> {
        let base = node * FANOUT;
        self.labels.next_one(base + label as usize + 1, base + FANOUT)
    }

    #[inline]
    pub fn first_edge(&self, node: usize) -> Option<usize> {
        let base = node * FANOUT;
        self.labels.next_one(base, base + FANOUT)
    }

    #[inline]
    pub fn last_edge(&self, node: usize) -> Option<usize> {
        let base = node * FANOUT;
        self.labels.prev_one(base + FANOUT - 1, base)
    }

    #[inline]
    pub fn next_sibling(&self, pos: usize) -> Option<usize> {
        let end = (pos / FANOUT + 1) * FANOUT;
        self.labels.next_one(pos + 1, end)
    }

    #[inline]
    pub fn prev_sibling(&self, pos: usize) -> Option<usize> {
        let start = pos / FANOUT * FANOUT;
        if pos == start {
            return None;
        }
        self.labels.prev_one(pos - 1, start)
    }

    #[inline]
    pub fn label(&self, pos: usize) -> u8 {
        (pos % FANOUT) as u8
    }

    #[inline]
    pub fn has_child(&self, pos: usize) -> bool {
        self.children.read_bit(pos)
    }

    /// Child node id; ids past the last dense node continue into the sparse levels.
    #[inline]
    pub fn child(&self, pos: usize) -> usize {
        let id = self.children.rank1(pos + 1);
        if id >= self.num_nodes {
            id - self.num_nodes
        } else {
            id
        }
    }

    #[inline]
    pub fn is_prefix_key(&self, node: usize) -> bool {
        node < self.prefix_keys.len() && self.prefix_keys.read_bit(node)
    }

    /// Number of leaf edges before `pos`.
    #[inline]
    pub fn leaf_ordinal(&self, pos: usize) -> usize {
        self.labels.rank1(pos) - self.children.rank1(pos)
    }

    #[inline]
    pub fn num_leaves(&self) -> usize {
        self.labels.count_ones() - self.children.count_ones()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.labels.count_ones()
    }

    pub fn memory_usage(&self) -> usize {
        self.labels.memory_usage() + self.children.memory_usage() + self.prefix_keys.memory_usage()
    }

    pub fn shrink_to_fit(&mut self) {
        self.labels.shrink_to_fit();
        self.children.shrink_to_fit();
        self.prefix_keys.shrink_to_fit();
    }
}
