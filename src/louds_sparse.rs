//! Sparse encoding for the lower levels of the trie.
//!
//! Only existing edges are stored, in level order: a label byte, a has-child
//! bit, and a LOUDS bit marking the first edge of each node. Sparse node `s`
//! (numbered in level order from the first sparse level) owns the edges in
//! `[select1(louds, s + 1), select1(louds, s + 2))`.

use crate::bitvec::BitVector;
use crate::rank::RankBitVector;
use crate::select::SelectBitVector;

#[derive(Clone, Debug)]
pub struct LoudsSparse {
    start_level: usize,
    height: usize,
    labels: Vec<u8>,
    has_child: RankBitVector,
    louds: SelectBitVector,
    prefix_keys: BitVector,
    /// Added to `rank1(has_child, pos + 1)` to get a child's sparse node id;
    /// nodes on the first sparse level are reached from dense edges.
    child_offset: usize,
    num_nodes: usize,
}

impl LoudsSparse {
    /// Takes the builder levels from `start_level` down; `node_counts` covers
    /// those same levels.
    pub(crate) fn new(
        start_level: usize,
        labels: &[Vec<u8>],
        child_bits: &[Vec<u64>],
        louds_bits: &[Vec<u64>],
        prefix_key_bits: &[Vec<u64>],
        node_counts: &[usize],
        sample_interval: usize,
    ) -> Self {
        let edge_counts: Vec<usize> = labels.iter().map(Vec::len).collect();
        let flat: Vec<u8> = labels.iter().flatten().copied().collect();
        Self {
            start_level,
            height: start_level + labels.len(),
            labels: flat,
            has_child: RankBitVector::from_levels(child_bits, &edge_counts),
            louds: SelectBitVector::from_levels(sample_interval, louds_bits, &edge_counts),
            prefix_keys: BitVector::from_levels(prefix_key_bits, node_counts),
            child_offset: node_counts.first().map_or(0, |&n| n.saturating_sub(1)),
            num_nodes: node_counts.iter().sum(),
        }
    }

    #[inline]
    pub fn start_level(&self) -> usize {
        self.start_level
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
    pub fn num_edges(&self) -> usize {
        self.labels.len()
    }

    /// Half-open edge range of `node`; empty for an edgeless root.
    #[inline]
    fn edge_range(&self, node: usize) -> (usize, usize) {
        let nodes_with_edges = self.louds.count_ones();
        if node >= nodes_with_edges {
            return (0, 0);
        }
        let start = self.louds.select1(node + 1);
        let end = if node + 1 < nodes_with_edges {
            self.louds.select1(node + 2)
        } else {
            self.labels.len()
        };
        (start, end)
    }

    #[inline]
    pub fn find_edge(&self, node: usize, label: u8) -> Option<usize> {
        let (start, end) = self.edge_range(node);
        self.labels[start..end]
            .binary_search(&label)
            .ok()
            .map(|i| start + i)
    }

    /// Edge with the smallest label greater than `label`.
    #[inline]
    pub fn successor(&self, node: usize, label: u8) -> Option<usize> {
        let (start, end) = self.edge_range(node);
        let i = start + self.labels[start..end].partition_point(|&l| l <= label);
        (i < end).then_some(i)
    }

    #[inline]
    pub fn first_edge(&self, node: usize) -> Option<usize> {
        let (start, end) = self.edge_range(node);
        (start < end).then_some(start)
    }

    #[inline]
    pub fn last_edge(&self, node: usize) -> Option<usize> {
        let (start, end) = self.edge_range(node);
        (start < end).then(|| end - 1)
    }

    #[inline]
    pub fn next_sibling(&self, pos: usize) -> Option<usize> {
        let next = pos + 1;
        (next < self.labels.len() && !self.louds.read_bit(next)).then_some(next)
    }

    #[inline]
    pub fn prev_sibling(&self, pos: usize) -> Option<usize> {
        (!self.louds.read_bit(pos)).then(|| pos - 1)
    }

    #[inline]
    pub fn label(&self, pos: usize) -> u8 {
        self.labels[pos]
    }

    #[inline]
    pub fn has_child(&self, pos: usize) -> bool {
        self.has_child.read_bit(pos)
    }

    #[inline]
    pub fn child(&self, pos: usize) -> usize {
        self.has_child.rank1(pos + 1) + self.child_offset
    }

    #[inline]
    pub fn is_prefix_key(&self, node: usize) -> bool {
        node < self.prefix_keys.len() && self.prefix_keys.read_bit(node)
    }

    /// Number of sparse leaf edges before `pos`.
    #[inline]
    pub fn leaf_ordinal(&self, pos: usize) -> usize {
        pos - self.has_child.rank1(pos)
    }

    #[inline]
    pub fn num_leaves(&self) -> usize {
        self.labels.len() - self.has_child.count_ones()
    }

    /// The LOUDS bits with their select index.
    #[inline]
    pub fn louds(&self) -> &SelectBitVector {
        &self.louds
    }

    pub fn memory_usage(&self) -> usize {
        self.labels.capacity()
            + self.has_child.memory_usage()
            + self.louds.memory_usage()
            + self.prefix_keys.memory_usage()
    }

    pub fn shrink_to_fit(&mut self) {
        self.labels.shrink_to_fit();
        self.has_child.shrink_to_fit();
        self.louds.shrink_to_fit();
        self.prefix_keys.shrink_to_fit();
    }
}
