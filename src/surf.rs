//! The immutable filter: dense top levels, sparse bottom levels, suffixes.

use std::cmp::Ordering;

use crate::builder::SurfBuilder;
use crate::config::Config;
use crate::error::Result;
use crate::iter::{Iter, Keys};
use crate::louds_dense::LoudsDense;
use crate::louds_sparse::LoudsSparse;
use crate::suffix::SuffixStore;

// =============================================================================
// Level dispatch
// =============================================================================

/// One trie level, seen through whichever encoding holds it.
///
/// Node ids and edge positions are local to the encoding: dense ids count
/// from the root, sparse ids from the first sparse level.
#[derive(Clone, Copy)]
pub(crate) enum Level<'a> {
    Dense(&'a LoudsDense),
    Sparse(&'a LoudsSparse),
}

impl<'a> Level<'a> {
    #[inline]
    pub(crate) fn find_edge(self, node: usize, label: u8) -> Option<usize> {
        match self {
            Level::Dense(d) => d.find_edge(node, label),
            Level::Sparse(s) => s.find_edge(node, label),
        }
    }

    #[inline]
    pub(crate) fn successor(self, node: usize, label: u8) -> Option<usize> {
        match self {
            Level::Dense(d) => d.successor(node, label),
            Level::Sparse(s) => s.successor(node, label),
        }
    }

    #[inline]
    pub(crate) fn first_edge(self, node: usize) -> Option<usize> {
        match self {
            Level::Dense(d) => d.first_edge(node),
            Level::Sparse(s) => s.first_edge(node),
        }
    }

    #[inline]
    pub(crate) fn last_edge(self, node: usize) -> Option<usize> {
        match self {
            Level::Dense(d) => d.last_edge(node),
            Level::Sparse(s) => s.last_edge(node),
        }
    }

    #[inline]
    pub(crate) fn next_sibling(self, pos: usize) -> Option<usize> {
        match self {
            Level::Dense(d) => d.next_sibling(pos),
            Level::Sparse(s) => s.next_sibling(pos),
        }
    }

    #[inline]
    pub(crate) fn prev_sibling(self, pos: usize) -> Option<usize> {
        match self {
            Level::Dense(d) => d.prev_sibling(pos),
            Level::Sparse(s) => s.prev_sibling(pos),
        }
    }

    #[inline]
    pub(crate) fn label(self, pos: usize) -> u8 {
        match self {
            Level::Dense(d) => d.label(pos),
            Level::Sparse(s) => s.label(pos),
        }
    }

    #[inline]
    pub(crate) fn has_child(self, pos: usize) -> bool {
        match self {
            Level::Dense(d) => d.has_child(pos),
            Level::Sparse(s) => s.has_child(pos),
        }
    }

    /// Node id of the child, in the encoding of the next level.
    #[inline]
    pub(crate) fn child(self, pos: usize) -> usize {
        match self {
            Level::Dense(d) => d.child(pos),
            Level::Sparse(s) => s.child(pos),
        }
    }

    #[inline]
    pub(crate) fn is_prefix_key(self, node: usize) -> bool {
        match self {
            Level::Dense(d) => d.is_prefix_key(node),
            Level::Sparse(s) => s.is_prefix_key(node),
        }
    }
}

// =============================================================================
// Surf
// =============================================================================

/// Succinct range filter over a sorted set of byte-string keys.
///
/// `lookup_key` never returns `false` for a stored key. Whether it can return
/// `true` for an absent key depends on the suffix type: with `Real` it is exact
/// whenever the key's remainder fits `real_suffix_len`, with `Hash` the
/// false-positive rate is about `2^-hash_suffix_len`.
///
/// The structure is immutable; any number of threads may query it at once.
#[derive(Clone, Debug)]
pub struct Surf {
    config: Config,
    dense: LoudsDense,
    sparse: LoudsSparse,
    suffixes: SuffixStore,
    num_keys: usize,
}

/// Size breakdown of a [`Surf`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfStats {
    pub num_keys: usize,
    pub height: usize,
    pub dense_levels: usize,
    pub dense_nodes: usize,
    pub sparse_nodes: usize,
    pub dense_bytes: usize,
    pub sparse_bytes: usize,
    pub suffix_bytes: usize,
    pub bits_per_key: f64,
}

impl SurfStats {
    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.dense_bytes + self.sparse_bytes + self.suffix_bytes
    }
}

impl Surf {
    /// Builds a filter with the default [`Config`].
    ///
    /// Keys must be strictly ascending.
    pub fn new<K: AsRef<[u8]>>(keys: &[K]) -> Result<Self> {
        Self::with_config(keys, Config::default())
    }

    pub fn with_config<K: AsRef<[u8]>>(keys: &[K], config: Config) -> Result<Self> {
        let mut builder = SurfBuilder::new(config)?;
        builder.build(keys)?;
        Ok(builder.finish())
    }

    pub(crate) fn from_parts(
        config: Config,
        dense: LoudsDense,
        sparse: LoudsSparse,
        suffixes: SuffixStore,
        num_keys: usize,
    ) -> Self {
        let mut surf = Self {
            config,
            dense,
            sparse,
            suffixes,
            num_keys,
        };
        surf.shrink_to_fit();
        surf
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.num_keys
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_keys == 0
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.sparse.height()
    }

    /// Number of levels held in the dense encoding.
    #[inline]
    pub fn sparse_start_level(&self) -> usize {
        self.dense.height()
    }

    #[inline]
    pub(crate) fn level(&self, level: usize) -> Level<'_> {
        if level < self.dense.height() {
            Level::Dense(&self.dense)
        } else {
            Level::Sparse(&self.sparse)
        }
    }

    /// Suffix index of the leaf edge at `pos` on `level`.
    #[inline]
    pub(crate) fn leaf_ordinal(&self, level: usize, pos: usize) -> usize {
        if level < self.dense.height() {
            self.dense.leaf_ordinal(pos)
        } else {
            self.dense.num_leaves() + self.sparse.leaf_ordinal(pos)
        }
    }

    #[inline]
    pub(crate) fn suffixes(&self) -> &SuffixStore {
        &self.suffixes
    }

    /// Returns `true` if `key` may be in the set; `false` means it is not.
    pub fn lookup_key(&self, key: &[u8]) -> bool {
        if self.num_keys == 0 {
            return false;
        }
        let mut node = 0;
        let mut level = 0;
        loop {
            let lv = self.level(level);
            if level == key.len() {
                return lv.is_prefix_key(node);
            }
            let Some(pos) = lv.find_edge(node, key[level]) else {
                return false;
            };
            if !lv.has_child(pos) {
                let idx = self.leaf_ordinal(level, pos);
                return self.suffixes.matches(idx, key, level + 1);
            }
            node = lv.child(pos);
            level += 1;
        }
    }

    /// Positions an iterator at the smallest stored key `>= key`
    /// (`> key` when `inclusive` is false).
    ///
    /// When the stored payload cannot tell a key apart from `key`, an
    /// inclusive seek stops there and an exclusive seek moves past it. The
    /// iterator is invalid if every stored key is smaller.
    pub fn move_to_key_greater_than(&self, key: &[u8], inclusive: bool) -> Iter<'_> {
        let mut iter = Iter::new(self);
        if self.num_keys == 0 {
            return iter;
        }
        let mut node = 0;
        let mut level = 0;
        loop {
            let lv = self.level(level);
            if level == key.len() {
                // Every key below this node is >= `key`; only its prefix key equals it.
                iter.descend_leftmost(node, level);
                if !inclusive && lv.is_prefix_key(node) {
                    iter.increment();
                }
                return iter;
            }

            let label = key[level];
            match lv.find_edge(node, label) {
                Some(pos) if lv.has_child(pos) => {
                    iter.push(pos, label);
                    node = lv.child(pos);
                    level += 1;
                }
                Some(pos) => {
                    iter.push(pos, label);
                    iter.set_at_leaf();
                    let idx = self.leaf_ordinal(level, pos);
                    match self.suffixes.compare(idx, key, level + 1) {
                        Ordering::Less => iter.increment(),
                        Ordering::Equal if !inclusive => iter.increment(),
                        _ => {}
                    }
                    return iter;
                }
                None => {
                    match lv.successor(node, label) {
                        Some(pos) => iter.enter_edge(level, pos),
                        None => iter.skip_subtree(),
                    }
                    return iter;
                }
            }
        }
    }

    /// Returns `false` only if no stored key lies between `left` and `right`.
    pub fn lookup_range(
        &self,
        left: &[u8],
        left_inclusive: bool,
        right: &[u8],
        right_inclusive: bool,
    ) -> bool {
        // An exclusive seek may step over a key whose truncated suffix merely
        // looks equal to `left`, so only skip a key known to be exactly `left`.
        let mut iter = self.move_to_key_greater_than(left, true);
        if !left_inclusive && iter.is_valid() && iter.key_is_exact() && iter.key() == left {
            iter.increment();
        }
        if !iter.is_valid() {
            return false;
        }
        // The iterator key is a prefix of the stored key it stands for.
        match iter.key().as_slice().cmp(right) {
            Ordering::Less => true,
            Ordering::Equal => right_inclusive,
            Ordering::Greater => false,
        }
    }

    /// Iterator at the smallest stored key; invalid if the set is empty.
    pub fn move_to_first(&self) -> Iter<'_> {
        let mut iter = Iter::new(self);
        if self.num_keys > 0 {
            iter.descend_leftmost(0, 0);
        }
        iter
    }

    /// Iterator at the largest stored key; invalid if the set is empty.
    pub fn move_to_last(&self) -> Iter<'_> {
        let mut iter = Iter::new(self);
        if self.num_keys > 0 {
            iter.descend_rightmost(0, 0);
        }
        iter
    }

    /// Reconstructed keys in ascending order. See [`Iter::key`].
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.move_to_first())
    }

    pub fn stats(&self) -> SurfStats {
        let dense_bytes = self.dense.memory_usage();
        let sparse_bytes = self.sparse.memory_usage();
        let suffix_bytes = self.suffixes.memory_usage();
        let total = dense_bytes + sparse_bytes + suffix_bytes;
        SurfStats {
            num_keys: self.num_keys,
            height: self.height(),
            dense_levels: self.dense.height(),
            dense_nodes: self.dense.num_nodes(),
            sparse_nodes: self.sparse.num_nodes(),
            dense_bytes,
            sparse_bytes,
            suffix_bytes,
            bits_per_key: if self.num_keys > 0 {
                (total * 8) as f64 / self.num_keys as f64
            } else {
                0.0
            },
        }
    }

    /// Heap bytes held by the filter.
    pub fn memory_usage(&self) -> usize {
        self.dense.memory_usage() + self.sparse.memory_usage() + self.suffixes.memory_usage()
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.dense.shrink_to_fit();
        self.sparse.shrink_to_fit();
        self.suffixes.shrink_to_fit();
    }
}
