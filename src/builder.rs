//! Single-pass construction of the level arrays from sorted keys.
//!
//! Each key contributes edges only for the bytes it does not share with the
//! previous key, and only down to the first level where it differs from both
//! neighbours. Everything past that point goes to the suffix store.
//!
//! All levels are first produced in sparse layout (labels, has-child bits,
//! LOUDS bits, one prefix-key bit per node). [`SurfBuilder::finish`] then
//! re-encodes the top `sparse_start_level()` levels densely.

use tracing::{debug, trace};

use crate::bitvec::{read_bit, set_bit, WORD_BITS};
use crate::config::Config;
use crate::encoding::common_prefix_len;
use crate::error::{Error, Result};
use crate::louds_dense::{LoudsDense, FANOUT};
use crate::louds_sparse::LoudsSparse;
use crate::suffix::SuffixStore;
use crate::surf::Surf;

#[inline]
fn push_bit(words: &mut Vec<u64>, len: usize, bit: bool) {
    if len % WORD_BITS == 0 {
        words.push(0);
    }
    if bit {
        set_bit(words, len);
    }
}

/// Builds the per-level arrays of a [`Surf`].
#[derive(Debug, Clone)]
pub struct SurfBuilder {
    config: Config,
    labels: Vec<Vec<u8>>,
    child_bits: Vec<Vec<u64>>,
    louds_bits: Vec<Vec<u64>>,
    prefix_key_bits: Vec<Vec<u64>>,
    node_counts: Vec<usize>,
    /// Leaf suffixes per level, in edge order.
    suffixes: Vec<SuffixStore>,
    num_keys: usize,
    sparse_start_level: usize,
}

impl SurfBuilder {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            labels: Vec::new(),
            child_bits: Vec::new(),
            louds_bits: Vec::new(),
            prefix_key_bits: Vec::new(),
            node_counts: Vec::new(),
            suffixes: Vec::new(),
            num_keys: 0,
            sparse_start_level: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encodes `keys`, which must be strictly ascending.
    ///
    /// Any previous build is discarded. On error the builder is left empty.
    pub fn build<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> Result<()> {
        self.reset();
        let result = self.build_levels(keys);
        if result.is_err() {
            self.reset();
            return result;
        }
        self.sparse_start_level = self.determine_cutoff_level();
        Ok(())
    }

    fn reset(&mut self) {
        self.labels.clear();
        self.child_bits.clear();
        self.louds_bits.clear();
        self.prefix_key_bits.clear();
        self.node_counts.clear();
        self.suffixes.clear();
        self.num_keys = 0;
        self.sparse_start_level = 0;
    }

    fn build_levels<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> Result<()> {
        for i in 0..keys.len() {
            let key = keys[i].as_ref();
            let prev = i.checked_sub(1).map(|p| keys[p].as_ref());

            let lcp_prev = match prev {
                Some(prev) => {
                    let l = common_prefix_len(prev, key);
                    // Strictly ascending: `prev` is a proper prefix or smaller at `l`.
                    let ascending = l < key.len() && (l == prev.len() || prev[l] < key[l]);
                    if !ascending {
                        return Err(Error::UnsortedKeys { index: i });
                    }
                    l
                }
                None => 0,
            };
            let lcp_next = keys.get(i + 1).map(|n| common_prefix_len(key, n.as_ref()));
            let is_prefix = lcp_next == Some(key.len());

            // Levels this key occupies; the lone empty key occupies none.
            let depth = if is_prefix || key.is_empty() {
                key.len()
            } else {
                lcp_prev.max(lcp_next.unwrap_or(0)) + 1
            };

            // The previous key stops at the node this key's first new edge
            // lands in, so that node is new and marks a prefix key.
            let prev_ends_here = prev.map_or(true, |p| p.len() == lcp_prev);

            for level in lcp_prev..depth {
                let start_of_node = level > lcp_prev || prev_ends_here;
                let prefix_node = level == lcp_prev && prev.is_some() && prev_ends_here;
                let has_child = level + 1 < depth || is_prefix;
                self.push_edge(level, key[level], has_child, start_of_node, prefix_node);
            }

            if !is_prefix {
                if depth > 0 {
                    self.suffixes[depth - 1].push(key, depth);
                } else {
                    // The empty key alone: an edgeless root that is a key.
                    self.ensure_level(0);
                    self.push_node(0, true);
                }
            }
            self.num_keys += 1;
        }
        Ok(())
    }

    fn ensure_level(&mut self, level: usize) {
        while self.labels.len() <= level {
            self.labels.push(Vec::new());
            self.child_bits.push(Vec::new());
            self.louds_bits.push(Vec::new());
            self.prefix_key_bits.push(Vec::new());
            self.node_counts.push(0);
            self.suffixes.push(SuffixStore::new(
                self.config.suffix_type,
                self.config.hash_suffix_len,
                self.config.real_suffix_len,
            ));
        }
    }

    fn push_node(&mut self, level: usize, is_prefix_key: bool) {
        push_bit(
            &mut self.prefix_key_bits[level],
            self.node_counts[level],
            is_prefix_key,
        );
        self.node_counts[level] += 1;
    }

    fn push_edge(
        &mut self,
        level: usize,
        label: u8,
        has_child: bool,
        start_of_node: bool,
        prefix_node: bool,
    ) {
        self.ensure_level(level);
        if start_of_node {
            self.push_node(level, prefix_node);
        }
        let n = self.labels[level].len();
        debug_assert!(
            start_of_node || self.labels[level].last().map_or(false, |&l| l < label),
            "labels within a node must ascend"
        );
        push_bit(&mut self.child_bits[level], n, has_child);
        push_bit(&mut self.louds_bits[level], n, start_of_node);
        self.labels[level].push(label);
    }

    /// Number of leading levels encoded densely.
    ///
    /// A level qualifies when its average fan-out is at least
    /// `256 / sparse_dense_ratio`; the first level that does not ends the
    /// dense prefix.
    fn determine_cutoff_level(&self) -> usize {
        if !self.config.include_dense {
            return 0;
        }
        let ratio = u64::from(self.config.sparse_dense_ratio);
        let mut level = 0;
        while level < self.tree_height() {
            let edges = self.labels[level].len() as u64;
            let nodes = self.node_counts[level] as u64;
            let dense = edges * ratio >= FANOUT as u64 * nodes && edges > 0;
            trace!(level, edges, nodes, dense, "dense/sparse decision");
            if !dense {
                break;
            }
            level += 1;
        }
        level
    }

    /// Freezes the levels into a queryable [`Surf`].
    pub fn finish(self) -> Surf {
        let d = self.sparse_start_level;
        let dense = LoudsDense::new(
            &self.labels[..d],
            &self.child_bits[..d],
            &self.louds_bits[..d],
            &self.prefix_key_bits[..d],
            &self.node_counts[..d],
        );
        let sparse = LoudsSparse::new(
            d,
            &self.labels[d..],
            &self.child_bits[d..],
            &self.louds_bits[d..],
            &self.prefix_key_bits[d..],
            &self.node_counts[d..],
            self.config.select_sample_interval,
        );

        let mut suffixes = SuffixStore::new(
            self.config.suffix_type,
            self.config.hash_suffix_len,
            self.config.real_suffix_len,
        );
        for level in &self.suffixes {
            suffixes.extend_from(level);
        }

        let surf = Surf::from_parts(self.config, dense, sparse, suffixes, self.num_keys);
        debug!(
            keys = surf.len(),
            height = surf.height(),
            dense_levels = surf.sparse_start_level(),
            bytes = surf.memory_usage(),
            "built surf"
        );
        surf
    }

    // =========================================================================
    // Level introspection
    // =========================================================================

    /// Number of levels that hold edges (or the edgeless root of `[""]`).
    #[inline]
    pub fn tree_height(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn sparse_start_level(&self) -> usize {
        self.sparse_start_level
    }

    #[inline]
    pub fn num_keys(&self) -> usize {
        self.num_keys
    }

    /// Edge labels per level.
    #[inline]
    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    /// Has-child bits per level, one per edge.
    #[inline]
    pub fn child_indicator_bits(&self) -> &[Vec<u64>] {
        &self.child_bits
    }

    /// LOUDS bits per level, one per edge, set on each node's first edge.
    #[inline]
    pub fn louds_bits(&self) -> &[Vec<u64>] {
        &self.louds_bits
    }

    /// Prefix-key bits per level, one per node.
    #[inline]
    pub fn prefix_key_bits(&self) -> &[Vec<u64>] {
        &self.prefix_key_bits
    }

    #[inline]
    pub fn node_counts(&self) -> &[usize] {
        &self.node_counts
    }

    /// Reads bit `pos` of a per-level word array.
    #[inline]
    pub fn read_bit(words: &[u64], pos: usize) -> bool {
        read_bit(words, pos)
    }
}
