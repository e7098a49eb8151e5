//! Cursor over the keys of a [`Surf`].

use crate::surf::Surf;

/// A position in the filter: either a leaf edge or an internal node whose
/// prefix key is stored.
///
/// The path is held as one edge position per level, so moving to a
/// neighbouring key only touches the levels that change.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    surf: &'a Surf,
    /// Edge position on each level of the current path.
    positions: Vec<usize>,
    /// Edge labels along `positions`.
    path: Vec<u8>,
    /// The key ends at the node below the last edge (or the root).
    at_prefix_key: bool,
    valid: bool,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(surf: &'a Surf) -> Self {
        Self {
            surf,
            positions: Vec::with_capacity(surf.height()),
            path: Vec::with_capacity(surf.height()),
            at_prefix_key: false,
            valid: false,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The key at the cursor: trie path bytes plus any stored real suffix.
    ///
    /// This is a prefix of the stored key, and the full key whenever the
    /// real suffix held all of it. Empty when the iterator is invalid.
    pub fn key(&self) -> Vec<u8> {
        if !self.valid {
            return Vec::new();
        }
        let mut key = self.path.clone();
        if let Some(idx) = self.leaf_index() {
            let (suffix, _) = self.surf.suffixes().real_suffix(idx);
            key.extend_from_slice(suffix);
        }
        key
    }

    /// Stored hash bits of the key at the cursor, if hashes are kept.
    ///
    /// Prefix keys are matched exactly by the trie and carry no hash.
    pub fn hash_suffix(&self) -> Option<u64> {
        self.leaf_index()
            .and_then(|idx| self.surf.suffixes().hash(idx))
    }

    /// Whether [`key`](Self::key) is the whole stored key.
    pub(crate) fn key_is_exact(&self) -> bool {
        match self.leaf_index() {
            Some(idx) => {
                let suffixes = self.surf.suffixes();
                suffixes.suffix_type().has_real() && !suffixes.real_suffix(idx).1
            }
            None => self.valid,
        }
    }

    fn leaf_index(&self) -> Option<usize> {
        if !self.valid || self.at_prefix_key {
            return None;
        }
        let level = self.positions.len().checked_sub(1)?;
        Some(self.surf.leaf_ordinal(level, self.positions[level]))
    }

    /// Moves to the next key; becomes invalid after the last one.
    pub fn increment(&mut self) {
        if !self.valid {
            return;
        }
        if self.at_prefix_key {
            // Children of a prefix key all follow it.
            self.at_prefix_key = false;
            let level = self.positions.len();
            let node = self.current_node();
            if let Some(pos) = self.surf.level(level).first_edge(node) {
                self.enter_edge(level, pos);
                return;
            }
        }
        self.skip_subtree();
    }

    /// Moves to the previous key; becomes invalid before the first one.
    pub fn decrement(&mut self) {
        if !self.valid {
            return;
        }
        self.at_prefix_key = false;
        while let Some(pos) = self.positions.pop() {
            self.path.pop();
            let level = self.positions.len();
            let lv = self.surf.level(level);
            if let Some(prev) = lv.prev_sibling(pos) {
                self.push(prev, lv.label(prev));
                if lv.has_child(prev) {
                    self.descend_rightmost(lv.child(prev), level + 1);
                } else {
                    self.set_at_leaf();
                }
                return;
            }
            if lv.is_prefix_key(self.current_node()) {
                self.at_prefix_key = true;
                return;
            }
        }
        self.valid = false;
    }

    /// Node id at the end of the current path.
    #[inline]
    fn current_node(&self) -> usize {
        match self.positions.len() {
            0 => 0,
            n => self.surf.level(n - 1).child(self.positions[n - 1]),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, pos: usize, label: u8) {
        self.positions.push(pos);
        self.path.push(label);
    }

    #[inline]
    pub(crate) fn set_at_leaf(&mut self) {
        self.at_prefix_key = false;
        self.valid = true;
    }

    /// Appends the edge at `pos` on `level` and settles on the smallest key
    /// beneath it.
    pub(crate) fn enter_edge(&mut self, level: usize, pos: usize) {
        let lv = self.surf.level(level);
        self.push(pos, lv.label(pos));
        if lv.has_child(pos) {
            self.descend_leftmost(lv.child(pos), level + 1);
        } else {
            self.set_at_leaf();
        }
    }

    /// Settles on the smallest key in the subtree of `node`.
    pub(crate) fn descend_leftmost(&mut self, mut node: usize, mut level: usize) {
        loop {
            let lv = self.surf.level(level);
            if lv.is_prefix_key(node) {
                self.at_prefix_key = true;
                self.valid = true;
                return;
            }
            let Some(pos) = lv.first_edge(node) else {
                self.valid = false;
                return;
            };
            self.push(pos, lv.label(pos));
            if !lv.has_child(pos) {
                self.set_at_leaf();
                return;
            }
            node = lv.child(pos);
            level += 1;
        }
    }

    /// Settles on the largest key in the subtree of `node`.
    pub(crate) fn descend_rightmost(&mut self, mut node: usize, mut level: usize) {
        loop {
            let lv = self.surf.level(level);
            let Some(pos) = lv.last_edge(node) else {
                self.at_prefix_key = true;
                self.valid = lv.is_prefix_key(node);
                return;
            };
            self.push(pos, lv.label(pos));
            if !lv.has_child(pos) {
                self.set_at_leaf();
                return;
            }
            node = lv.child(pos);
            level += 1;
        }
    }

    /// Leaves the subtree under the last path edge and settles on the next
    /// key after it.
    pub(crate) fn skip_subtree(&mut self) {
        self.at_prefix_key = false;
        while let Some(pos) = self.positions.pop() {
            self.path.pop();
            let level = self.positions.len();
            if let Some(next) = self.surf.level(level).next_sibling(pos) {
                self.enter_edge(level, next);
                return;
            }
        }
        self.valid = false;
    }
}

/// Reconstructed keys in ascending order, as returned by [`Iter::key`].
#[derive(Clone, Debug)]
pub struct Keys<'a> {
    iter: Iter<'a>,
}

impl<'a> Keys<'a> {
    pub(crate) fn new(iter: Iter<'a>) -> Self {
        Self { iter }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.iter.is_valid() {
            return None;
        }
        let key = self.iter.key();
        self.iter.increment();
        Some(key)
    }
}

impl std::iter::FusedIterator for Keys<'_> {}
