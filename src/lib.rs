//! # surf-rs
//!
//! A succinct range filter (SuRF) over sorted byte-string keys.
//!
//! Keys are compiled into a LOUDS-encoded trie truncated at the shortest
//! prefix that tells each key apart from its neighbours. The top levels use a
//! dense 256-bit-per-node encoding, the rest a sparse per-edge encoding
//! navigated with rank and select. A small per-key suffix (real bytes, a hash,
//! or both) refutes most false positives.
//!
//! Based on "SuRF: Practical Range Query Filtering with Fast Succinct Tries"
//! (SIGMOD 2018, Zhang et al.)
//!
//! ## Example
//!
//! ```rust
//! use surf_rs::Surf;
//!
//! let surf = Surf::new(&["apple", "application", "banana"]).unwrap();
//!
//! assert!(surf.lookup_key(b"application"));
//! assert!(!surf.lookup_key(b"applicatio"));
//!
//! let it = surf.move_to_key_greater_than(b"app", true);
//! assert!(b"apple".starts_with(&it.key()));
//! assert!(!surf.move_to_key_greater_than(b"banana", false).is_valid());
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

pub mod bitvec;
pub mod builder;
pub mod config;
pub mod encoding;
pub mod error;
pub mod iter;
pub mod louds_dense;
pub mod louds_sparse;
pub mod packed;
pub mod rank;
pub mod select;
pub mod suffix;
pub mod surf;

pub use bitvec::BitVector;
pub use builder::SurfBuilder;
pub use config::Config;
pub use encoding::{common_prefix_len, key_to_uint64, uint64_to_key};
pub use error::{Error, Result};
pub use iter::{Iter, Keys};
pub use rank::RankBitVector;
pub use select::SelectBitVector;
pub use suffix::SuffixType;
pub use surf::{Surf, SurfStats};

#[cfg(test)]
mod proptests;
