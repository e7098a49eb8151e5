//! Key encoding helpers.
//!
//! Integers are encoded as fixed-width big-endian bytes so that byte order
//! matches numeric order, which makes numeric range queries work unchanged.

/// Compute the shared prefix length between two byte slices.
#[inline]
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Encode a `u64` as an 8-byte order-preserving key.
#[inline]
pub fn uint64_to_key(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Decode a key produced by [`uint64_to_key`].
///
/// Shorter input is treated as the high-order bytes, zero-filled; extra bytes
/// beyond eight are ignored.
pub fn key_to_uint64(key: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    let n = key.len().min(8);
    bytes[..n].copy_from_slice(&key[..n]);
    u64::from_be_bytes(bytes)
}

/// FNV-1a hash of a full key.
#[inline]
pub(crate) fn hash_key(key: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &byte in key {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
