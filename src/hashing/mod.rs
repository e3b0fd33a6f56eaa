//! BLAKE3 helpers for embedding memoisation and feature hashing.

/// Full 32-byte BLAKE3 digest of a text; used as the embedding cache key.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Only used for bucketing (feature hashing), where a collision merges two
/// features into one dimension rather than corrupting anything.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Maps a token to a bucket in `0..dim`. `dim` must be non-zero.
#[inline]
pub fn token_bucket(token: &str, dim: usize) -> usize {
    (hash_to_u64(token.as_bytes()) % dim as u64) as usize
}
