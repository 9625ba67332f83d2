//! Consistent 32-bit key hashing
//!
//! A MurmurHash3-style mixer that treats every UTF-16 code unit of the key as
//! a full 32-bit block. This is not bit-compatible with byte-oriented
//! MurmurHash3 libraries; bucket assignments depend on this exact variant, so
//! it must not be swapped for a "standard" implementation.

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Hash a key with seed `0`.
///
/// # Examples
///
/// ```
/// use rollgate_features::hash;
///
/// assert_eq!(hash(""), 0);
/// assert_eq!(hash("hello"), 449_616_461);
/// ```
#[inline]
pub fn hash(key: &str) -> u32 {
    murmur3_utf16(key, 0)
}

/// Hash a key with an explicit seed.
///
/// Every UTF-16 code unit is mixed as its own block, and the length fed into
/// finalization is the number of UTF-16 code units (so a character outside
/// the Basic Multilingual Plane counts twice). All arithmetic wraps modulo
/// 2^32.
pub fn murmur3_utf16(key: &str, seed: u32) -> u32 {
    let mut h1 = seed;
    let mut len: u32 = 0;

    for unit in key.encode_utf16() {
        let mut k1 = u32::from(unit);
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2);

        h1 ^= k1;
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe654_6b64);

        len = len.wrapping_add(1);
    }

    h1 ^= len;
    fmix32(h1)
}

/// Final avalanche mix.
#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
