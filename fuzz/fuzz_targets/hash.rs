//! Fuzz target for key hashing and bucketing.
//!
//! Any string must hash without panicking, and every bucket must land in
//! `[0, 100)`.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rollgate_features::bucket::user_bucket;
use rollgate_features::murmur3_utf16;

#[derive(Debug, Arbitrary)]
struct FuzzKey {
    user: String,
    feature: String,
    salt: String,
    seed: u32,
}

fuzz_target!(|input: FuzzKey| {
    let first = murmur3_utf16(&input.user, input.seed);
    assert_eq!(first, murmur3_utf16(&input.user, input.seed));

    let bucket = user_bucket(&input.user, &input.feature, &input.salt);
    assert!((0.0..100.0).contains(&bucket));
});
