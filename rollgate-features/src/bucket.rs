//! User bucketing
//!
//! Places a user on a stable position in `[0, 100)` for a given feature. The
//! position is recomputed on every call and never stored.

use crate::hash::hash;

/// Salt mixed into every bucket key unless one is configured.
pub const DEFAULT_SALT: &str = "feature-flags";

/// Number of distinct buckets (three decimal places over `[0, 100)`).
const BUCKET_SPACE: u32 = 100_000;

/// Bucket for `user_id` on `feature` under an explicit salt.
///
/// The hash key is `"{salt}:{feature}:{user_id}"`. The result is in
/// `[0.0, 99.999]` with three-decimal resolution.
///
/// # Examples
///
/// ```
/// use rollgate_features::bucket::user_bucket;
///
/// let bucket = user_bucket("user-123", "auth", "feature-flags");
/// assert_eq!(bucket, 29.781);
/// ```
pub fn user_bucket(user_id: &str, feature: &str, salt: &str) -> f64 {
    let key = format!("{}:{}:{}", salt, feature, user_id);
    f64::from(hash(&key) % BUCKET_SPACE) / 1000.0
}

/// Bucket for `user_id` on `feature` under [`DEFAULT_SALT`].
pub fn default_user_bucket(user_id: &str, feature: &str) -> f64 {
    user_bucket(user_id, feature, DEFAULT_SALT)
}

/// Whether `user_id` falls inside a `percentage` rollout of `feature`.
///
/// Strict less-than: `0` excludes everyone, `100` includes everyone.
pub fn is_user_in_rollout(user_id: &str, feature: &str, percentage: f64) -> bool {
    default_user_bucket(user_id, feature) < percentage
}

/// Bucket assigner bound to a salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucketer {
    salt: String,
}

impl Bucketer {
    /// Create a bucketer with a custom salt
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn bucket(&self, user_id: &str, feature: &str) -> f64 {
        user_bucket(user_id, feature, &self.salt)
    }

    pub fn in_rollout(&self, user_id: &str, feature: &str, percentage: f64) -> bool {
        self.bucket(user_id, feature) < percentage
    }
}

impl Default for Bucketer {
    fn default() -> Self {
        Self::new(DEFAULT_SALT)
    }
}
