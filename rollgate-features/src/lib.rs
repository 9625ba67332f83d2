//! Feature targeting for Rollgate
//!
//! Decides, for a user and a named feature, whether the feature is active.
//! Decisions combine a global switch, explicit allow/deny lists and a
//! percentage rollout driven by a consistent hash, so a user's answer does not
//! flicker as a rollout widens.
//!
//! The engine is synchronous and holds no mutable state: configuration is an
//! immutable snapshot handed in by the host, and every call is a pure
//! evaluation that is safe to run from any number of threads.
//!
//! # Quick Start
//!
//! ```
//! use rollgate_features::*;
//!
//! let table = FeatureTable::new()
//!     .with_feature(Environment::Production, "new-dashboard", FeatureConfig::rollout(25.0))
//!     .with_feature_everywhere("auth", FeatureConfig::enabled());
//!
//! let engine = RolloutEngine::new(table, Environment::Production);
//! let context = FeatureCheckContext::new().with_user_id("user-123");
//!
//! let result = engine.is_feature_enabled("auth", &context);
//! assert!(result.enabled);
//! assert_eq!(result.reason, ReasonCode::RolloutIncluded);
//! ```
//!
//! # Bucketing
//!
//! ```
//! use rollgate_features::bucket::{default_user_bucket, is_user_in_rollout};
//!
//! let bucket = default_user_bucket("user-123", "auth");
//! assert!((0.0..100.0).contains(&bucket));
//! assert!(is_user_in_rollout("user-123", "auth", 100.0));
//! assert!(!is_user_in_rollout("user-123", "auth", 0.0));
//! ```
//!
//! # Guards
//!
//! ```
//! use rollgate_features::*;
//! use std::time::Duration;
//!
//! let engine = RolloutEngine::new(FeatureTable::new(), Environment::Local);
//! let guard = FeatureGuard::unavailable(Duration::from_secs(60));
//!
//! match engine.guard(&guard, "unknown", &FeatureCheckContext::anonymous()) {
//!     GuardOutcome::Reject(rejection) => assert_eq!(rejection.status, 503),
//!     GuardOutcome::Allow => unreachable!(),
//! }
//! ```

pub mod bucket;
pub mod engine;
pub mod environment;
pub mod flag;
pub mod guard;
pub mod hash;
pub mod source;

pub use bucket::{Bucketer, DEFAULT_SALT};
pub use engine::RolloutEngine;
pub use environment::{Environment, ParseEnvironmentError};
pub use flag::{FeatureCheckContext, FeatureCheckResult, FeatureConfig, ReasonCode};
pub use guard::{FeatureGuard, GuardMode, GuardOutcome, GuardRejection, RouteGuard, RouteOutcome};
pub use hash::{hash, murmur3_utf16};
pub use source::{FeatureSource, FeatureTable};
