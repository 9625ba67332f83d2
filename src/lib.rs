// Rollgate - deterministic feature targeting
//
// Decides whether a named feature is active for a user: a global switch,
// explicit allow/deny lists and a percentage rollout driven by a consistent
// hash. Configuration loading and logging setup live in optional crates.

// Re-export the decision engine
pub use rollgate_features::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use rollgate_config;

#[cfg(feature = "log")]
pub use rollgate_log;

/// Prelude for common imports
///
/// ```
/// use rollgate::prelude::*;
///
/// let engine = RolloutEngine::new(FeatureTable::new(), Environment::Local);
/// assert!(!engine.is_enabled("anything", &FeatureCheckContext::anonymous()));
/// ```
pub mod prelude {
    pub use rollgate_features::{
        Environment, FeatureCheckContext, FeatureCheckResult, FeatureConfig, FeatureGuard,
        FeatureSource, FeatureTable, GuardOutcome, ReasonCode, RolloutEngine, RouteGuard,
        RouteOutcome,
    };

    #[cfg(feature = "config")]
    pub use rollgate_config::{FeatureConfigBuilder, detect_environment};
}
