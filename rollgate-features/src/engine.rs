//! Rollout decisions
//!
//! [`RolloutEngine`] evaluates a feature for a caller by walking a fixed
//! precedence ladder; the first matching rule wins:
//!
//! 1. unknown feature → default-deny configuration
//! 2. feature disabled → `feature_disabled`
//! 3. user on the blacklist → `user_blacklisted`
//! 4. user on the whitelist → `user_whitelisted`
//! 5. no user id → `anonymous_allowed` or `no_user_id`
//! 6. otherwise the user's bucket decides → `rollout_included` / `rollout_excluded`

use crate::bucket::Bucketer;
use crate::environment::Environment;
use crate::flag::{FeatureCheckContext, FeatureCheckResult, FeatureConfig, ReasonCode};
use crate::source::FeatureSource;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Feature decision engine over an immutable configuration source
#[derive(Debug, Clone)]
pub struct RolloutEngine<S> {
    source: S,
    default_environment: Environment,
    bucketer: Bucketer,
}

impl<S: FeatureSource> RolloutEngine<S> {
    /// Create an engine that uses `default_environment` when the context
    /// carries none.
    pub fn new(source: S, default_environment: Environment) -> Self {
        Self {
            source,
            default_environment,
            bucketer: Bucketer::default(),
        }
    }

    /// Use a custom bucketing salt
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.bucketer = Bucketer::new(salt);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn default_environment(&self) -> Environment {
        self.default_environment
    }

    pub fn bucketer(&self) -> &Bucketer {
        &self.bucketer
    }

    /// Evaluate a feature for a caller
    ///
    /// # Examples
    ///
    /// ```
    /// use rollgate_features::*;
    ///
    /// let table = FeatureTable::new().with_feature_everywhere(
    ///     "auth",
    ///     FeatureConfig::rollout(0.0).with_whitelisted(["user-vip"]),
    /// );
    /// let engine = RolloutEngine::new(table, Environment::Production);
    ///
    /// let vip = FeatureCheckContext::new().with_user_id("user-vip");
    /// assert_eq!(
    ///     engine.is_feature_enabled("auth", &vip),
    ///     FeatureCheckResult::granted(ReasonCode::UserWhitelisted)
    /// );
    /// ```
    pub fn is_feature_enabled(
        &self,
        feature: impl AsRef<str>,
        context: &FeatureCheckContext,
    ) -> FeatureCheckResult {
        let feature = feature.as_ref();
        let environment = context.environment.unwrap_or(self.default_environment);

        let default_deny;
        let config = match self.source.lookup(feature, environment) {
            Some(config) => config,
            None => {
                debug!(feature, %environment, "Unknown feature, using default-deny configuration");
                default_deny = FeatureConfig::default_deny();
                &default_deny
            }
        };

        let result = self.decide(feature, config, context);
        trace!(
            feature,
            %environment,
            enabled = result.enabled,
            reason = %result.reason,
            "Feature evaluated"
        );
        result
    }

    fn decide(
        &self,
        feature: &str,
        config: &FeatureConfig,
        context: &FeatureCheckContext,
    ) -> FeatureCheckResult {
        if !config.enabled {
            return FeatureCheckResult::denied(ReasonCode::FeatureDisabled);
        }

        let user_id = context.effective_user_id();

        if let Some(user_id) = user_id {
            if config.blacklist.contains(user_id) {
                return FeatureCheckResult::denied(ReasonCode::UserBlacklisted);
            }
            if config.whitelist.contains(user_id) {
                return FeatureCheckResult::granted(ReasonCode::UserWhitelisted);
            }
        }

        let Some(user_id) = user_id else {
            return if context.allow_anonymous {
                FeatureCheckResult::granted(ReasonCode::AnonymousAllowed)
            } else {
                FeatureCheckResult::denied(ReasonCode::NoUserId)
            };
        };

        if self
            .bucketer
            .in_rollout(user_id, feature, config.effective_rollout())
        {
            FeatureCheckResult::granted(ReasonCode::RolloutIncluded)
        } else {
            FeatureCheckResult::denied(ReasonCode::RolloutExcluded)
        }
    }

    /// Boolean-only variant of [`is_feature_enabled`](Self::is_feature_enabled)
    pub fn is_enabled(&self, feature: impl AsRef<str>, context: &FeatureCheckContext) -> bool {
        self.is_feature_enabled(feature, context).enabled
    }

    /// Evaluate several features for one caller
    pub fn evaluate_all<I>(
        &self,
        features: I,
        context: &FeatureCheckContext,
    ) -> BTreeMap<String, FeatureCheckResult>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        features
            .into_iter()
            .map(|feature| {
                let result = self.is_feature_enabled(feature.as_ref(), context);
                (feature.as_ref().to_string(), result)
            })
            .collect()
    }

    /// Configuration for one feature, with the default-deny fallback applied
    pub fn config_for(&self, feature: impl AsRef<str>, environment: Environment) -> FeatureConfig {
        self.source
            .lookup(feature.as_ref(), environment)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of every registered feature in `environment`
    pub fn resolved_config(&self, environment: Environment) -> BTreeMap<String, FeatureConfig> {
        self.source
            .features(environment)
            .into_iter()
            .map(|(name, config)| (name.to_string(), config.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FeatureTable;

    fn engine_with(config: FeatureConfig) -> RolloutEngine<FeatureTable> {
        let table = FeatureTable::new().with_feature_everywhere("auth", config);
        RolloutEngine::new(table, Environment::Local)
    }

    fn user(id: &str) -> FeatureCheckContext {
        FeatureCheckContext::new().with_user_id(id)
    }

    #[test]
    fn test_unknown_feature_is_denied() {
        let engine = engine_with(FeatureConfig::enabled());
        let result = engine.is_feature_enabled("does-not-exist", &FeatureCheckContext::anonymous());
        assert_eq!(result, FeatureCheckResult::denied(ReasonCode::FeatureDisabled));
        assert_eq!(
            engine.config_for("does-not-exist", Environment::Local),
            FeatureConfig::default_deny()
        );
    }

    #[test]
    fn test_disabled_wins_over_everything() {
        let engine = engine_with(
            FeatureConfig::enabled()
                .with_enabled(false)
                .with_whitelisted(["user-vip"]),
        );

        for context in [
            user("user-vip"),
            user("user-1"),
            FeatureCheckContext::anonymous(),
            FeatureCheckContext::new(),
        ] {
            assert_eq!(
                engine.is_feature_enabled("auth", &context),
                FeatureCheckResult::denied(ReasonCode::FeatureDisabled)
            );
        }
    }

    #[test]
    fn test_blacklist_beats_whitelist() {
        let engine = engine_with(
            FeatureConfig::enabled()
                .with_whitelisted(["both"])
                .with_blacklisted(["both"]),
        );

        assert_eq!(
            engine.is_feature_enabled("auth", &user("both")),
            FeatureCheckResult::denied(ReasonCode::UserBlacklisted)
        );
    }

    #[test]
    fn test_missing_user_id() {
        let engine = engine_with(FeatureConfig::enabled());

        assert_eq!(
            engine.is_feature_enabled("auth", &user("")),
            FeatureCheckResult::denied(ReasonCode::NoUserId)
        );
        assert_eq!(
            engine.is_feature_enabled("auth", &FeatureCheckContext::new()),
            FeatureCheckResult::denied(ReasonCode::NoUserId)
        );
        assert_eq!(
            engine.is_feature_enabled("auth", &user("").with_allow_anonymous(true)),
            FeatureCheckResult::granted(ReasonCode::AnonymousAllowed)
        );
    }

    #[test]
    fn test_empty_user_id_skips_lists() {
        // An empty id never matches a list entry, even an empty one.
        let engine = engine_with(FeatureConfig::enabled().with_blacklisted([""]));
        assert_eq!(
            engine.is_feature_enabled("auth", &FeatureCheckContext::anonymous().with_user_id("")),
            FeatureCheckResult::granted(ReasonCode::AnonymousAllowed)
        );
    }

    #[test]
    fn test_full_rollout_includes_everyone() {
        let engine = engine_with(FeatureConfig::rollout(100.0));
        for i in 0..200 {
            assert_eq!(
                engine.is_feature_enabled("auth", &user(&format!("user-{}", i))),
                FeatureCheckResult::granted(ReasonCode::RolloutIncluded)
            );
        }
    }

    #[test]
    fn test_whitelist_with_zero_rollout() {
        let engine = engine_with(FeatureConfig::rollout(0.0).with_whitelisted(["user-vip"]));

        assert_eq!(
            engine.is_feature_enabled("auth", &user("user-vip")),
            FeatureCheckResult::granted(ReasonCode::UserWhitelisted)
        );
        assert_eq!(
            engine.is_feature_enabled("auth", &user("user-other")),
            FeatureCheckResult::denied(ReasonCode::RolloutExcluded)
        );
    }

    #[test]
    fn test_partial_rollout_uses_bucket() {
        // user-123 sits at 29.781 for "auth"
        let context = user("user-123");
        assert!(engine_with(FeatureConfig::rollout(29.782)).is_enabled("auth", &context));
        assert!(!engine_with(FeatureConfig::rollout(29.781)).is_enabled("auth", &context));
    }

    #[test]
    fn test_out_of_range_rollout_is_clamped() {
        let context = user("user-123");
        assert!(engine_with(FeatureConfig::rollout(1_000.0)).is_enabled("auth", &context));
        assert!(!engine_with(FeatureConfig::rollout(-3.0)).is_enabled("auth", &context));
        assert!(!engine_with(FeatureConfig::rollout(f64::NAN)).is_enabled("auth", &context));
    }

    #[test]
    fn test_context_environment_overrides_default() {
        let table = FeatureTable::new()
            .with_feature(Environment::Local, "auth", FeatureConfig::enabled())
            .with_feature(
                Environment::Production,
                "auth",
                FeatureConfig::enabled().with_enabled(false),
            );
        let engine = RolloutEngine::new(table, Environment::Local);

        assert!(engine.is_enabled("auth", &user("user-1")));
        assert!(!engine.is_enabled("auth", &user("user-1").with_environment(Environment::Production)));
    }

    #[test]
    fn test_custom_salt_changes_assignment() {
        let default = engine_with(FeatureConfig::rollout(20.0));
        let salted = engine_with(FeatureConfig::rollout(20.0)).with_salt("other-salt");
        let context = user("user-123");

        // 29.781 under the default salt, 10.132 under "other-salt"
        assert!(!default.is_enabled("auth", &context));
        assert!(salted.is_enabled("auth", &context));
        assert_eq!(salted.bucketer().salt(), "other-salt");
    }

    #[test]
    fn test_evaluate_all() {
        let table = FeatureTable::new()
            .with_feature_everywhere("auth", FeatureConfig::enabled())
            .with_feature_everywhere("beta", FeatureConfig::enabled().with_blacklisted(["user-1"]));
        let engine = RolloutEngine::new(table, Environment::Local);

        let results = engine.evaluate_all(["auth", "beta", "ghost"], &user("user-1"));

        assert_eq!(results.len(), 3);
        assert_eq!(results["auth"].reason, ReasonCode::RolloutIncluded);
        assert_eq!(results["beta"].reason, ReasonCode::UserBlacklisted);
        assert_eq!(results["ghost"].reason, ReasonCode::FeatureDisabled);
    }

    #[test]
    fn test_resolved_config() {
        let table = FeatureTable::new()
            .with_feature(Environment::Production, "auth", FeatureConfig::rollout(5.0))
            .with_feature(Environment::Local, "beta", FeatureConfig::enabled());
        let engine = RolloutEngine::new(table, Environment::Local);

        let production = engine.resolved_config(Environment::Production);
        assert_eq!(production.len(), 1);
        assert_eq!(production["auth"].rollout_percentage, 5.0);
        assert!(engine.resolved_config(Environment::Integration).is_empty());
    }

    #[test]
    fn test_feature_enum_names() {
        #[derive(Clone, Copy)]
        enum Feature {
            Auth,
        }

        impl AsRef<str> for Feature {
            fn as_ref(&self) -> &str {
                match self {
                    Feature::Auth => "auth",
                }
            }
        }

        let engine = engine_with(FeatureConfig::enabled());
        assert!(engine.is_enabled(Feature::Auth, &user("user-1")));
        assert!(engine.evaluate_all([Feature::Auth], &user("user-1"))["auth"].enabled);
    }
}
