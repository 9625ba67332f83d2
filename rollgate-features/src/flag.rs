//! Feature configuration and decision types
//!
//! Defines the per-feature configuration snapshot, the calling context and the
//! decision result with its closed set of reason codes.

use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Configuration of a single feature in a single environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureConfig {
    /// Global on/off switch
    pub enabled: bool,

    /// Share of users (0-100) that get the feature
    #[serde(alias = "rollout_percentage", alias = "rollout")]
    pub rollout_percentage: f64,

    /// Users that always get the feature
    pub whitelist: BTreeSet<String>,

    /// Users that never get the feature; wins over the whitelist
    pub blacklist: BTreeSet<String>,
}

impl FeatureConfig {
    /// Disabled, zero rollout, empty lists. Used for unknown features.
    pub fn default_deny() -> Self {
        Self {
            enabled: false,
            rollout_percentage: 0.0,
            whitelist: BTreeSet::new(),
            blacklist: BTreeSet::new(),
        }
    }

    /// Enabled for everyone
    pub fn enabled() -> Self {
        Self::rollout(100.0)
    }

    /// Enabled for a percentage of users
    pub fn rollout(percentage: f64) -> Self {
        Self {
            enabled: true,
            rollout_percentage: percentage,
            ..Self::default_deny()
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_rollout(mut self, percentage: f64) -> Self {
        self.rollout_percentage = percentage;
        self
    }

    pub fn with_whitelisted(mut self, users: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.whitelist.extend(users.into_iter().map(Into::into));
        self
    }

    pub fn with_blacklisted(mut self, users: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.blacklist.extend(users.into_iter().map(Into::into));
        self
    }

    /// Rollout percentage clamped into `[0, 100]`, with NaN read as `0`.
    pub fn effective_rollout(&self) -> f64 {
        if self.rollout_percentage.is_nan() {
            0.0
        } else {
            self.rollout_percentage.clamp(0.0, 100.0)
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::default_deny()
    }
}

/// Per-call context supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureCheckContext {
    /// Identity of the caller, if any
    pub user_id: Option<String>,

    /// Environment override; `None` means the engine's default
    pub environment: Option<Environment>,

    /// Let callers without an identity through
    pub allow_anonymous: bool,
}

impl FeatureCheckContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anonymous context that is allowed through
    pub fn anonymous() -> Self {
        Self::default().with_allow_anonymous(true)
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_allow_anonymous(mut self, allow: bool) -> Self {
        self.allow_anonymous = allow;
        self
    }

    /// The user id, with an empty string read as "no id supplied".
    pub fn effective_user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Why a decision was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    FeatureDisabled,
    UserBlacklisted,
    UserWhitelisted,
    NoUserId,
    AnonymousAllowed,
    RolloutIncluded,
    RolloutExcluded,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::FeatureDisabled => "feature_disabled",
            ReasonCode::UserBlacklisted => "user_blacklisted",
            ReasonCode::UserWhitelisted => "user_whitelisted",
            ReasonCode::NoUserId => "no_user_id",
            ReasonCode::AnonymousAllowed => "anonymous_allowed",
            ReasonCode::RolloutIncluded => "rollout_included",
            ReasonCode::RolloutExcluded => "rollout_excluded",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a feature check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCheckResult {
    pub enabled: bool,
    pub reason: ReasonCode,
}

impl FeatureCheckResult {
    pub fn new(enabled: bool, reason: ReasonCode) -> Self {
        Self { enabled, reason }
    }

    pub fn denied(reason: ReasonCode) -> Self {
        Self::new(false, reason)
    }

    pub fn granted(reason: ReasonCode) -> Self {
        Self::new(true, reason)
    }
}
