//! Guard adapters
//!
//! Translate a [`FeatureCheckResult`] into an HTTP rejection or a page
//! redirect. These adapters add no decision logic of their own.

use crate::engine::RolloutEngine;
use crate::flag::{FeatureCheckContext, FeatureCheckResult};
use crate::source::FeatureSource;
use serde_json::json;
use std::time::Duration;

/// How a disabled feature is reported over HTTP
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GuardMode {
    /// Pretend the feature does not exist (404)
    #[default]
    NotFound,
    /// Report the feature as temporarily unavailable (503 + `Retry-After`)
    Unavailable { retry_after: Duration },
}

/// Rejection produced when a guarded feature is off
#[derive(Debug, Clone, PartialEq)]
pub struct GuardRejection {
    /// HTTP status code
    pub status: u16,
    /// Value for the `Retry-After` header, in seconds
    pub retry_after_secs: Option<u64>,
    /// JSON body: `{ "error", "feature", "reason" }`
    pub body: serde_json::Value,
}

impl GuardRejection {
    /// Header pairs to attach to the response
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        if let Some(secs) = self.retry_after_secs {
            headers.push(("Retry-After", secs.to_string()));
        }
        headers
    }
}

/// Result of an HTTP guard check
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    Allow,
    Reject(GuardRejection),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

/// HTTP guard for a feature-gated endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureGuard {
    mode: GuardMode,
}

impl FeatureGuard {
    /// Guard that answers 404 for disabled features
    pub fn not_found() -> Self {
        Self {
            mode: GuardMode::NotFound,
        }
    }

    /// Guard that answers 503 with a `Retry-After` hint
    pub fn unavailable(retry_after: Duration) -> Self {
        Self {
            mode: GuardMode::Unavailable { retry_after },
        }
    }

    pub fn mode(&self) -> GuardMode {
        self.mode
    }

    /// Translate a decision for `feature`
    pub fn check(&self, feature: &str, result: &FeatureCheckResult) -> GuardOutcome {
        if result.enabled {
            return GuardOutcome::Allow;
        }

        let (status, error, retry_after_secs) = match self.mode {
            GuardMode::NotFound => (404, "Not Found", None),
            GuardMode::Unavailable { retry_after } => {
                (503, "Feature temporarily unavailable", Some(retry_after.as_secs()))
            }
        };

        GuardOutcome::Reject(GuardRejection {
            status,
            retry_after_secs,
            body: json!({
                "error": error,
                "feature": feature,
                "reason": result.reason,
            }),
        })
    }
}

/// Result of a page-route guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Render,
    Redirect(String),
}

/// Page-routing guard that redirects away from disabled features
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    fallback: String,
}

impl RouteGuard {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn check(&self, result: &FeatureCheckResult) -> RouteOutcome {
        if result.enabled {
            RouteOutcome::Render
        } else {
            RouteOutcome::Redirect(self.fallback.clone())
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new("/404")
    }
}

impl<S: FeatureSource> RolloutEngine<S> {
    /// Evaluate `feature` and translate the decision through `guard`
    pub fn guard(
        &self,
        guard: &FeatureGuard,
        feature: impl AsRef<str>,
        context: &FeatureCheckContext,
    ) -> GuardOutcome {
        let feature = feature.as_ref();
        guard.check(feature, &self.is_feature_enabled(feature, context))
    }

    /// Evaluate `feature` and translate the decision through a route guard
    pub fn guard_route(
        &self,
        guard: &RouteGuard,
        feature: impl AsRef<str>,
        context: &FeatureCheckContext,
    ) -> RouteOutcome {
        guard.check(&self.is_feature_enabled(feature, context))
    }
}
