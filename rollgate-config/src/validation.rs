// Feature table validation

use crate::{ConfigError, Result};
use rollgate_features::{Environment, FeatureConfig, FeatureTable};
use std::fmt;
use tracing::warn;

/// A non-fatal problem found in a feature table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub environment: Environment,
    pub feature: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.environment, self.feature, self.message)
    }
}

/// Warnings collected while validating a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn push(&mut self, environment: Environment, feature: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            environment,
            feature: feature.to_string(),
            message: message.into(),
        });
    }
}

/// Trait for validating feature configuration
///
/// Problems the engine can still evaluate are collected as warnings.
pub trait Validate {
    fn validate(&self) -> Result<ValidationReport>;
}

impl Validate for FeatureTable {
    fn validate(&self) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        for (environment, feature, config) in self.iter() {
            if let Err(ConfigError::ValidationError(message)) = ConfigValidator::feature_name(feature) {
                report.push(environment, feature, message);
            }
            check_config(&mut report, environment, feature, config);
        }

        Ok(report)
    }
}

fn check_config(
    report: &mut ValidationReport,
    environment: Environment,
    feature: &str,
    config: &FeatureConfig,
) {
    let rollout = config.rollout_percentage;
    if rollout.is_nan() {
        report.push(environment, feature, "rollout percentage is NaN, treated as 0");
    } else if ConfigValidator::in_range(rollout, 0.0, 100.0, "rollout percentage").is_err() {
        report.push(
            environment,
            feature,
            format!("rollout percentage {} is outside 0-100, clamped to {}", rollout, config.effective_rollout()),
        );
    }

    for user in config.whitelist.intersection(&config.blacklist) {
        report.push(
            environment,
            feature,
            format!("user {:?} is on both lists; the blacklist wins", user),
        );
    }

    if config.enabled && config.effective_rollout() == 0.0 && config.whitelist.is_empty() {
        report.push(environment, feature, "enabled but reaches no identified users");
    }
}

/// Clamp every rollout percentage into `[0, 100]`, returning how many changed.
pub fn sanitize(table: &mut FeatureTable) -> usize {
    let mut changed = 0;
    for (environment, feature, config) in table.iter_mut() {
        let clamped = config.effective_rollout();
        if clamped.to_bits() != config.rollout_percentage.to_bits() {
            warn!(
                %environment,
                feature,
                from = config.rollout_percentage,
                to = clamped,
                "Clamping rollout percentage"
            );
            config.rollout_percentage = clamped;
            changed += 1;
        }
    }
    changed
}

/// Field-level validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a number is within range
    pub fn in_range<T: PartialOrd + fmt::Display>(value: T, min: T, max: T, field: &str) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {}, got {}",
                field, min, max, value
            )));
        }
        Ok(())
    }

    /// Feature names are non-empty and free of whitespace and `:`
    ///
    /// A `:` in the name makes the `salt:feature:user` bucket key ambiguous,
    /// and whitespace cannot be expressed in environment keys.
    pub fn feature_name(name: &str) -> Result<()> {
        Self::not_empty(name, "feature name")?;
        if name.contains(':') {
            return Err(ConfigError::ValidationError(format!(
                "feature name {:?} contains ':', which makes its bucket key ambiguous",
                name
            )));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "feature name {:?} contains whitespace",
                name
            )));
        }
        Ok(())
    }
}
