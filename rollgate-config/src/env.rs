// Environment variable loading
//
// Flat keys have the shape `<PREFIX>_<ENV>_<FEATURE>_<FIELD>`, e.g.
// `ROLLGATE_PRODUCTION_NEW_DASHBOARD_ROLLOUT=25`. Feature names are
// upper-snake in the key and kebab-case in the table.

use crate::{ConfigError, Result};
use rollgate_features::{Environment, FeatureConfig, FeatureTable};
use std::env;
use tracing::trace;

/// Default prefix for feature and environment variables
pub const DEFAULT_PREFIX: &str = "ROLLGATE";

/// A field of a feature that a flat key can set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureField {
    Enabled,
    Rollout,
    Whitelist,
    Blacklist,
}

impl FeatureField {
    const SUFFIXES: [(&'static str, FeatureField); 5] = [
        ("_ROLLOUT_PERCENTAGE", FeatureField::Rollout),
        ("_ENABLED", FeatureField::Enabled),
        ("_ROLLOUT", FeatureField::Rollout),
        ("_WHITELIST", FeatureField::Whitelist),
        ("_BLACKLIST", FeatureField::Blacklist),
    ];

    fn apply(&self, config: &mut FeatureConfig, key: &str, value: &str) -> Result<()> {
        match self {
            FeatureField::Enabled => config.enabled = parse_bool(key, value)?,
            FeatureField::Rollout => {
                config.rollout_percentage = value.trim().parse().map_err(|_| {
                    ConfigError::ParseError(format!("{}: invalid rollout percentage {:?}", key, value))
                })?
            }
            FeatureField::Whitelist => config.whitelist = parse_list(value).collect(),
            FeatureField::Blacklist => config.blacklist = parse_list(value).collect(),
        }
        Ok(())
    }
}

/// A parsed flat feature key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureKey {
    pub environment: Environment,
    pub feature: String,
    pub field: FeatureField,
}

impl FeatureKey {
    /// Parse `key` under `prefix`; `None` if the key is not a feature key.
    pub fn parse(prefix: &str, key: &str) -> Option<Self> {
        let rest = key
            .to_uppercase()
            .strip_prefix(prefix.to_uppercase().as_str())?
            .strip_prefix('_')?
            .to_string();

        let (environment, rest) = rest.split_once('_')?;
        let environment: Environment = environment.parse().ok()?;

        let (feature, field) = FeatureField::SUFFIXES
            .iter()
            .find_map(|(suffix, field)| rest.strip_suffix(*suffix).map(|f| (f, *field)))?;

        if feature.is_empty() {
            return None;
        }

        Some(Self {
            environment,
            feature: feature.to_lowercase().replace('_', "-"),
            field,
        })
    }
}

/// Apply flat `key=value` pairs to `table`, returning how many were used.
///
/// Keys that are not feature keys under `prefix` are ignored. Each key sets
/// one field and leaves the rest of the feature untouched; a feature first
/// seen here starts from the default-deny configuration.
pub fn apply_vars<I, K, V>(table: &mut FeatureTable, prefix: &str, vars: I) -> Result<usize>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut applied = 0;

    for (key, value) in vars {
        let key = key.as_ref();
        let Some(parsed) = FeatureKey::parse(prefix, key) else {
            continue;
        };

        trace!(
            key,
            environment = %parsed.environment,
            feature = %parsed.feature,
            "Applying feature override"
        );
        let config = table.entry(parsed.environment, &parsed.feature);
        parsed.field.apply(config, key, value.as_ref())?;
        applied += 1;
    }

    Ok(applied)
}

/// Environment variable loader
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_uppercase(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// All process variables that start with the prefix, sorted by key.
    ///
    /// Variables that are not valid UTF-8 are skipped. Sorting puts
    /// `_ROLLOUT_PERCENTAGE` after `_ROLLOUT`, so the longer key wins when both
    /// are set.
    pub fn load(&self) -> Vec<(String, String)> {
        let prefix = format!("{}_", self.prefix);
        let mut vars: Vec<(String, String)> = env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    trace!(key = ?key, "Skipping non UTF-8 environment variable");
                    None
                }
            })
            .filter(|(key, _)| key.to_uppercase().starts_with(&prefix))
            .collect();
        vars.sort();
        vars
    }

    /// Apply every feature variable in the process environment to `table`
    pub fn apply(&self, table: &mut FeatureTable) -> Result<usize> {
        apply_vars(table, &self.prefix, self.load())
    }

    /// Load a single prefixed variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = format!("{}_{}", self.prefix, key.to_uppercase());
        env::var(&full_key).map_err(ConfigError::EnvError)
    }

    /// Deployment environment from `<PREFIX>_ENV`, `Local` when unset.
    pub fn environment(&self) -> Result<Environment> {
        match self.load_var("ENV") {
            Ok(value) => Ok(value.parse::<Environment>()?),
            Err(ConfigError::EnvError(env::VarError::NotPresent)) => Ok(Environment::default()),
            Err(err) => Err(err),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// Deployment environment from `ROLLGATE_ENV`.
pub fn detect_environment() -> Result<Environment> {
    EnvLoader::default().environment()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::ParseError(format!(
            "{}: expected a boolean, got {:?}",
            key, value
        ))),
    }
}

fn parse_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
