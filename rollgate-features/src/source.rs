//! Configuration lookup
//!
//! The engine reads feature configuration through [`FeatureSource`]. How the
//! table is loaded (files, environment variables, a remote service) is the
//! host's business; [`FeatureTable`] is the in-memory snapshot most hosts use.

use crate::environment::{Environment, ParseEnvironmentError};
use crate::flag::FeatureConfig;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Synchronous, side-effect-free accessor for feature configuration.
pub trait FeatureSource: Send + Sync {
    /// Configuration for `feature` in `environment`, if registered
    fn lookup(&self, feature: &str, environment: Environment) -> Option<&FeatureConfig>;

    /// Every feature registered for `environment`, ordered by name
    fn features(&self, environment: Environment) -> Vec<(&str, &FeatureConfig)>;
}

impl<T: FeatureSource + ?Sized> FeatureSource for &T {
    fn lookup(&self, feature: &str, environment: Environment) -> Option<&FeatureConfig> {
        (**self).lookup(feature, environment)
    }

    fn features(&self, environment: Environment) -> Vec<(&str, &FeatureConfig)> {
        (**self).features(environment)
    }
}

impl<T: FeatureSource + ?Sized> FeatureSource for Arc<T> {
    fn lookup(&self, feature: &str, environment: Environment) -> Option<&FeatureConfig> {
        (**self).lookup(feature, environment)
    }

    fn features(&self, environment: Environment) -> Vec<(&str, &FeatureConfig)> {
        (**self).features(environment)
    }
}

/// Immutable per-environment feature table
///
/// Serialized as `{ "<environment>": { "<feature>": FeatureConfig } }`;
/// environment keys accept the same aliases as parsing an [`Environment`].
///
/// # Examples
///
/// ```
/// use rollgate_features::{Environment, FeatureConfig, FeatureSource, FeatureTable};
///
/// let table = FeatureTable::new()
///     .with_feature(Environment::Production, "auth", FeatureConfig::rollout(10.0))
///     .with_feature_everywhere("collections", FeatureConfig::enabled());
///
/// assert!(table.lookup("auth", Environment::Production).is_some());
/// assert!(table.lookup("auth", Environment::Local).is_none());
/// assert_eq!(table.features(Environment::Local).len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawFeatureTable")]
pub struct FeatureTable {
    environments: BTreeMap<Environment, BTreeMap<String, FeatureConfig>>,
}

type RawFeatureTable = BTreeMap<String, BTreeMap<String, FeatureConfig>>;

impl TryFrom<RawFeatureTable> for FeatureTable {
    type Error = ParseEnvironmentError;

    fn try_from(raw: RawFeatureTable) -> Result<Self, Self::Error> {
        let mut table = FeatureTable::new();
        for (environment, features) in raw {
            let environment: Environment = environment.parse()?;
            table
                .environments
                .entry(environment)
                .or_default()
                .extend(features);
        }
        Ok(table)
    }
}

impl Serialize for FeatureTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.environments.serialize(serializer)
    }
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature for one environment
    pub fn with_feature(
        mut self,
        environment: Environment,
        feature: impl Into<String>,
        config: FeatureConfig,
    ) -> Self {
        self.insert(environment, feature, config);
        self
    }

    /// Register a feature with the same configuration in every environment
    pub fn with_feature_everywhere(mut self, feature: impl Into<String>, config: FeatureConfig) -> Self {
        let feature = feature.into();
        for environment in Environment::ALL {
            self.insert(environment, feature.clone(), config.clone());
        }
        self
    }

    /// Insert or replace a feature, returning the previous configuration
    pub fn insert(
        &mut self,
        environment: Environment,
        feature: impl Into<String>,
        config: FeatureConfig,
    ) -> Option<FeatureConfig> {
        self.environments
            .entry(environment)
            .or_default()
            .insert(feature.into(), config)
    }

    /// Mutable access to a feature, creating a default-deny entry if missing
    pub fn entry(&mut self, environment: Environment, feature: &str) -> &mut FeatureConfig {
        self.environments
            .entry(environment)
            .or_default()
            .entry(feature.to_string())
            .or_default()
    }

    /// Overlay `other` on top of this table, replacing whole features
    pub fn merge(&mut self, other: FeatureTable) {
        for (environment, features) in other.environments {
            self.environments
                .entry(environment)
                .or_default()
                .extend(features);
        }
    }

    /// Mutable iteration over every (environment, feature, config)
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Environment, &str, &mut FeatureConfig)> {
        self.environments.iter_mut().flat_map(|(env, features)| {
            features
                .iter_mut()
                .map(move |(name, config)| (*env, name.as_str(), config))
        })
    }

    /// Iteration over every (environment, feature, config)
    pub fn iter(&self) -> impl Iterator<Item = (Environment, &str, &FeatureConfig)> {
        self.environments.iter().flat_map(|(env, features)| {
            features
                .iter()
                .map(move |(name, config)| (*env, name.as_str(), config))
        })
    }

    /// Total number of (environment, feature) entries
    pub fn len(&self) -> usize {
        self.environments.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FeatureSource for FeatureTable {
    fn lookup(&self, feature: &str, environment: Environment) -> Option<&FeatureConfig> {
        self.environments.get(&environment)?.get(feature)
    }

    fn features(&self, environment: Environment) -> Vec<(&str, &FeatureConfig)> {
        self.environments
            .get(&environment)
            .map(|features| {
                features
                    .iter()
                    .map(|(name, config)| (name.as_str(), config))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_per_environment() {
        let table = FeatureTable::new()
            .with_feature(Environment::Local, "auth", FeatureConfig::enabled())
            .with_feature(Environment::Production, "auth", FeatureConfig::rollout(5.0));

        assert_eq!(
            table.lookup("auth", Environment::Local),
            Some(&FeatureConfig::enabled())
        );
        assert_eq!(
            table
                .lookup("auth", Environment::Production)
                .map(|c| c.rollout_percentage),
            Some(5.0)
        );
        assert!(table.lookup("auth", Environment::Integration).is_none());
        assert!(table.lookup("missing", Environment::Local).is_none());
    }

    #[test]
    fn test_merge_replaces_features() {
        let mut base = FeatureTable::new()
            .with_feature(Environment::Local, "auth", FeatureConfig::enabled())
            .with_feature(Environment::Local, "beta", FeatureConfig::rollout(1.0));
        let overlay =
            FeatureTable::new().with_feature(Environment::Local, "beta", FeatureConfig::rollout(50.0));

        base.merge(overlay);

        assert_eq!(base.len(), 2);
        assert_eq!(
            base.lookup("beta", Environment::Local)
                .map(|c| c.rollout_percentage),
            Some(50.0)
        );
    }

    #[test]
    fn test_features_sorted_by_name() {
        let table = FeatureTable::new()
            .with_feature_everywhere("zeta", FeatureConfig::enabled())
            .with_feature_everywhere("alpha", FeatureConfig::enabled());

        let names: Vec<&str> = table
            .features(Environment::Integration)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_table_json_shape() {
        let table: FeatureTable = serde_json::from_str(
            r#"{
                "production": {
                    "auth": { "enabled": true, "rolloutPercentage": 20, "blacklist": ["mallory"] }
                }
            }"#,
        )
        .unwrap();

        let auth = table.lookup("auth", Environment::Production).unwrap();
        assert!(auth.enabled);
        assert_eq!(auth.rollout_percentage, 20.0);
        assert!(auth.blacklist.contains("mallory"));
    }

    #[test]
    fn test_table_environment_aliases() {
        let table: FeatureTable =
            serde_json::from_str(r#"{"prod": {"auth": {"enabled": true}}}"#).unwrap();
        assert!(table.lookup("auth", Environment::Production).is_some());

        let err = serde_json::from_str::<FeatureTable>(r#"{"moon": {}}"#).unwrap_err();
        assert!(err.to_string().contains("unknown environment"));
    }

    #[test]
    fn test_table_serializes_lowercase_keys() {
        let table = FeatureTable::new().with_feature(Environment::Integration, "auth", FeatureConfig::enabled());
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["integration"]["auth"]["enabled"], true);
        assert_eq!(json["integration"]["auth"]["rolloutPercentage"], 100.0);
    }

    #[test]
    fn test_arc_source() {
        let table = Arc::new(FeatureTable::new().with_feature_everywhere("auth", FeatureConfig::enabled()));
        assert!(table.lookup("auth", Environment::Local).is_some());
    }
}
