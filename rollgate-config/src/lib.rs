// Feature configuration loading for Rollgate
//
// Builds an immutable `FeatureTable` from layered sources: JSON / TOML feature
// files, `.env` style files and prefixed process environment variables. Layers
// are applied in the order they were added.

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::{DEFAULT_PREFIX, EnvLoader, FeatureField, FeatureKey, apply_vars, detect_environment};
pub use error::{ConfigError, Result};
pub use loader::{FeatureFileLoader, FileContents, FileFormat};
pub use validation::{ConfigValidator, Validate, ValidationIssue, ValidationReport, sanitize};

use rollgate_features::FeatureTable;
use std::path::PathBuf;
use tracing::{debug, info, warn};

enum Layer {
    Table(FeatureTable),
    File(PathBuf, Option<FileFormat>),
    Dotenv(Option<PathBuf>),
    Env,
}

/// Builder for a feature table
///
/// ```no_run
/// use rollgate_config::FeatureConfigBuilder;
///
/// let table = FeatureConfigBuilder::new()
///     .add_file("config/features.toml")
///     .load_dotenv(None)
///     .load_env()
///     .build()?;
/// # Ok::<(), rollgate_config::ConfigError>(())
/// ```
pub struct FeatureConfigBuilder {
    prefix: String,
    layers: Vec<Layer>,
}

impl FeatureConfigBuilder {
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            layers: Vec::new(),
        }
    }

    /// Set the environment variable prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into().to_uppercase();
        self
    }

    /// Start from an in-memory table
    pub fn add_table(mut self, table: FeatureTable) -> Self {
        self.layers.push(Layer::Table(table));
        self
    }

    /// Add a feature file, format detected from its name
    pub fn add_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.layers.push(Layer::File(path.into(), None));
        self
    }

    /// Add a feature file with an explicit format
    pub fn add_file_with_format(mut self, path: impl Into<PathBuf>, format: FileFormat) -> Self {
        self.layers.push(Layer::File(path.into(), Some(format)));
        self
    }

    /// Read feature keys from a `.env` file without touching the process
    /// environment. With no path, a missing `./.env` is not an error.
    pub fn load_dotenv(mut self, path: Option<PathBuf>) -> Self {
        self.layers.push(Layer::Dotenv(path));
        self
    }

    /// Read feature keys from the process environment
    pub fn load_env(mut self) -> Self {
        self.layers.push(Layer::Env);
        self
    }

    /// Build, validate and sanitize the table
    pub fn build(self) -> Result<FeatureTable> {
        self.build_with_report().map(|(table, _)| table)
    }

    /// Build the table and return the validation warnings with it
    pub fn build_with_report(self) -> Result<(FeatureTable, ValidationReport)> {
        let mut table = FeatureTable::new();

        for layer in self.layers {
            match layer {
                Layer::Table(other) => table.merge(other),
                Layer::File(path, format) => {
                    let loader = match format {
                        Some(format) => FeatureFileLoader::new(format),
                        None => FeatureFileLoader::auto(&path)?,
                    };
                    debug!(path = %path.display(), format = ?loader.format(), "Loading feature file");
                    match loader.load_file(&path)? {
                        FileContents::Table(other) => table.merge(other),
                        FileContents::Vars(vars) => {
                            apply_vars(&mut table, &self.prefix, vars)?;
                        }
                    }
                }
                Layer::Dotenv(path) => {
                    let vars = read_dotenv(path)?;
                    apply_vars(&mut table, &self.prefix, vars)?;
                }
                Layer::Env => {
                    let applied = EnvLoader::new(self.prefix.as_str()).apply(&mut table)?;
                    debug!(applied, "Applied feature environment variables");
                }
            }
        }

        let report = table.validate()?;
        for issue in &report.warnings {
            warn!(%issue, "Feature configuration warning");
        }
        sanitize(&mut table);

        info!(entries = table.len(), "Feature table loaded");
        Ok((table, report))
    }
}

impl Default for FeatureConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn read_dotenv(path: Option<PathBuf>) -> Result<Vec<(String, String)>> {
    let iter = match path {
        Some(path) => dotenvy::from_path_iter(&path).map_err(|e| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?,
        None => match dotenvy::from_path_iter(".env") {
            Ok(iter) => iter,
            Err(e) if e.not_found() => return Ok(Vec::new()),
            Err(e) => return Err(ConfigError::LoadError(e.to_string())),
        },
    };

    iter.map(|item| item.map_err(|e| ConfigError::ParseError(e.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollgate_features::{Environment, FeatureConfig, FeatureSource};

    #[test]
    fn test_empty_builder() {
        let table = FeatureConfigBuilder::new().build().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_tables_are_layered_in_order() {
        let base = FeatureTable::new()
            .with_feature_everywhere("auth", FeatureConfig::enabled())
            .with_feature(Environment::Local, "beta", FeatureConfig::rollout(1.0));
        let overlay =
            FeatureTable::new().with_feature(Environment::Local, "beta", FeatureConfig::rollout(40.0));

        let table = FeatureConfigBuilder::new()
            .add_table(base)
            .add_table(overlay)
            .build()
            .unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(
            table.lookup("beta", Environment::Local).unwrap().rollout_percentage,
            40.0
        );
    }

    #[test]
    fn test_build_sanitizes_and_reports() {
        let (table, report) = FeatureConfigBuilder::new()
            .add_table(FeatureTable::new().with_feature(
                Environment::Production,
                "auth",
                FeatureConfig::rollout(140.0),
            ))
            .build_with_report()
            .unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            table.lookup("auth", Environment::Production).unwrap().rollout_percentage,
            100.0
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = FeatureConfigBuilder::new()
            .add_file("/definitely/not/here/features.json")
            .build();
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_missing_explicit_dotenv_is_an_error() {
        let result = FeatureConfigBuilder::new()
            .load_dotenv(Some(PathBuf::from("/definitely/not/here/.env")))
            .build();
        assert!(result.is_err());
    }
}
