// Feature file loaders

use crate::{ConfigError, Result};
use rollgate_features::FeatureTable;
use std::fs;
use std::path::Path;

/// Supported feature file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }

    /// Detect the format of `path`; `.env` itself counts as the env format.
    pub fn detect(path: &Path) -> Option<Self> {
        if path.file_name().and_then(|n| n.to_str()) == Some(".env") {
            return Some(FileFormat::Env);
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Parsed contents of one feature file
#[derive(Debug, Clone, PartialEq)]
pub enum FileContents {
    /// Whole feature definitions (JSON, TOML)
    Table(FeatureTable),
    /// Flat `PREFIX_<ENV>_<FEATURE>_<FIELD>` assignments (env files)
    Vars(Vec<(String, String)>),
}

/// Feature file loader
pub struct FeatureFileLoader {
    format: FileFormat,
}

impl FeatureFileLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from the file name
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::detect(path).ok_or_else(|| {
            ConfigError::LoadError(format!("Unsupported feature file: {}", path.display()))
        })?;

        Ok(Self::new(format))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Load a feature file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<FileContents> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse(&content)
    }

    /// Parse feature definitions from a string
    pub fn parse(&self, content: &str) -> Result<FileContents> {
        match self.format {
            FileFormat::Json => self.parse_json(content).map(FileContents::Table),
            FileFormat::Toml => self.parse_toml(content).map(FileContents::Table),
            FileFormat::Env => self.parse_env(content).map(FileContents::Vars),
        }
    }

    fn parse_json(&self, content: &str) -> Result<FeatureTable> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))
    }

    fn parse_toml(&self, content: &str) -> Result<FeatureTable> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        // Go through JSON so both formats share one deserialization path
        let json_value = serde_json::to_value(&toml_value)
            .map_err(|e| ConfigError::ParseError(format!("TOML conversion error: {}", e)))?;

        serde_json::from_value(json_value)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))
    }

    fn parse_env(&self, content: &str) -> Result<Vec<(String, String)>> {
        dotenvy::from_read_iter(content.as_bytes())
            .map(|item| item.map_err(|e| ConfigError::ParseError(format!("env parse error: {}", e))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollgate_features::{Environment, FeatureSource};

    #[test]
    fn test_parse_json() {
        let loader = FeatureFileLoader::new(FileFormat::Json);
        let json = r#"{"local": {"auth": {"enabled": true, "rolloutPercentage": 100}}}"#;

        let FileContents::Table(table) = loader.parse(json).unwrap() else {
            panic!("expected table");
        };
        assert!(table.lookup("auth", Environment::Local).unwrap().enabled);
    }

    #[test]
    fn test_parse_toml() {
        let loader = FeatureFileLoader::new(FileFormat::Toml);
        let toml = r#"
            [production.auth]
            enabled = true
            rollout_percentage = 12.5
            whitelist = ["user-vip"]

            [production.collections]
            enabled = false
        "#;

        let FileContents::Table(table) = loader.parse(toml).unwrap() else {
            panic!("expected table");
        };
        let auth = table.lookup("auth", Environment::Production).unwrap();
        assert_eq!(auth.rollout_percentage, 12.5);
        assert!(auth.whitelist.contains("user-vip"));
        assert!(!table.lookup("collections", Environment::Production).unwrap().enabled);
    }

    #[test]
    fn test_parse_env() {
        let loader = FeatureFileLoader::new(FileFormat::Env);
        let env = "# Comment\nROLLGATE_LOCAL_AUTH_ENABLED=true\nROLLGATE_LOCAL_AUTH_WHITELIST=\"a,b\"\n";

        let FileContents::Vars(vars) = loader.parse(env).unwrap() else {
            panic!("expected vars");
        };
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[1], ("ROLLGATE_LOCAL_AUTH_WHITELIST".to_string(), "a,b".to_string()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(FeatureFileLoader::new(FileFormat::Json).parse("{").is_err());
        assert!(FeatureFileLoader::new(FileFormat::Toml).parse("[[[").is_err());
        assert!(
            FeatureFileLoader::new(FileFormat::Json)
                .parse(r#"{"moon": {}}"#)
                .is_err()
        );
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("TOML"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("yaml"), None);
        assert_eq!(FileFormat::detect(Path::new("config/.env")), Some(FileFormat::Env));
        assert_eq!(FileFormat::detect(Path::new("flags.prod.env")), Some(FileFormat::Env));
        assert!(FeatureFileLoader::auto("features").is_err());
    }
}
