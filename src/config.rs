use crate::app::file_ops::FileOpsOptions;
use crate::model::folder::PathPolicy;
use crate::primitives::name_validation::NamePlatform;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub explorer: ExplorerConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    /// Extra log filter directive, e.g. `globo_note=debug`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

fn default_true() -> bool {
    true
}

/// File operation behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExplorerConfig {
    /// Move deleted files and folders to the OS trash instead of removing them
    #[serde(default = "default_true")]
    pub use_trash: bool,

    /// Ask for confirmation before deleting
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            use_trash: true,
            confirm_delete: true,
        }
    }
}

/// How registered folder paths are compared
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PathsConfig {
    /// Compare paths case-insensitively. Unset means the platform default
    /// (case-insensitive on Windows and macOS).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
}

/// Which file naming rules apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlatformRules {
    /// Rules of the platform we run on
    #[default]
    Auto,
    Windows,
    Unix,
}

impl PlatformRules {
    pub fn resolve(self) -> NamePlatform {
        match self {
            PlatformRules::Auto => NamePlatform::current(),
            PlatformRules::Windows => NamePlatform::Windows,
            PlatformRules::Unix => NamePlatform::Unix,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationConfig {
    #[serde(default)]
    pub platform: PlatformRules,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(filter) = &self.log_filter {
            filter
                .parse::<tracing_subscriber::filter::Directive>()
                .map_err(|e| ConfigError::Validation(format!("log_filter {filter:?}: {e}")))?;
        }
        Ok(())
    }

    pub fn path_policy(&self) -> PathPolicy {
        PathPolicy::with_override(self.paths.case_insensitive)
    }

    pub fn file_ops_options(&self) -> FileOpsOptions {
        FileOpsOptions {
            platform: self.validation.platform.resolve(),
            use_trash: self.explorer.use_trash,
            confirm_delete: self.explorer.confirm_delete,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.explorer.use_trash);
        assert!(config.explorer.confirm_delete);
        assert_eq!(config.paths.case_insensitive, None);
        assert_eq!(config.validation.platform, PlatformRules::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{
            "explorer": { "use_trash": false },
            "validation": { "platform": "windows" },
            "paths": { "case_insensitive": true }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(!config.explorer.use_trash);
        assert!(config.explorer.confirm_delete);
        assert_eq!(config.path_policy(), PathPolicy::CASE_INSENSITIVE);

        let options = config.file_ops_options();
        assert_eq!(options.platform, NamePlatform::Windows);
        assert!(!options.use_trash);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let mut config = Config::default();
        config.explorer.confirm_delete = false;
        config.log_filter = Some("globo_note=debug".to_string());
        config.save_to_file(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_config_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");

        assert!(matches!(
            Config::load_from_file(&config_path),
            Err(ConfigError::Io { .. })
        ));

        std::fs::write(&config_path, "{ not json").unwrap();
        assert!(matches!(
            Config::load_from_file(&config_path),
            Err(ConfigError::Parse { .. })
        ));

        let config = Config {
            log_filter: Some("globo_note=loudest".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_schema_lists_sections() {
        let schema = serde_json::to_value(schemars::schema_for!(Config)).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("explorer"));
        assert!(properties.contains_key("validation"));
    }
}
