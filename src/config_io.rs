//! Runtime configuration I/O operations.
//!
//! System directory detection and config loading. These are kept apart from
//! config.rs so the config types stay free of filesystem access.

use crate::config::{Config, ConfigError};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "globo-note";
const CONFIG_FILE: &str = "config.json";
const STATE_FILE: &str = "state.json";

/// Directories used by globo-note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryContext {
    /// Data directory for persistent state (the folder registry)
    /// e.g., ~/.local/share/globo-note on Linux
    pub data_dir: PathBuf,

    /// Config directory for user configuration
    /// e.g., ~/.config/globo-note on Linux
    pub config_dir: PathBuf,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    /// This should ONLY be called from main()
    pub fn from_system() -> std::io::Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine data directory",
                )
            })?
            .join(APP_DIR);

        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join(APP_DIR);

        Ok(Self {
            data_dir,
            config_dir,
        })
    }

    /// Create a DirectoryContext for testing with a temp directory
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            data_dir: temp_dir.join("data"),
            config_dir: temp_dir.join("config"),
        }
    }

    /// `config.json` in the config directory
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// `state.json` in the data directory
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(STATE_FILE)
    }
}

/// Load the configuration.
///
/// An explicit path must exist. Without one, the user config file is read if
/// present and defaults are used otherwise.
pub fn load_config(
    dir_context: &DirectoryContext,
    explicit: Option<&Path>,
) -> Result<Config, ConfigError> {
    let config = match explicit {
        Some(path) => Config::load_from_file(path)?,
        None => {
            let path = dir_context.config_path();
            if path.exists() {
                tracing::debug!("Loading user config from {}", path.display());
                Config::load_from_file(&path)?
            } else {
                tracing::debug!("No user config at {}, using defaults", path.display());
                Config::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}
