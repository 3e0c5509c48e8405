//! Configuration management for PicCaptionr.
//!
//! Defaults are loaded from an optional `config.toml` in the platform config
//! directory. The file is only ever read; answers given during a run are
//! never written back.

mod run;
mod types;
mod validate;

pub use run::{is_http_url, Provider, ProviderSettings, RunConfiguration};
pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for PicCaptionr.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Upload image settings
    pub image: ImageConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// LLM provider settings
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.piccaptionr.piccaptionr/config.toml
    /// - Linux: ~/.config/piccaptionr/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\piccaptionr\config\config.toml
    ///
    /// Falls back to ~/.piccaptionr/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "piccaptionr", "piccaptionr")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".piccaptionr").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Expand `~` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw.trim()).into_owned())
}
