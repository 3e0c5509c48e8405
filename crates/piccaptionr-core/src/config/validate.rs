//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::{Config, Provider};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.image.width == 0 {
            return Err(ConfigError::ValidationError(
                "image.width must be > 0".into(),
            ));
        }
        if self.image.height == 0 {
            return Err(ConfigError::ValidationError(
                "image.height must be > 0".into(),
            ));
        }
        if self.general.output_prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "general.output_prefix must not be empty".into(),
            ));
        }
        if self.general.language.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "general.language must not be empty".into(),
            ));
        }
        if self.general.languages.is_empty() {
            return Err(ConfigError::ValidationError(
                "general.languages must list at least one language".into(),
            ));
        }
        if Provider::parse(&self.llm.provider).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "llm.provider must be \"openai\" or \"azure-openai\", got \"{}\"",
                self.llm.provider
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}
