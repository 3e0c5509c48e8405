//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Languages offered by the front-ends.
pub const DEFAULT_LANGUAGES: &[&str] = &["English", "German", "Spanish"];

/// OpenAI models offered by the front-ends.
pub const KNOWN_OPENAI_MODELS: &[&str] = &[
    "gpt-4.1",
    "gpt-4.1-mini",
    "gpt-4.1-nano",
    "gpt-4o",
    "gpt-4o-mini",
];

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Prefix of the output file name (`<prefix>-<timestamp>.txt`)
    pub output_prefix: String,

    /// Default caption language
    pub language: String,

    /// Languages offered in the interactive flow
    pub languages: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_prefix: "piccaptionr".to_string(),
            language: "English".to_string(),
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Size of the image uploaded to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Target width in pixels
    pub width: u32,

    /// Target height in pixels
    pub height: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// LLM provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Default provider: "openai" or "azure-openai"
    pub provider: String,

    /// OpenAI configuration
    pub openai: OpenAiConfig,

    /// Azure OpenAI configuration
    pub azure_openai: AzureOpenAiConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            openai: OpenAiConfig::default(),
            azure_openai: AzureOpenAiConfig::default(),
        }
    }
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// API base URL
    pub endpoint: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
        }
    }
}

/// Azure OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com` (supports ${ENV_VAR})
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Deployment name
    pub deployment: String,

    /// REST API version
    pub api_version: String,
}

impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "${AZURE_OPENAI_ENDPOINT}".to_string(),
            api_key: "${AZURE_OPENAI_API_KEY}".to_string(),
            deployment: "gpt-4o-mini".to_string(),
            api_version: "2024-10-21".to_string(),
        }
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
///
/// Plain values pass through; empty values and unset variables yield `None`.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.trim().is_empty())
    } else if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_defaults() {
        let config = GeneralConfig::default();
        assert_eq!(config.language, "English");
        assert_eq!(config.languages, vec!["English", "German", "Spanish"]);
    }

    #[test]
    fn test_azure_defaults_reference_env() {
        let config = AzureOpenAiConfig::default();
        assert_eq!(config.api_key, "${AZURE_OPENAI_API_KEY}");
        assert_eq!(config.api_version, "2024-10-21");
    }

    #[test]
    fn test_resolve_env_var() {
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        assert_eq!(resolve_env_var(""), None);
        assert_eq!(resolve_env_var("   "), None);
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_PICCAPTIONR_XYZ}"), None);
    }
}
