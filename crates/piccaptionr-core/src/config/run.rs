//! Per-run configuration assembled by a front-end before a run starts.

use std::fmt;
use std::path::PathBuf;

use reqwest::Url;

use super::types::{resolve_env_var, LlmConfig};
use super::Config;
use crate::error::{PipelineError, PipelineResult};

/// Which vision endpoint answers caption requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// api.openai.com (or a compatible endpoint)
    OpenAi,
    /// An Azure OpenAI resource with a model deployment
    AzureOpenAi,
}

impl Provider {
    /// Parse a provider name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "azure-openai" | "azure_openai" | "azure" => Some(Self::AzureOpenAi),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::AzureOpenAi => "Azure OpenAI",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "openai"),
            Provider::AzureOpenAi => write!(f, "azure-openai"),
        }
    }
}

/// Provider discriminator plus the credentials it needs.
#[derive(Clone, PartialEq, Eq)]
pub enum ProviderSettings {
    OpenAi {
        api_key: String,
        model: String,
        endpoint: String,
    },
    AzureOpenAi {
        endpoint: String,
        api_key: String,
        deployment: String,
        api_version: String,
    },
}

impl ProviderSettings {
    /// Build settings for `provider` from the config file, resolving `${ENV}` values.
    ///
    /// Unresolvable values come back empty and fail [`ProviderSettings::validate`].
    pub fn from_config(provider: Provider, llm: &LlmConfig) -> Self {
        let resolve = |v: &str| resolve_env_var(v).unwrap_or_default();
        match provider {
            Provider::OpenAi => Self::OpenAi {
                api_key: resolve(&llm.openai.api_key),
                model: resolve(&llm.openai.model),
                endpoint: resolve(&llm.openai.endpoint),
            },
            Provider::AzureOpenAi => Self::AzureOpenAi {
                endpoint: resolve(&llm.azure_openai.endpoint),
                api_key: resolve(&llm.azure_openai.api_key),
                deployment: resolve(&llm.azure_openai.deployment),
                api_version: resolve(&llm.azure_openai.api_version),
            },
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::OpenAi { .. } => Provider::OpenAi,
            Self::AzureOpenAi { .. } => Provider::AzureOpenAi,
        }
    }

    /// Model name (OpenAI) or deployment name (Azure OpenAI).
    pub fn model_or_deployment(&self) -> &str {
        match self {
            Self::OpenAi { model, .. } => model,
            Self::AzureOpenAi { deployment, .. } => deployment,
        }
    }

    /// Check every credential is present and the endpoint is an http(s) URL.
    pub fn validate(&self) -> PipelineResult<()> {
        match self {
            Self::OpenAi {
                api_key,
                model,
                endpoint,
            } => {
                require_non_empty("api_key", api_key)?;
                require_non_empty("model", model)?;
                require_http_url("endpoint", endpoint)
            }
            Self::AzureOpenAi {
                endpoint,
                api_key,
                deployment,
                api_version,
            } => {
                require_non_empty("api_key", api_key)?;
                require_non_empty("deployment", deployment)?;
                require_non_empty("api_version", api_version)?;
                require_http_url("endpoint", endpoint)
            }
        }
    }
}

// Keeps API keys out of logs.
impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi {
                model, endpoint, ..
            } => f
                .debug_struct("OpenAi")
                .field("api_key", &"<redacted>")
                .field("model", model)
                .field("endpoint", endpoint)
                .finish(),
            Self::AzureOpenAi {
                endpoint,
                deployment,
                api_version,
                ..
            } => f
                .debug_struct("AzureOpenAi")
                .field("endpoint", endpoint)
                .field("api_key", &"<redacted>")
                .field("deployment", deployment)
                .field("api_version", api_version)
                .finish(),
        }
    }
}

/// Everything one run needs. Immutable for the duration of the run.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    /// Provider and credentials
    pub provider: ProviderSettings,
    /// Caption language, e.g. "English"
    pub target_language: String,
    /// Free-text hints appended to every prompt
    pub additional_context: Option<String>,
    /// Folder scanned (recursively) for images
    pub source_folder: PathBuf,
    /// Folder the result file is written to
    pub output_folder: PathBuf,
    /// Upload width in pixels
    pub image_width: u32,
    /// Upload height in pixels
    pub image_height: u32,
    /// Output file name prefix
    pub output_prefix: String,
}

impl RunConfiguration {
    /// Start from config defaults for the given provider and folders.
    pub fn from_config(
        config: &Config,
        provider: Provider,
        source_folder: PathBuf,
        output_folder: PathBuf,
    ) -> Self {
        Self {
            provider: ProviderSettings::from_config(provider, &config.llm),
            target_language: config.general.language.clone(),
            additional_context: None,
            source_folder,
            output_folder,
            image_width: config.image.width,
            image_height: config.image.height,
            output_prefix: config.general.output_prefix.clone(),
        }
    }

    /// Report the first missing or malformed field.
    pub fn validate(&self) -> PipelineResult<()> {
        self.provider.validate()?;
        require_non_empty("target_language", &self.target_language)?;
        require_non_empty("output_prefix", &self.output_prefix)?;
        if self.source_folder.as_os_str().is_empty() {
            return Err(PipelineError::invalid_argument(
                "source_folder",
                "no picture folder selected",
            ));
        }
        if self.output_folder.as_os_str().is_empty() {
            return Err(PipelineError::invalid_argument(
                "output_folder",
                "no output folder selected",
            ));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(PipelineError::invalid_argument(
                "image_size",
                format!(
                    "width and height must be positive, got {}x{}",
                    self.image_width, self.image_height
                ),
            ));
        }
        Ok(())
    }
}

pub(crate) fn require_non_empty(name: &'static str, value: &str) -> PipelineResult<()> {
    if value.trim().is_empty() {
        Err(PipelineError::invalid_argument(name, "must not be empty"))
    } else {
        Ok(())
    }
}

/// True for an absolute `http://` or `https://` URL.
pub fn is_http_url(value: &str) -> bool {
    require_http_url("url", value).is_ok()
}

fn require_http_url(name: &'static str, value: &str) -> PipelineResult<()> {
    require_non_empty(name, value)?;
    match Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(url) => Err(PipelineError::invalid_argument(
            name,
            format!("unsupported URL scheme \"{}\"", url.scheme()),
        )),
        Err(e) => Err(PipelineError::invalid_argument(
            name,
            format!("invalid URL \"{value}\": {e}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai_settings() -> ProviderSettings {
        ProviderSettings::OpenAi {
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
        }
    }

    fn run_config() -> RunConfiguration {
        RunConfiguration {
            provider: openai_settings(),
            target_language: "English".to_string(),
            additional_context: None,
            source_folder: PathBuf::from("/photos"),
            output_folder: PathBuf::from("/out"),
            image_width: 640,
            image_height: 480,
            output_prefix: "piccaptionr".to_string(),
        }
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(Provider::parse("openai"), Some(Provider::OpenAi));
        assert_eq!(Provider::parse("Azure-OpenAI"), Some(Provider::AzureOpenAi));
        assert_eq!(Provider::parse("azure"), Some(Provider::AzureOpenAi));
        assert_eq!(Provider::parse("anthropic"), None);
    }

    #[test]
    fn test_model_or_deployment() {
        assert_eq!(openai_settings().model_or_deployment(), "gpt-4o-mini");
        let azure = ProviderSettings::AzureOpenAi {
            endpoint: "https://res.openai.azure.com".to_string(),
            api_key: "key".to_string(),
            deployment: "captions".to_string(),
            api_version: "2024-10-21".to_string(),
        };
        assert_eq!(azure.model_or_deployment(), "captions");
        assert_eq!(azure.provider(), Provider::AzureOpenAi);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", openai_settings());
        assert!(!debug.contains("sk-test"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let settings = ProviderSettings::OpenAi {
            api_key: " ".to_string(),
            model: "gpt-4o".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidArgument { name: "api_key", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let settings = ProviderSettings::AzureOpenAi {
            endpoint: "ftp://res.openai.azure.com".to_string(),
            api_key: "key".to_string(),
            deployment: "captions".to_string(),
            api_version: "2024-10-21".to_string(),
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn test_run_config_validates() {
        assert!(run_config().validate().is_ok());
    }

    #[test]
    fn test_run_config_rejects_zero_dimensions() {
        let mut config = run_config();
        config.image_height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_run_config_rejects_missing_source() {
        let mut config = run_config();
        config.source_folder = PathBuf::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("no picture folder selected"));
    }

    #[test]
    fn test_from_config_uses_defaults() {
        let config = Config::default();
        let run = RunConfiguration::from_config(
            &config,
            Provider::OpenAi,
            PathBuf::from("/photos"),
            PathBuf::from("/out"),
        );
        assert_eq!(run.target_language, "English");
        assert_eq!(run.image_width, 640);
        assert_eq!(run.provider.model_or_deployment(), "gpt-4o-mini");
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://contoso.openai.azure.com"));
        assert!(is_http_url("http://localhost:8080/v1"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("contoso.openai.azure.com"));
        assert!(!is_http_url(""));
    }
}
