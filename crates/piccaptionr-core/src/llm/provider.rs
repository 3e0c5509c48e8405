//! Vision provider trait and request/response types.
//!
//! Defines the interface both chat-completion backends implement, plus the
//! factory that creates the right provider from [`ProviderSettings`].

use crate::config::ProviderSettings;
use crate::error::PipelineResult;
use async_trait::async_trait;
use base64::Engine;

/// Sampling temperature for every caption request.
pub const TEMPERATURE: f32 = 0.7;

/// Upper bound on completion length.
pub const MAX_OUTPUT_TOKENS: u32 = 5000;

/// Image detail level requested from the model.
pub const IMAGE_DETAIL: &str = "low";

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and a MIME subtype ("jpeg", "png", ...).
    pub fn from_bytes(bytes: &[u8], mime_subtype: &str) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: format!("image/{}", mime_subtype.trim().to_lowercase()),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A single-shot caption request.
#[derive(Debug, Clone)]
pub struct CaptionRequest {
    /// The image to caption
    pub image: ImageInput,
    /// Text prompt for the model
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl CaptionRequest {
    /// Build a request with the fixed generation parameters.
    pub fn new(image: ImageInput, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

/// First-choice text plus token usage.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    /// Completion text, untouched
    pub text: String,
    /// Model identifier reported by the provider
    pub model: Option<String>,
    pub input_tokens: u32,
    pub output_tokens: u32,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that chat-completion backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the caption client holds a `Box<dyn VisionProvider>`).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai", "azure-openai").
    fn name(&self) -> &str;

    /// Send one image + prompt and return the first completion.
    async fn complete(&self, request: &CaptionRequest) -> PipelineResult<VisionResponse>;
}

/// Creates the provider matching a [`ProviderSettings`] value.
pub struct VisionProviderFactory;

impl VisionProviderFactory {
    /// Validate `settings` and build the provider. No network call is made.
    pub fn create(settings: &ProviderSettings) -> PipelineResult<Box<dyn VisionProvider>> {
        settings.validate()?;
        match settings {
            ProviderSettings::OpenAi {
                api_key,
                model,
                endpoint,
            } => Ok(Box::new(super::openai::OpenAiProvider::new(
                endpoint, api_key, model,
            ))),
            ProviderSettings::AzureOpenAi {
                endpoint,
                api_key,
                deployment,
                api_version,
            } => Ok(Box::new(super::azure::AzureOpenAiProvider::new(
                endpoint,
                api_key,
                deployment,
                api_version,
            ))),
        }
    }
}
