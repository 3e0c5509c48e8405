//! Caption client: holds the configured provider and turns one image +
//! prompt into a [`CaptionResult`].

use super::provider::{CaptionRequest, ImageInput, VisionProvider, VisionProviderFactory};
use crate::config::ProviderSettings;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::sanitize::clean_content;
use crate::types::CaptionResult;
use async_trait::async_trait;

/// Captioning as the pipeline sees it.
#[async_trait]
pub trait CaptionService: Send + Sync {
    /// Configure (or reconfigure) the backend. Performs no network I/O.
    fn init_provider(&mut self, settings: &ProviderSettings) -> PipelineResult<()>;

    /// Send one image with `prompt` and return the raw and sanitized text.
    async fn request_caption(
        &self,
        image: &[u8],
        mime_subtype: &str,
        prompt: &str,
    ) -> PipelineResult<CaptionResult>;
}

enum ClientState {
    Uninitialized,
    Ready(Box<dyn VisionProvider>),
}

/// [`CaptionService`] backed by a [`VisionProvider`].
pub struct CaptionClient {
    state: ClientState,
}

impl Default for CaptionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptionClient {
    /// A client with no provider; requests fail with `NotInitialized`.
    pub fn new() -> Self {
        Self {
            state: ClientState::Uninitialized,
        }
    }

    /// A client already bound to `provider`.
    pub fn with_provider(provider: Box<dyn VisionProvider>) -> Self {
        Self {
            state: ClientState::Ready(provider),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ClientState::Ready(_))
    }
}

#[async_trait]
impl CaptionService for CaptionClient {
    fn init_provider(&mut self, settings: &ProviderSettings) -> PipelineResult<()> {
        let provider = VisionProviderFactory::create(settings)?;
        tracing::info!(
            "Caption provider ready: {} ({})",
            provider.name(),
            settings.model_or_deployment()
        );
        // A failed init above leaves the previous provider in place
        self.state = ClientState::Ready(provider);
        Ok(())
    }

    async fn request_caption(
        &self,
        image: &[u8],
        mime_subtype: &str,
        prompt: &str,
    ) -> PipelineResult<CaptionResult> {
        if image.is_empty() {
            return Err(PipelineError::invalid_argument("image", "must not be empty"));
        }
        if mime_subtype.trim().is_empty() {
            return Err(PipelineError::invalid_argument(
                "mime_subtype",
                "must not be empty",
            ));
        }
        if prompt.trim().is_empty() {
            return Err(PipelineError::invalid_argument("prompt", "must not be empty"));
        }

        let provider = match &self.state {
            ClientState::Ready(provider) => provider,
            ClientState::Uninitialized => return Err(PipelineError::NotInitialized),
        };

        let request = CaptionRequest::new(ImageInput::from_bytes(image, mime_subtype), prompt);
        let response = provider.complete(&request).await?;

        tracing::debug!(
            provider = provider.name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            latency_ms = response.latency_ms,
            "Caption generated"
        );

        Ok(CaptionResult {
            sanitized_text: clean_content(&response.text),
            raw_text: response.text,
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::VisionResponse;
    use std::sync::{Arc, Mutex};

    /// Records the last request and answers with a canned completion.
    struct FakeProvider {
        reply: String,
        seen: Arc<Mutex<Option<CaptionRequest>>>,
    }

    #[async_trait]
    impl VisionProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn complete(&self, request: &CaptionRequest) -> PipelineResult<VisionResponse> {
            *self.seen.lock().unwrap() = Some(request.clone());
            Ok(VisionResponse {
                text: self.reply.clone(),
                model: None,
                input_tokens: 321,
                output_tokens: 54,
                latency_ms: 1,
            })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl VisionProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &CaptionRequest) -> PipelineResult<VisionResponse> {
            Err(PipelineError::Upstream {
                message: "HTTP 429 Too Many Requests".to_string(),
                status_code: Some(429),
                source: None,
            })
        }
    }

    fn fake(reply: &str) -> (CaptionClient, Arc<Mutex<Option<CaptionRequest>>>) {
        let seen = Arc::new(Mutex::new(None));
        let client = CaptionClient::with_provider(Box::new(FakeProvider {
            reply: reply.to_string(),
            seen: Arc::clone(&seen),
        }));
        (client, seen)
    }

    #[tokio::test]
    async fn test_request_caption_returns_raw_and_sanitized() {
        let (client, seen) = fake("\"Golden hour in Lisbon\"\\n\\n\\n#lisbon #sunset");
        let result = client
            .request_caption(&[0xFF, 0xD8], "jpeg", "Write a caption")
            .await
            .unwrap();

        assert_eq!(result.raw_text, "\"Golden hour in Lisbon\"\\n\\n\\n#lisbon #sunset");
        assert_eq!(result.sanitized_text, clean_content(&result.raw_text));
        assert!(!result.sanitized_text.contains('"'));
        assert_eq!(result.input_tokens, 321);
        assert_eq!(result.output_tokens, 54);

        let request = seen.lock().unwrap().clone().unwrap();
        assert_eq!(request.prompt, "Write a caption");
        assert_eq!(request.image.media_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_uninitialized_client_fails() {
        let client = CaptionClient::new();
        assert!(!client.is_ready());
        let err = client
            .request_caption(&[1, 2, 3], "jpeg", "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NotInitialized));
    }

    #[tokio::test]
    async fn test_invalid_arguments_rejected() {
        let (client, seen) = fake("x");
        for (image, subtype, prompt) in [
            (&[][..], "jpeg", "p"),
            (&[1u8][..], " ", "p"),
            (&[1u8][..], "jpeg", "  "),
        ] {
            let err = client
                .request_caption(image, subtype, prompt)
                .await
                .unwrap_err();
            assert!(matches!(err, PipelineError::InvalidArgument { .. }));
        }
        assert!(seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let client = CaptionClient::with_provider(Box::new(FailingProvider));
        let err = client
            .request_caption(&[1], "jpeg", "prompt")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Upstream {
                status_code: Some(429),
                ..
            }
        ));
    }

    #[test]
    fn test_init_provider_validates_settings() {
        let mut client = CaptionClient::new();
        let bad = ProviderSettings::AzureOpenAi {
            endpoint: "not a url".to_string(),
            api_key: "key".to_string(),
            deployment: "dep".to_string(),
            api_version: "2024-10-21".to_string(),
        };
        assert!(client.init_provider(&bad).is_err());
        assert!(!client.is_ready());

        let good = ProviderSettings::OpenAi {
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
        };
        client.init_provider(&good).unwrap();
        assert!(client.is_ready());
    }

    #[test]
    fn test_reinit_replaces_provider() {
        let (mut client, _) = fake("x");
        let settings = ProviderSettings::OpenAi {
            api_key: "sk-test".to_string(),
            model: "gpt-4.1".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
        };
        client.init_provider(&settings).unwrap();
        assert!(client.is_ready());
    }
}
