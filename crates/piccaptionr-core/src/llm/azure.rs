//! Azure OpenAI provider.
//!
//! Same Chat Completions format as OpenAI, so this delegates to
//! `OpenAiProvider` with a deployment-scoped URL and `api-key` auth.

use super::openai::{Auth, OpenAiProvider};
use super::provider::{CaptionRequest, VisionProvider, VisionResponse};
use crate::error::PipelineResult;
use async_trait::async_trait;

/// Azure OpenAI provider bound to one deployment.
pub struct AzureOpenAiProvider {
    inner: OpenAiProvider,
}

impl AzureOpenAiProvider {
    pub fn new(endpoint: &str, api_key: &str, deployment: &str, api_version: &str) -> Self {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim().trim_end_matches('/'),
            deployment.trim(),
            api_version.trim()
        );
        Self {
            inner: OpenAiProvider::with_url(
                "azure-openai",
                &url,
                Auth::ApiKeyHeader(api_key.to_string()),
                None,
            ),
        }
    }
}

#[async_trait]
impl VisionProvider for AzureOpenAiProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, request: &CaptionRequest) -> PipelineResult<VisionResponse> {
        self.inner.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_url() {
        let provider = AzureOpenAiProvider::new(
            "https://contoso.openai.azure.com/",
            "key",
            "gpt-4o-captions",
            "2024-10-21",
        );
        assert_eq!(
            provider.inner.url(),
            "https://contoso.openai.azure.com/openai/deployments/gpt-4o-captions/chat/completions?api-version=2024-10-21"
        );
        assert_eq!(provider.name(), "azure-openai");
    }

    #[test]
    fn test_endpoint_whitespace_is_trimmed() {
        let provider = AzureOpenAiProvider::new(
            "  https://contoso.openai.azure.com  ",
            "key",
            "captions",
            "2024-10-21",
        );
        assert!(provider
            .inner
            .url()
            .starts_with("https://contoso.openai.azure.com/openai/deployments/captions/"));
    }
}
