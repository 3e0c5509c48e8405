//! OpenAI provider using the Chat Completions API.
//!
//! Sends the prompt and the image as two separate user messages; the image
//! travels as a data URL with `detail: "low"`.

use super::provider::{CaptionRequest, VisionProvider, VisionResponse, IMAGE_DETAIL};
use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How the API key is attached to each request.
#[derive(Clone)]
pub(crate) enum Auth {
    /// `Authorization: Bearer <key>` (OpenAI)
    Bearer(String),
    /// `api-key: <key>` (Azure OpenAI)
    ApiKeyHeader(String),
}

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    name: &'static str,
    auth: Auth,
    /// `None` when the deployment in the URL selects the model.
    model: Option<String>,
    client: reqwest::Client,
    url: String,
}

impl OpenAiProvider {
    /// `endpoint` is the API base, e.g. `https://api.openai.com/v1`.
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        let url = format!("{}/chat/completions", endpoint.trim().trim_end_matches('/'));
        Self::with_url(
            "openai",
            &url,
            Auth::Bearer(api_key.to_string()),
            Some(model.to_string()),
        )
    }

    /// Create against a fully-built completions URL (used by the Azure provider).
    pub(crate) fn with_url(
        name: &'static str,
        url: &str,
        auth: Auth,
        model: Option<String>,
    ) -> Self {
        Self {
            name,
            auth,
            model,
            client: reqwest::Client::new(),
            url: url.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    fn body(&self, request: &CaptionRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            max_completion_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![
                ChatMessage {
                    role: "user",
                    content: vec![ChatContent::Text {
                        text: request.prompt.clone(),
                    }],
                },
                ChatMessage {
                    role: "user",
                    content: vec![ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                            detail: IMAGE_DETAIL,
                        },
                    }],
                },
            ],
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<ChatMessage>,
    max_completion_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

impl ChatResponse {
    fn into_response(self, provider: &str, latency_ms: u64) -> PipelineResult<VisionResponse> {
        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                PipelineError::upstream(
                    format!("{provider} returned no choices, no content generated"),
                    None,
                )
            })?;

        let (input_tokens, output_tokens) = self
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        Ok(VisionResponse {
            text,
            model: self.model,
            input_tokens,
            output_tokens,
            latency_ms,
        })
    }
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn complete(&self, request: &CaptionRequest) -> PipelineResult<VisionResponse> {
        let start = Instant::now();
        let body = self.body(request);

        let builder = self.client.post(&self.url);
        let builder = match &self.auth {
            Auth::Bearer(key) => builder.bearer_auth(key),
            Auth::ApiKeyHeader(key) => builder.header("api-key", key),
        };

        let resp = builder.json(&body).send().await.map_err(|e| {
            PipelineError::upstream(
                format!("{} request failed: {e}", self.name),
                Some(Box::new(e)),
            )
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Upstream {
                message: format!("{} HTTP {status}: {text}", self.name),
                status_code: Some(status.as_u16()),
                source: None,
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| {
            PipelineError::upstream(
                format!("Failed to parse {} response: {e}", self.name),
                Some(Box::new(e)),
            )
        })?;

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            provider = self.name,
            latency_ms,
            "Chat completion received"
        );
        chat_resp.into_response(self.name, latency_ms)
    }
}
