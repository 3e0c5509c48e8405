//! LLM integration for caption generation.
//!
//! Provides a provider abstraction over the OpenAI and Azure OpenAI chat
//! completion endpoints, and the caption client the pipeline talks to.

pub(crate) mod azure;
pub(crate) mod client;
pub(crate) mod openai;
pub(crate) mod provider;

pub use client::{CaptionClient, CaptionService};
pub use provider::{
    CaptionRequest, ImageInput, VisionProvider, VisionProviderFactory, VisionResponse,
    MAX_OUTPUT_TOKENS, TEMPERATURE,
};
