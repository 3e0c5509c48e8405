//! PicCaptionr Core - caption a folder of photos with a vision LLM.
//!
//! Each image is read for its EXIF capture date and GPS position, stretched
//! to a small JPEG, and sent with a prompt to an OpenAI or Azure OpenAI chat
//! model. The captions are collected into one JSON file per run.
//!
//! # Architecture
//!
//! ```text
//! Folder → List images → (EXIF → Resize → Prompt → Caption) per file → JSON file
//! ```
//!
//! Files are handled one at a time. A file that fails at any step is reported
//! to the [`ProgressSink`] and skipped; the run continues.
//!
//! # Usage
//!
//! ```rust,ignore
//! use piccaptionr_core::{Config, Pipeline, Provider, RunConfiguration, TracingProgress};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let run = RunConfiguration::from_config(
//!         &config,
//!         Provider::OpenAi,
//!         "./photos".into(),
//!         "./photos".into(),
//!     );
//!     let outcome = Pipeline::with_defaults().run(&run, &TracingProgress).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod storage;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, Provider, ProviderSettings, RunConfiguration};
pub use error::{ConfigError, PicCaptionError, PipelineError, PipelineResult, Result};
pub use llm::{CaptionClient, CaptionService};
pub use pipeline::{AbortReason, Pipeline, RunOutcome, RunSummary};
pub use progress::{NullProgress, ProgressSink, RecordingProgress, TracingProgress};
pub use storage::{FileStorage, Storage};
pub use types::{CaptionResult, ImageMetadata, ResultItem};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_pipeline_builds() {
        let _pipeline = Pipeline::with_defaults();
    }
}
