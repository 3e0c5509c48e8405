//! Captioning pipeline stages.
//!
//! - **metadata**: Extract EXIF capture date and GPS position
//! - **resize**: Stretch to the upload size and re-encode as JPEG
//! - **prompt**: Build the caption instruction
//! - **sanitize**: Clean up model output
//! - **orchestrator**: Runs the stages per file and persists the results

pub mod metadata;
pub mod orchestrator;
pub mod prompt;
pub mod resize;
pub mod sanitize;

// Re-exports for convenient access
pub use metadata::{MetadataExtractor, MetadataSource};
pub use orchestrator::{AbortReason, Pipeline, RunOutcome, RunSummary};
pub use prompt::caption_prompt;
pub use resize::{ImageResizer, ImageTransformer, JPEG_QUALITY, UPLOAD_MIME_SUBTYPE};
pub use sanitize::clean_content;
