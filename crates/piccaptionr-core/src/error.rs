//! Error types for the PicCaptionr pipeline.
//!
//! Errors are organized by stage so that a per-file failure reported to the
//! progress sink names the file and the step that broke.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed source error kept on upstream failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for PicCaptionr operations.
#[derive(Error, Debug)]
pub enum PicCaptionError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline errors, one variant per failure kind.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Caller passed an empty or malformed argument
    #[error("Invalid argument `{name}`: {message}")]
    InvalidArgument { name: &'static str, message: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Directory not found
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Embedded metadata could not be parsed
    #[error("Failed to read image metadata for {path}: {message}")]
    MetadataRead { path: PathBuf, message: String },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Re-encoding the resized image failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Caption client used before a provider was configured
    #[error("Caption client is not initialized. Configure a provider first.")]
    NotInitialized,

    /// Network or provider failure
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// Filesystem read/write failure
    #[error("IO failure for {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    /// Shorthand for an `Upstream` error without an HTTP status.
    pub fn upstream(message: impl Into<String>, source: Option<BoxError>) -> Self {
        Self::Upstream {
            message: message.into(),
            status_code: None,
            source,
        }
    }
}

/// Convenience type alias for PicCaptionr results.
pub type Result<T> = std::result::Result<T, PicCaptionError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_upstream_preserves_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = PipelineError::upstream("request failed", Some(Box::new(cause)));
        let source = err.source().expect("source should be kept");
        assert!(source.to_string().contains("reset by peer"));
    }

    #[test]
    fn test_invalid_argument_message_names_argument() {
        let err = PipelineError::invalid_argument("language", "must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid argument `language`: must not be empty"
        );
    }
}
