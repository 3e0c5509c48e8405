//! Progress reporting for a pipeline run.

use std::sync::Mutex;

/// Receives human-readable status lines during a run.
///
/// Calls come from the orchestrating task only. A sink that fails must not
/// affect the run, so `notify` has no return value.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn notify(&self, _message: &str) {}
}

/// Forwards every message to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn notify(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Keeps every message in order. Handy for tests and for front-ends that
/// render the log after the run.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for RecordingProgress {
    fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

/// Fixed progress messages.
pub mod messages {
    pub const PICTURE_FOLDER_SELECTED: &str = "Picture folder was selected.";
    pub const OUTPUT_FOLDER_SELECTED: &str = "Output Folder selected.";
    pub const START_IMAGE: &str = "Start image processing...";
    pub const EXTRACT_EXIF: &str = "Extract EXIF data from image...";
    pub const RESIZE_IMAGE: &str = "Resize image...";
    pub const VISION_REQUEST: &str = "Making AI vision request...";
    pub const SEPARATOR: &str = "---";
    pub const WRITING_OUTPUT: &str = "Writing to output file...";
    pub const ALL_PROCESSED: &str = "All images were processed.";

    pub const NO_PICTURES_FOUND: &str = "No picture files found in the specified folder.";
    pub const FOLDER_MISSING: &str = "The specified folder does not exist!";
    pub const NOTHING_WRITTEN: &str = "No captions were produced, no output file was written.";
    pub const INCOMPLETE_CONFIGURATION: &str = "Configuration is incomplete:";
}
