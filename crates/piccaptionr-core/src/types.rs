//! Core data types for the captioning pipeline.
//!
//! These are the records written to the output file: one [`ResultItem`] per
//! successfully captioned image.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Capture date and location read from an image's EXIF block.
///
/// Every field is optional: a photo without EXIF, without GPS, or without a
/// capture date is valid input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// When the photo was taken (`DateTimeOriginal`)
    pub capture_date: Option<NaiveDateTime>,

    /// GPS latitude in signed decimal degrees
    pub latitude: Option<f64>,

    /// GPS longitude in signed decimal degrees
    pub longitude: Option<f64>,
}

impl ImageMetadata {
    /// True if none of the fields were found.
    pub fn is_empty(&self) -> bool {
        self.capture_date.is_none() && self.latitude.is_none() && self.longitude.is_none()
    }
}

/// The model's answer for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionResult {
    /// First completion text as returned by the provider
    pub raw_text: String,

    /// `raw_text` after [`crate::pipeline::clean_content`]
    pub sanitized_text: String,

    /// Prompt tokens reported by the provider
    pub input_tokens: u32,

    /// Completion tokens reported by the provider
    pub output_tokens: u32,
}

/// One captioned image in the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Path of the source image as discovered
    pub image_name: String,

    pub metadata: ImageMetadata,

    pub caption: CaptionResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_metadata_default_is_empty() {
        assert!(ImageMetadata::default().is_empty());
        let partial = ImageMetadata {
            latitude: Some(48.1),
            ..Default::default()
        };
        assert!(!partial.is_empty());
    }

    #[test]
    fn test_result_item_serializes_absent_fields_as_null() {
        let item = ResultItem {
            image_name: "/photos/a.jpg".to_string(),
            metadata: ImageMetadata {
                capture_date: NaiveDate::from_ymd_opt(2024, 5, 1)
                    .and_then(|d| d.and_hms_opt(10, 30, 0)),
                latitude: None,
                longitude: None,
            },
            caption: CaptionResult {
                raw_text: "\"Hello\"".to_string(),
                sanitized_text: "Hello".to_string(),
                input_tokens: 120,
                output_tokens: 42,
            },
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["image_name"], "/photos/a.jpg");
        assert_eq!(value["metadata"]["capture_date"], "2024-05-01T10:30:00");
        assert!(value["metadata"]["latitude"].is_null());
        assert_eq!(value["caption"]["sanitized_text"], "Hello");
        assert_eq!(value["caption"]["input_tokens"], 120);
        assert_eq!(value["caption"]["output_tokens"], 42);
    }
}
