//! Caption prompt construction.

use crate::error::{PipelineError, PipelineResult};
use crate::types::ImageMetadata;

/// Build the instruction sent alongside an image.
///
/// Metadata lines are added only for fields that are present; numbers use
/// Rust's `Display` for `f64`, which never depends on the locale.
pub fn caption_prompt(
    language: &str,
    metadata: &ImageMetadata,
    additional_context: Option<&str>,
) -> PipelineResult<String> {
    let language = language.trim();
    if language.is_empty() {
        return Err(PipelineError::invalid_argument(
            "language",
            "must not be empty",
        ));
    }

    let mut lines = vec![
        format!(
            "Create an engaging caption in {language} for an Instagram post based on the provided image."
        ),
        "Try to recognize notable buildings, landmarks, or environmental details.".to_string(),
        "Include at least 10 creative and relevant hashtags.".to_string(),
    ];

    if let Some(date) = metadata.capture_date {
        lines.push(format!("The image was taken on {}.", date.format("%Y-%m-%d")));
    }
    if let Some(lat) = metadata.latitude {
        lines.push(format!("Latitude: {lat}."));
    }
    if let Some(lon) = metadata.longitude {
        lines.push(format!("Longitude: {lon}."));
    }

    if let Some(info) = additional_context.map(str::trim).filter(|s| !s.is_empty()) {
        lines.push(format!("Also consider this additional information: {info}"));
    }

    Ok(lines.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dated(y: i32, m: u32, d: u32) -> ImageMetadata {
        ImageMetadata {
            capture_date: NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(9, 15, 0)),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_prompt_with_date_only() {
        let prompt = caption_prompt("English", &dated(2024, 5, 1), None).unwrap();
        assert!(prompt.contains("2024-05-01"));
        assert!(!prompt.contains("Latitude"));
        assert!(!prompt.contains("Longitude"));
        assert!(prompt.contains("in English"));
        assert!(prompt.contains("at least 10"));
    }

    #[test]
    fn test_prompt_with_coordinates() {
        let meta = ImageMetadata {
            capture_date: None,
            latitude: Some(48.858_37),
            longitude: Some(-2.25),
        };
        let prompt = caption_prompt("German", &meta, None).unwrap();
        assert!(prompt.contains("Latitude: 48.85837."));
        assert!(prompt.contains("Longitude: -2.25."));
        assert!(!prompt.contains("taken on"));
    }

    #[test]
    fn test_prompt_appends_trimmed_context_on_own_line() {
        let prompt = caption_prompt(
            "Spanish",
            &ImageMetadata::default(),
            Some("  Trip to Lisbon with friends  "),
        )
        .unwrap();
        assert!(prompt
            .lines()
            .any(|l| l == "Also consider this additional information: Trip to Lisbon with friends"));
        assert_eq!(prompt, prompt.trim());
    }

    #[test]
    fn test_prompt_ignores_blank_context() {
        let prompt = caption_prompt("English", &ImageMetadata::default(), Some("   ")).unwrap();
        assert!(!prompt.contains("additional information"));
        assert_eq!(prompt.lines().count(), 3);
    }

    #[test]
    fn test_prompt_rejects_blank_language() {
        let err = caption_prompt("  ", &ImageMetadata::default(), None).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidArgument { name: "language", .. }
        ));
    }
}
