//! Decode, stretch to a fixed size, re-encode as JPEG for upload.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// JPEG quality of the uploaded image.
pub const JPEG_QUALITY: u8 = 75;

/// MIME subtype of everything [`ImageResizer`] produces.
pub const UPLOAD_MIME_SUBTYPE: &str = "jpeg";

/// Produces the upload bytes for an image file.
pub trait ImageTransformer: Send + Sync {
    /// Fails with `FileNotFound` for a missing file and `Decode` for bytes
    /// that are not an image.
    fn resize(&self, path: &Path, width: u32, height: u32) -> PipelineResult<Vec<u8>>;
}

/// Non-aspect-preserving resize with Lanczos3 resampling and JPEG output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageResizer;

impl ImageTransformer for ImageResizer {
    fn resize(&self, path: &Path, width: u32, height: u32) -> PipelineResult<Vec<u8>> {
        if width == 0 || height == 0 {
            return Err(PipelineError::invalid_argument(
                "size",
                format!("width and height must be positive, got {width}x{height}"),
            ));
        }
        if !path.is_file() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let image = Self::decode(path)?;
        let resized = image.resize_exact(width, height, FilterType::Lanczos3);
        Self::encode_jpeg(&resized, path)
    }
}

impl ImageResizer {
    /// Decode with the format sniffed from content, not the extension.
    fn decode(path: &Path) -> PipelineResult<DynamicImage> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Io {
            path: path.to_path_buf(),
            message: "Cannot read file".to_string(),
            source: e,
        })?;

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn encode_jpeg(image: &DynamicImage, path: &Path) -> PipelineResult<Vec<u8>> {
        // JPEG has no alpha channel
        let rgb = image.to_rgb8();

        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
            .encode_image(&rgb)
            .map_err(|e| PipelineError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(buffer)
    }
}
