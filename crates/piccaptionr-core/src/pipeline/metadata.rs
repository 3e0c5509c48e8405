//! EXIF metadata extraction: capture date and GPS position.

use chrono::{NaiveDate, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use image::ImageFormat;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::ImageMetadata;

/// Reads [`ImageMetadata`] from an image file.
pub trait MetadataSource: Send + Sync {
    /// Fails with `FileNotFound` for a missing file and `MetadataRead` for an
    /// unparseable container. Missing tags are `None`, not errors.
    fn extract(&self, path: &Path) -> PipelineResult<ImageMetadata>;
}

/// EXIF-backed [`MetadataSource`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataExtractor;

impl MetadataSource for MetadataExtractor {
    fn extract(&self, path: &Path) -> PipelineResult<ImageMetadata> {
        Self::read(path)
    }
}

impl MetadataExtractor {
    /// Extract capture date and GPS coordinates from an image file.
    pub fn read(path: &Path) -> PipelineResult<ImageMetadata> {
        if !path.is_file() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|e| PipelineError::Io {
            path: path.to_path_buf(),
            message: "Cannot open file".to_string(),
            source: e,
        })?;
        let mut reader = BufReader::new(file);

        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            // Valid container without an EXIF block
            Err(exif::Error::NotFound(_)) => return Ok(ImageMetadata::default()),
            Err(e) => {
                if Self::is_exifless_format(path) {
                    return Ok(ImageMetadata::default());
                }
                return Err(PipelineError::MetadataRead {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        Ok(ImageMetadata {
            capture_date: Self::get_datetime(&exif),
            latitude: Self::get_gps_coord(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef),
            longitude: Self::get_gps_coord(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef),
        })
    }

    /// GIF and BMP decode fine but the EXIF reader doesn't know their containers.
    fn is_exifless_format(path: &Path) -> bool {
        let mut header = [0u8; 16];
        let read = File::open(path)
            .and_then(|mut f| f.read(&mut header))
            .unwrap_or(0);
        matches!(
            image::guess_format(&header[..read]),
            Ok(ImageFormat::Gif) | Ok(ImageFormat::Bmp)
        )
    }

    /// Get the capture datetime, preferring DateTimeOriginal over DateTime.
    fn get_datetime(exif: &exif::Exif) -> Option<NaiveDateTime> {
        let field = exif
            .get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))?;

        let ascii = match &field.value {
            Value::Ascii(values) => values.first()?,
            _ => return None,
        };
        let dt = exif::DateTime::from_ascii(ascii).ok()?;

        NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))?
            .and_hms_opt(
                u32::from(dt.hour),
                u32::from(dt.minute),
                u32::from(dt.second),
            )
    }

    /// Get GPS coordinate, converting from degrees/minutes/seconds to decimal.
    fn get_gps_coord(exif: &exif::Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
        let coord = exif.get_field(coord_tag, In::PRIMARY)?;
        let reference = exif.get_field(ref_tag, In::PRIMARY)?;

        let degrees = Self::parse_gps_rationals(&coord.value)?;
        let ref_str = reference.display_value().to_string();

        // S and W are negative
        let sign = if ref_str.contains('S') || ref_str.contains('W') {
            -1.0
        } else {
            1.0
        };

        Some(sign * degrees)
    }

    /// Parse GPS rationals (degrees, minutes, seconds) to decimal degrees.
    fn parse_gps_rationals(value: &Value) -> Option<f64> {
        match value {
            Value::Rational(rationals) if rationals.len() >= 3 => {
                let degrees = rationals[0].to_f64();
                let minutes = rationals[1].to_f64();
                let seconds = rationals[2].to_f64();
                let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
                decimal.is_finite().then_some(decimal)
            }
            _ => None,
        }
    }
}
