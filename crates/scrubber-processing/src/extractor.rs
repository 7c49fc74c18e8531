//! Metadata extraction
//!
//! Parsing of the metadata container is delegated to `kamadak-exif`. This module only
//! flattens the parsed fields into an ordered [`Metadata`] mapping and derives decimal
//! GPS coordinates.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use exif::{Exif, Field, In, Reader, Tag, Value};
use scrubber_core::constants::{LATITUDE_KEY, LONGITUDE_KEY};
use scrubber_core::{Metadata, MetadataValue};
use std::io::Cursor;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The file is not a readable image container, or its metadata segment is broken.
    #[error("Malformed image: {0}")]
    Malformed(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Turns raw image bytes into a tag mapping.
///
/// `Ok(None)` means the file carries no metadata; `Err` means it could not be read.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, data: Bytes) -> Result<Option<Metadata>, ExtractionError>;
}

/// [`MetadataExtractor`] backed by `kamadak-exif`
#[derive(Debug, Clone, Copy, Default)]
pub struct KamadakExifExtractor;

impl KamadakExifExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous extraction, for callers already off the async runtime.
    ///
    /// Unreadable individual fields are dropped; only a broken container is an error.
    pub fn extract_blocking(data: &[u8]) -> Result<Option<Metadata>, ExtractionError> {
        let mut cursor = Cursor::new(data);
        let exif = match Reader::new()
            .continue_on_error(true)
            .read_from_container(&mut cursor)
            .or_else(|e| {
                e.distill_partial_result(|errors| {
                    for error in &errors {
                        tracing::debug!(error = %error, "Skipping unreadable metadata field");
                    }
                })
            }) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(None),
            Err(e) => return Err(ExtractionError::Malformed(e.to_string())),
        };

        let metadata = flatten(&exif);
        if metadata.is_empty() {
            return Ok(None);
        }
        Ok(Some(metadata))
    }
}

#[async_trait]
impl MetadataExtractor for KamadakExifExtractor {
    async fn extract(&self, data: Bytes) -> Result<Option<Metadata>, ExtractionError> {
        tokio::task::spawn_blocking(move || Self::extract_blocking(&data))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
    }
}

fn flatten(exif: &Exif) -> Metadata {
    let mut metadata = Metadata::new();

    for field in exif.fields() {
        // Thumbnail IFD duplicates primary tags for the embedded preview
        if field.ifd_num != In::PRIMARY || field.tag == Tag::MakerNote {
            continue;
        }
        metadata.insert(field.tag.to_string(), field_value(field, exif));
    }

    if let (Some(latitude), Some(longitude)) = (
        gps_degrees(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S'),
        gps_degrees(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W'),
    ) {
        metadata.insert(LATITUDE_KEY, latitude);
        metadata.insert(LONGITUDE_KEY, longitude);
    }

    metadata
}

fn field_value(field: &Field, exif: &Exif) -> MetadataValue {
    if matches!(
        field.tag,
        Tag::DateTime | Tag::DateTimeOriginal | Tag::DateTimeDigitized
    ) {
        if let Some(iso) = iso_datetime(&field.value) {
            return MetadataValue::Text(iso);
        }
    }

    // display_value() quotes ASCII strings
    if let Value::Ascii(parts) = &field.value {
        let text = parts
            .iter()
            .map(|part| String::from_utf8_lossy(part).trim_end_matches('\0').trim().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return MetadataValue::Text(text);
    }

    let number = match &field.value {
        Value::Byte(v) if v.len() == 1 => Some(f64::from(v[0])),
        Value::Short(v) if v.len() == 1 => Some(f64::from(v[0])),
        Value::Long(v) if v.len() == 1 => Some(f64::from(v[0])),
        Value::SByte(v) if v.len() == 1 => Some(f64::from(v[0])),
        Value::SShort(v) if v.len() == 1 => Some(f64::from(v[0])),
        Value::SLong(v) if v.len() == 1 => Some(f64::from(v[0])),
        Value::Rational(v) if v.len() == 1 => Some(v[0].to_f64()),
        Value::SRational(v) if v.len() == 1 => Some(v[0].to_f64()),
        Value::Float(v) if v.len() == 1 => Some(f64::from(v[0])),
        Value::Double(v) if v.len() == 1 => Some(v[0]),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => MetadataValue::Number(n),
        _ => MetadataValue::Text(field.display_value().with_unit(exif).to_string()),
    }
}

/// EXIF `YYYY:MM:DD HH:MM:SS` to ISO-8601 text.
fn iso_datetime(value: &Value) -> Option<String> {
    let raw = match value {
        Value::Ascii(v) => v.first()?,
        _ => return None,
    };
    let dt = exif::DateTime::from_ascii(raw).ok()?;
    let naive = NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))?
        .and_hms_opt(
            u32::from(dt.hour),
            u32::from(dt.minute),
            u32::from(dt.second),
        )?;
    Some(naive.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Decimal degrees from a DMS rational triple; `negative_ref` flips the sign (S, W).
fn gps_degrees(exif: &Exif, tag: Tag, ref_tag: Tag, negative_ref: u8) -> Option<f64> {
    let dms = match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(v) => dms_to_decimal(v)?,
        _ => return None,
    };

    let negative = match exif.get_field(ref_tag, In::PRIMARY).map(|f| &f.value) {
        Some(Value::Ascii(v)) => v
            .first()
            .and_then(|s| s.first())
            .is_some_and(|c| c.eq_ignore_ascii_case(&negative_ref)),
        _ => false,
    };

    let degrees = if negative { -dms } else { dms };
    degrees.is_finite().then_some(degrees)
}

fn dms_to_decimal(dms: &[exif::Rational]) -> Option<f64> {
    if dms.len() < 3 {
        return None;
    }
    let d = dms[0].to_f64();
    let m = dms[1].to_f64();
    let s = dms[2].to_f64();
    Some(d + m / 60.0 + s / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::fixtures;

    #[test]
    fn test_dms_to_decimal() {
        let dms = vec![
            exif::Rational { num: 40, denom: 1 },
            exif::Rational { num: 26, denom: 1 },
            exif::Rational { num: 46, denom: 1 },
        ];
        let decimal = dms_to_decimal(&dms).unwrap();
        assert!((decimal - 40.44611).abs() < 0.001, "got {}", decimal);
        assert!(dms_to_decimal(&dms[..2]).is_none());
    }

    #[test]
    fn test_iso_datetime() {
        let value = Value::Ascii(vec![b"2024:05:01 10:30:00".to_vec()]);
        assert_eq!(iso_datetime(&value).as_deref(), Some("2024-05-01T10:30:00"));

        let blank = Value::Ascii(vec![b"    :  :     :  :  ".to_vec()]);
        assert_eq!(iso_datetime(&blank), None);
    }

    #[tokio::test]
    async fn test_extract_jpeg_with_gps() {
        let data = fixtures::jpeg_with_exif(8, 6);
        let metadata = KamadakExifExtractor
            .extract(Bytes::from(data))
            .await
            .unwrap()
            .expect("fixture carries metadata");

        assert_eq!(
            metadata.get("Make"),
            Some(&MetadataValue::Text(fixtures::CAMERA_MAKE.to_string()))
        );
        assert_eq!(
            metadata.get("DateTimeOriginal"),
            Some(&MetadataValue::Text("2024-05-01T10:30:00".to_string()))
        );

        let coords = metadata.coordinates().expect("gps coordinates");
        assert!((coords.latitude - fixtures::LATITUDE).abs() < 1e-4);
        assert!((coords.longitude - fixtures::LONGITUDE).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_extract_png_with_exif() {
        let data = fixtures::png_with_exif(4, 4);
        let metadata = KamadakExifExtractor
            .extract(Bytes::from(data))
            .await
            .unwrap()
            .expect("fixture carries metadata");
        assert!(metadata.get("Model").is_some());
        assert!(metadata.coordinates().is_some());
    }

    #[test]
    fn test_extract_without_gps_has_no_coordinates() {
        let data = fixtures::jpeg_with_camera_only(4, 4);
        let metadata = KamadakExifExtractor::extract_blocking(&data)
            .unwrap()
            .expect("fixture carries metadata");
        assert!(metadata.get(LATITUDE_KEY).is_none());
        assert!(metadata.coordinates().is_none());
    }

    #[test]
    fn test_plain_images_have_no_metadata() {
        assert!(KamadakExifExtractor::extract_blocking(&fixtures::plain_jpeg(4, 4))
            .unwrap()
            .is_none());
        assert!(KamadakExifExtractor::extract_blocking(&fixtures::plain_png(4, 4))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_malformed_input_is_an_error_not_empty() {
        assert!(matches!(
            KamadakExifExtractor::extract_blocking(&fixtures::corrupt_jpeg()),
            Err(ExtractionError::Malformed(_))
        ));
        assert!(matches!(
            KamadakExifExtractor::extract_blocking(b"definitely not an image"),
            Err(ExtractionError::Malformed(_))
        ));
    }

    #[test]
    fn test_unreadable_field_keeps_readable_ones() {
        let data = fixtures::jpeg_with_broken_field(4, 4);
        let metadata = KamadakExifExtractor::extract_blocking(&data)
            .expect("a single bad field is not fatal")
            .expect("readable fields survive");

        assert_eq!(
            metadata.get("Make"),
            Some(&MetadataValue::Text(fixtures::CAMERA_MAKE.to_string()))
        );
        assert!(metadata.get("Model").is_none());
    }

    #[test]
    fn test_southern_western_hemisphere_is_negative() {
        let data = fixtures::jpeg_with_gps(4, 4, -33.8688, 151.2093);
        let coords = KamadakExifExtractor::extract_blocking(&data)
            .unwrap()
            .and_then(|m| m.coordinates())
            .unwrap();
        assert!(coords.latitude < 0.0);
        assert!(coords.longitude > 0.0);
    }
}
