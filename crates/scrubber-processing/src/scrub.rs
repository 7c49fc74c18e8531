//! Scrub-and-export
//!
//! The original file is decoded, its pixels are drawn onto a blank surface, and that
//! surface is encoded afresh. Encoders only ever see pixel data, so no metadata segment
//! of the source can reach the output. Anything hidden in the pixels themselves survives.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{
    imageops, DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, ImageReader,
    RgbaImage,
};
use scrubber_core::constants::SCRUBBED_FILE_PREFIX;
use scrubber_core::{ImageMime, SelectedImage};
use std::io::Cursor;

use crate::image::ImageOrientation;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Export task failed: {0}")]
    Task(String),
}

/// A metadata-free copy ready for download
#[derive(Debug, Clone)]
pub struct ScrubbedImage {
    pub file_name: String,
    pub mime: ImageMime,
    pub bytes: Bytes,
}

/// Download name for an exported copy: `scrubbed_<original name>`.
pub fn scrubbed_file_name(original: &str) -> String {
    format!("{}{}", SCRUBBED_FILE_PREFIX, original)
}

#[derive(Debug, Clone, Copy)]
pub struct ScrubExporter {
    jpeg_quality: u8,
}

impl ScrubExporter {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Re-encode the selected image. PNG stays PNG, every other family becomes JPEG.
    pub async fn export(&self, image: &SelectedImage) -> Result<ScrubbedImage, ExportError> {
        let data = image.bytes.clone();
        let mime = image.mime.export_mime();
        let quality = self.jpeg_quality;

        // Decode and encode are CPU-bound
        let encode_mime = mime.clone();
        let bytes = tokio::task::spawn_blocking(move || re_encode(&data, &encode_mime, quality))
            .await
            .map_err(|e| ExportError::Task(e.to_string()))??;

        tracing::debug!(
            image_id = %image.id,
            mime = %mime,
            input_bytes = image.bytes.len(),
            output_bytes = bytes.len(),
            "Image re-encoded without metadata"
        );

        Ok(ScrubbedImage {
            file_name: scrubbed_file_name(&image.name),
            mime,
            bytes: Bytes::from(bytes),
        })
    }
}

/// Decode, draw onto a blank surface at natural size, encode.
pub fn re_encode(
    data: &[u8],
    mime: &ImageMime,
    jpeg_quality: u8,
) -> Result<Vec<u8>, ExportError> {
    let decoded = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ExportError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| ExportError::Decode(e.to_string()))?;

    let displayed = ImageOrientation::apply_exif_orientation(decoded, data);
    let (width, height) = displayed.dimensions();

    let mut surface = RgbaImage::new(width, height);
    imageops::overlay(&mut surface, &displayed.to_rgba8(), 0, 0);

    let mut out = Vec::new();
    match mime {
        ImageMime::Png => PngEncoder::new(&mut out)
            .write_image(surface.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(|e| ExportError::Encode(e.to_string()))?,
        _ => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(surface).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, jpeg_quality)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| ExportError::Encode(e.to_string()))?
        }
    }

    Ok(out)
}
