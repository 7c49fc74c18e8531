use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declared MIME family of a selected image.
///
/// Only the PNG family survives export unchanged; every other family is re-encoded as JPEG.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ImageMime {
    Jpeg,
    Png,
    Other(String),
}

impl ImageMime {
    /// Parse a declared content type, ignoring case and parameters such as `; charset=...`.
    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => ImageMime::Jpeg,
            "image/png" => ImageMime::Png,
            _ => ImageMime::Other(essence),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Other(s) => s,
        }
    }

    /// MIME type used when the image is re-encoded for download.
    pub fn export_mime(&self) -> ImageMime {
        match self {
            ImageMime::Png => ImageMime::Png,
            _ => ImageMime::Jpeg,
        }
    }
}

impl From<ImageMime> for String {
    fn from(mime: ImageMime) -> Self {
        mime.as_str().to_string()
    }
}

impl From<String> for ImageMime {
    fn from(value: String) -> Self {
        ImageMime::from_content_type(&value)
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The currently active file: payload, declared type and display name.
///
/// Exactly one may be active at a time; a new selection replaces it wholesale.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub id: Uuid,
    pub name: String,
    pub mime: ImageMime,
    pub bytes: Bytes,
    pub accepted_at: DateTime<Utc>,
}

impl SelectedImage {
    pub fn new(name: impl Into<String>, mime: ImageMime, bytes: Bytes) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            mime,
            bytes,
            accepted_at: Utc::now(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_content_type_normalizes() {
        assert_eq!(ImageMime::from_content_type("IMAGE/JPEG"), ImageMime::Jpeg);
        assert_eq!(ImageMime::from_content_type("image/png; q=1"), ImageMime::Png);
        assert_eq!(
            ImageMime::from_content_type("image/gif"),
            ImageMime::Other("image/gif".to_string())
        );
    }

    #[test]
    fn test_export_mime_keeps_png_only() {
        assert_eq!(ImageMime::Png.export_mime(), ImageMime::Png);
        assert_eq!(ImageMime::Jpeg.export_mime(), ImageMime::Jpeg);
        assert_eq!(
            ImageMime::Other("image/webp".to_string()).export_mime(),
            ImageMime::Jpeg
        );
    }

    #[test]
    fn test_mime_serializes_as_string() {
        let json = serde_json::to_string(&ImageMime::Png).unwrap();
        assert_eq!(json, "\"image/png\"");
        let parsed: ImageMime = serde_json::from_str("\"image/jpeg\"").unwrap();
        assert_eq!(parsed, ImageMime::Jpeg);
    }

    #[test]
    fn test_selected_images_get_distinct_ids() {
        let a = SelectedImage::new("a.jpg", ImageMime::Jpeg, Bytes::from_static(b"a"));
        let b = SelectedImage::new("a.jpg", ImageMime::Jpeg, Bytes::from_static(b"a"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.size_bytes(), 1);
    }
}
