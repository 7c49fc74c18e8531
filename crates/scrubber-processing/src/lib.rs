//! EXIF Scrubber Processing Library
//!
//! Intake validation, metadata extraction and the re-encode export that produces
//! metadata-free copies of an image.

pub mod extractor;
pub mod image;
pub mod scrub;
pub mod validator;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types
pub use self::image::ImageOrientation;
pub use extractor::{ExtractionError, KamadakExifExtractor, MetadataExtractor};
pub use scrub::{scrubbed_file_name, ExportError, ScrubExporter, ScrubbedImage};
pub use validator::{IntakeValidator, ValidationError};
