//! Constants shared across crates

/// Prefix prepended to the original file name of an exported image.
pub const SCRUBBED_FILE_PREFIX: &str = "scrubbed_";

/// Well-known metadata keys carrying decimal-degree GPS coordinates.
pub const LATITUDE_KEY: &str = "latitude";
pub const LONGITUDE_KEY: &str = "longitude";

/// User-facing messages for the extraction outcome states.
pub const MSG_EXTRACTING: &str = "Extracting metadata...";
pub const MSG_NO_METADATA: &str = "No EXIF metadata found in this image.";
pub const MSG_EXTRACTION_FAILED: &str =
    "Could not read metadata. The file might be corrupted or in an unsupported format.";

pub const APP_TITLE: &str = "EXIF Scrubber";
pub const APP_TAGLINE: &str = "Privacy-first image metadata remover";
