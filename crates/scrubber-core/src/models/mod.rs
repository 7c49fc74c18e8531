//! Domain models for the single-image scrub session.

pub mod image;
pub mod metadata;
pub mod outcome;
pub mod theme;

pub use image::{ImageMime, SelectedImage};
pub use metadata::{GpsCoordinate, Metadata, MetadataEntry, MetadataValue};
pub use outcome::ExtractionOutcome;
pub use theme::{ResolvedTheme, ThemeMode, ThemePreference};
