//! EXIF Scrubber Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the processing, service and HTTP layers.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    ExtractionOutcome, GpsCoordinate, ImageMime, Metadata, MetadataEntry, MetadataValue, ResolvedTheme,
    SelectedImage, ThemeMode, ThemePreference,
};
