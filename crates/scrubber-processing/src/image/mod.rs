//! Pixel-level helpers used by the export path

pub mod orientation;

pub use orientation::ImageOrientation;
