//! Serializable views rendered for the page

pub mod metadata;
pub mod session;

pub use metadata::{render, LocationView, MetadataRow, MetadataView};
pub use session::SessionView;
