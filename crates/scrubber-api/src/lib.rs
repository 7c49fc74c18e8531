//! EXIF Scrubber API Library
//!
//! The local HTTP surface: the single page and its assets, the JSON endpoints the page
//! drives, the security-policy middleware and application setup.

mod assets;
mod handlers;
mod middleware;
mod telemetry;

pub mod error;
pub mod setup;
pub mod state;
pub mod views;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
