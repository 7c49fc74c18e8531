//! EXIF Scrubber Services Layer
//!
//! Orchestration for the single active image: intake, asynchronous extraction with
//! stale-result discard, the preview handle registry, the on-demand map viewer and
//! the persisted theme preference. HTTP concerns stay in scrubber-api.

pub mod error;
pub mod map;
pub mod preview;
pub mod session;
pub mod theme;

pub use error::SessionError;
pub use map::{
    LeafletBackend, MapAssets, MapBackend, MapError, MapInstance, MapMarker, MapState,
    MapViewer, TileLayer,
};
pub use preview::{PreviewEntry, PreviewHandle, PreviewRegistry};
pub use scrubber_processing::{
    IntakeValidator, KamadakExifExtractor, MetadataExtractor, ScrubExporter, ScrubbedImage,
};
pub use session::{ImageSummary, ScrubSession, SessionSnapshot};
pub use theme::{ThemeStore, ThemeStoreError};
