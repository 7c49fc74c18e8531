use scrubber_services::{ImageSummary, MapState, SessionSnapshot};
use serde::Serialize;

use super::metadata::{render, MetadataView};

/// Everything the page needs to draw the current session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub image: Option<ImageSummary>,
    /// `null` when nothing is selected
    pub metadata: Option<MetadataView>,
    pub map: MapState,
}

impl SessionView {
    pub fn new(snapshot: SessionSnapshot, external_map_url: &str) -> Self {
        Self {
            metadata: snapshot
                .outcome
                .as_ref()
                .map(|outcome| render(outcome, external_map_url)),
            image: snapshot.image,
            map: snapshot.map,
        }
    }
}
