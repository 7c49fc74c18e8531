//! Scrub session
//!
//! Owns the at-most-one selected image together with everything derived from it: the
//! extraction outcome, the preview handle and the map session. A new selection or a
//! reset tears all of them down together.
//!
//! Extraction runs on a spawned task. Its result is applied only while the image it was
//! started for is still the selected one, so a slow extraction for a superseded file
//! can never overwrite newer state.

use bytes::Bytes;
use scrubber_core::constants::MSG_EXTRACTION_FAILED;
use scrubber_core::{Config, ExtractionOutcome, ImageMime, SelectedImage};
use scrubber_processing::{
    IntakeValidator, KamadakExifExtractor, MetadataExtractor, ScrubExporter, ScrubbedImage,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::SessionError;
use crate::map::{MapState, MapViewer};
use crate::preview::{PreviewEntry, PreviewHandle, PreviewRegistry};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummary {
    pub id: Uuid,
    pub name: String,
    pub mime: ImageMime,
    pub size_bytes: usize,
    pub preview_url: Option<String>,
}

/// Point-in-time view of the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub image: Option<ImageSummary>,
    pub outcome: Option<ExtractionOutcome>,
    pub map: MapState,
}

impl SessionSnapshot {
    pub fn is_idle(&self) -> bool {
        self.image.is_none() && self.outcome.is_none() && self.map.is_idle()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    image: Option<SelectedImage>,
    preview: Option<PreviewHandle>,
    previews: PreviewRegistry,
    outcome: Option<ExtractionOutcome>,
    map: MapState,
}

impl SessionState {
    fn current_image_id(&self) -> Option<Uuid> {
        self.image.as_ref().map(|image| image.id)
    }

    /// Release the preview handle and map, then forget the image and its outcome.
    fn clear(&mut self) {
        if let Some(handle) = self.preview.take() {
            self.previews.revoke(handle);
        }
        self.teardown_map();
        self.image = None;
        self.outcome = None;
    }

    fn teardown_map(&mut self) {
        match std::mem::take(&mut self.map) {
            MapState::Ready { instance } => {
                tracing::info!(map_id = %instance.id, "Map instance destroyed");
            }
            MapState::Loading { request_id, .. } => {
                tracing::debug!(request_id = %request_id, "Pending map request abandoned");
            }
            MapState::Idle => {}
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            image: self.image.as_ref().map(|image| ImageSummary {
                id: image.id,
                name: image.name.clone(),
                mime: image.mime.clone(),
                size_bytes: image.size_bytes(),
                preview_url: self.preview.map(|handle| handle.url()),
            }),
            outcome: self.outcome.clone(),
            map: self.map.clone(),
        }
    }
}

pub struct ScrubSession {
    validator: IntakeValidator,
    extractor: Arc<dyn MetadataExtractor>,
    exporter: ScrubExporter,
    map_viewer: MapViewer,
    state: Arc<Mutex<SessionState>>,
}

impl ScrubSession {
    pub fn new(
        validator: IntakeValidator,
        extractor: Arc<dyn MetadataExtractor>,
        exporter: ScrubExporter,
        map_viewer: MapViewer,
    ) -> Self {
        Self {
            validator,
            extractor,
            exporter,
            map_viewer,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            IntakeValidator::from_config(&config.intake),
            Arc::new(KamadakExifExtractor::new()),
            ScrubExporter::new(config.intake.jpeg_export_quality),
            MapViewer::from_config(&config.map),
        )
    }

    pub fn map_viewer(&self) -> &MapViewer {
        &self.map_viewer
    }

    /// Accept one file, superseding whatever was selected before.
    ///
    /// A rejected file leaves the session untouched. An accepted file starts extraction in
    /// the background; the returned snapshot shows the outcome as pending.
    pub async fn intake(
        &self,
        name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<SessionSnapshot, SessionError> {
        let mime = match self.validator.validate_all(content_type, bytes.len()) {
            Ok(mime) => mime,
            Err(e) => {
                tracing::debug!(
                    file_name = %name,
                    content_type = %content_type,
                    error = %e,
                    "File rejected at intake"
                );
                return Err(e.into());
            }
        };

        let image = SelectedImage::new(display_name(name), mime, bytes);
        let image_id = image.id;
        let data = image.bytes.clone();

        let snapshot = {
            let mut state = self.state.lock().await;
            if let Some(previous) = state.current_image_id() {
                tracing::debug!(previous_image_id = %previous, "Superseding selected image");
            }
            state.clear();
            let handle = state.previews.allocate(&image);
            state.preview = Some(handle);
            state.image = Some(image);
            state.outcome = Some(ExtractionOutcome::Pending);
            state.snapshot()
        };

        tracing::info!(
            image_id = %image_id,
            file_name = %name,
            size_bytes = data.len(),
            "Image accepted"
        );

        let extractor = self.extractor.clone();
        let state = self.state.clone();
        tokio::spawn(async move {
            let outcome = match extractor.extract(data).await {
                Ok(Some(metadata)) => ExtractionOutcome::Success { metadata },
                Ok(None) => ExtractionOutcome::Empty,
                Err(e) => {
                    tracing::warn!(image_id = %image_id, error = %e, "Metadata extraction failed");
                    ExtractionOutcome::Failed {
                        reason: MSG_EXTRACTION_FAILED.to_string(),
                    }
                }
            };

            let mut state = state.lock().await;
            if state.current_image_id() != Some(image_id) {
                tracing::debug!(
                    image_id = %image_id,
                    outcome = outcome.state_name(),
                    "Discarding extraction result for superseded image"
                );
                return;
            }
            tracing::info!(
                image_id = %image_id,
                outcome = outcome.state_name(),
                "Metadata extraction finished"
            );
            state.outcome = Some(outcome);
        });

        Ok(snapshot)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn outcome(&self) -> Option<ExtractionOutcome> {
        self.state.lock().await.outcome.clone()
    }

    /// Bytes behind a live preview handle
    pub async fn preview(&self, handle: &PreviewHandle) -> Option<PreviewEntry> {
        self.state.lock().await.previews.get(handle).cloned()
    }

    pub async fn live_preview_count(&self) -> usize {
        self.state.lock().await.previews.len()
    }

    /// Show the map for the current image.
    ///
    /// A no-op returning the current state when a map already exists or is loading, when
    /// nothing is selected, or when the metadata carries no usable coordinates. On failure
    /// the map reverts to idle.
    pub async fn show_map(&self) -> Result<MapState, SessionError> {
        let (image_id, request_id, center) = {
            let mut state = self.state.lock().await;
            let Some(image_id) = state.current_image_id() else {
                return Ok(MapState::Idle);
            };
            if !state.map.is_idle() {
                return Ok(state.map.clone());
            }
            let Some(center) = state
                .outcome
                .as_ref()
                .and_then(|outcome| outcome.metadata())
                .and_then(|metadata| metadata.coordinates())
            else {
                return Ok(MapState::Idle);
            };

            let request_id = Uuid::new_v4();
            state.map = MapState::Loading {
                image_id,
                request_id,
            };
            (image_id, request_id, center)
        };

        let result = self.map_viewer.create(image_id, center).await;

        let mut state = self.state.lock().await;
        let still_wanted = matches!(
            &state.map,
            MapState::Loading { request_id: current, .. } if *current == request_id
        );
        if !still_wanted {
            tracing::debug!(
                request_id = %request_id,
                "Map request superseded before it finished"
            );
            return Ok(state.map.clone());
        }

        match result {
            Ok(instance) => {
                state.map = MapState::Ready { instance };
                Ok(state.map.clone())
            }
            Err(e) => {
                tracing::warn!(image_id = %image_id, error = %e, "Map initialization failed");
                state.map = MapState::Idle;
                Err(e.into())
            }
        }
    }

    /// Destroy the map, if any
    pub async fn close_map(&self) -> MapState {
        let mut state = self.state.lock().await;
        state.teardown_map();
        state.map.clone()
    }

    /// Produce a metadata-free copy of the selected image.
    pub async fn export(&self) -> Result<ScrubbedImage, SessionError> {
        let image = {
            let state = self.state.lock().await;
            match (&state.image, state.preview) {
                (Some(image), Some(_)) => image.clone(),
                _ => return Err(SessionError::NoActiveImage),
            }
        };

        let scrubbed = self.exporter.export(&image).await?;
        tracing::info!(
            image_id = %image.id,
            file_name = %scrubbed.file_name,
            size_bytes = scrubbed.bytes.len(),
            "Scrubbed copy exported"
        );
        Ok(scrubbed)
    }

    /// Return to the initial idle state.
    pub async fn reset(&self) -> SessionSnapshot {
        let mut state = self.state.lock().await;
        if let Some(image_id) = state.current_image_id() {
            tracing::info!(image_id = %image_id, "Session reset");
        }
        state.clear();
        state.snapshot()
    }
}

/// Keep only the final path component of a client-supplied name.
fn display_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() {
        "image".to_string()
    } else {
        base.to_string()
    }
}
