//! Map viewer
//!
//! Maps are created only on an explicit request. The viewer resolves the map library
//! once per process, waits a fixed layout delay so the page container is laid out, then
//! asks the backend for an instance descriptor: one tile layer, one marker, and the delay
//! after which the page should run its resize pass. The browser renders from that
//! descriptor.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scrubber_core::config::MapConfig;
use scrubber_core::GpsCoordinate;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use uuid::Uuid;

const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

#[derive(Debug, Clone, thiserror::Error)]
pub enum MapError {
    #[error("Map library unavailable: {0}")]
    LibraryUnavailable(String),

    #[error("Map container not ready: {0}")]
    ContainerNotReady(String),
}

/// Locations of the map library script, stylesheet and marker icons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapAssets {
    pub script_url: String,
    pub stylesheet_url: String,
    pub marker_icon_url: String,
    pub marker_icon_retina_url: String,
    pub marker_shadow_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub position: GpsCoordinate,
    pub icon_url: String,
    pub icon_retina_url: String,
    pub shadow_url: String,
}

/// A live map bound to the current image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapInstance {
    pub id: Uuid,
    pub image_id: Uuid,
    pub center: GpsCoordinate,
    pub zoom: u8,
    pub tile_layer: TileLayer,
    pub marker: MapMarker,
    pub assets: MapAssets,
    /// Delay before the page re-measures the container and redraws
    pub relayout_after_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// Map session state for the current image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MapState {
    #[default]
    Idle,
    Loading {
        #[serde(skip)]
        image_id: Uuid,
        #[serde(skip)]
        request_id: Uuid,
    },
    Ready {
        instance: MapInstance,
    },
}

impl MapState {
    pub fn is_idle(&self) -> bool {
        matches!(self, MapState::Idle)
    }

    pub fn instance(&self) -> Option<&MapInstance> {
        match self {
            MapState::Ready { instance } => Some(instance),
            _ => None,
        }
    }
}

#[async_trait]
pub trait MapBackend: Send + Sync {
    /// Resolve the library assets. Called at most once successfully per viewer.
    async fn load_library(&self) -> Result<MapAssets, MapError>;

    async fn create_instance(
        &self,
        assets: &MapAssets,
        image_id: Uuid,
        center: GpsCoordinate,
    ) -> Result<MapInstance, MapError>;
}

/// Leaflet with a raster tile layer
#[derive(Debug, Clone)]
pub struct LeafletBackend {
    config: MapConfig,
}

impl LeafletBackend {
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MapBackend for LeafletBackend {
    async fn load_library(&self) -> Result<MapAssets, MapError> {
        let base = self.config.asset_base_url.trim_end_matches('/');
        if !base.starts_with("https://") {
            return Err(MapError::LibraryUnavailable(format!(
                "asset base '{}' is not an https URL",
                base
            )));
        }

        Ok(MapAssets {
            script_url: format!("{}/leaflet.js", base),
            stylesheet_url: format!("{}/leaflet.css", base),
            marker_icon_url: format!("{}/images/marker-icon.png", base),
            marker_icon_retina_url: format!("{}/images/marker-icon-2x.png", base),
            marker_shadow_url: format!("{}/images/marker-shadow.png", base),
        })
    }

    async fn create_instance(
        &self,
        assets: &MapAssets,
        image_id: Uuid,
        center: GpsCoordinate,
    ) -> Result<MapInstance, MapError> {
        if !center.latitude.is_finite() || !center.longitude.is_finite() {
            return Err(MapError::ContainerNotReady(
                "center is not a finite coordinate".to_string(),
            ));
        }

        Ok(MapInstance {
            id: Uuid::new_v4(),
            image_id,
            center,
            zoom: self.config.default_zoom,
            tile_layer: TileLayer {
                url_template: self.config.tile_url_template.clone(),
                subdomains: self.config.tile_subdomains.clone(),
                attribution: TILE_ATTRIBUTION.to_string(),
            },
            marker: MapMarker {
                position: center,
                icon_url: assets.marker_icon_url.clone(),
                icon_retina_url: assets.marker_icon_retina_url.clone(),
                shadow_url: assets.marker_shadow_url.clone(),
            },
            assets: assets.clone(),
            relayout_after_ms: self.config.relayout_delay_ms,
            created_at: Utc::now(),
        })
    }
}

pub struct MapViewer {
    backend: Arc<dyn MapBackend>,
    library: OnceCell<MapAssets>,
    layout_delay: Duration,
    instances_created: AtomicUsize,
}

impl MapViewer {
    pub fn new(backend: Arc<dyn MapBackend>, layout_delay: Duration) -> Self {
        Self {
            backend,
            library: OnceCell::new(),
            layout_delay,
            instances_created: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(
            Arc::new(LeafletBackend::new(config.clone())),
            Duration::from_millis(config.layout_delay_ms),
        )
    }

    /// Load-once guard for the library. A failed load is not cached, so a later
    /// request retries.
    pub async fn library(&self) -> Result<&MapAssets, MapError> {
        self.library
            .get_or_try_init(|| async {
                tracing::info!("Loading map library");
                self.backend.load_library().await
            })
            .await
    }

    pub fn is_library_loaded(&self) -> bool {
        self.library.initialized()
    }

    pub async fn create(
        &self,
        image_id: Uuid,
        center: GpsCoordinate,
    ) -> Result<MapInstance, MapError> {
        let assets = self.library().await?.clone();

        tokio::time::sleep(self.layout_delay).await;

        let instance = self
            .backend
            .create_instance(&assets, image_id, center)
            .await?;
        self.instances_created.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            map_id = %instance.id,
            image_id = %image_id,
            zoom = instance.zoom,
            "Map instance created"
        );
        Ok(instance)
    }

    /// Number of instances created over the viewer's lifetime
    pub fn instances_created(&self) -> usize {
        self.instances_created.load(Ordering::Relaxed)
    }
}
