//! Metadata renderer
//!
//! A pure function of the extraction outcome. The page turns the view into DOM nodes
//! with `textContent`, so values are never interpreted as markup.

use scrubber_core::constants::{MSG_EXTRACTING, MSG_NO_METADATA};
use scrubber_core::{ExtractionOutcome, GpsCoordinate, Metadata};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRow {
    pub key: String,
    pub value: String,
}

/// Location affordance shown above the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationView {
    pub latitude: f64,
    pub longitude: f64,
    /// Outbound link to an external map service, opened in a new browsing context
    pub external_url: String,
    /// Whether the inline "show map" trigger is offered
    pub map_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetadataView {
    Loading {
        message: String,
    },
    Error {
        message: String,
    },
    Empty {
        message: String,
    },
    Table {
        #[serde(skip_serializing_if = "Option::is_none")]
        location: Option<LocationView>,
        rows: Vec<MetadataRow>,
    },
}

pub fn render(outcome: &ExtractionOutcome, external_map_url: &str) -> MetadataView {
    match outcome {
        ExtractionOutcome::Pending => MetadataView::Loading {
            message: MSG_EXTRACTING.to_string(),
        },
        ExtractionOutcome::Failed { reason } => MetadataView::Error {
            message: reason.clone(),
        },
        ExtractionOutcome::Empty => MetadataView::Empty {
            message: MSG_NO_METADATA.to_string(),
        },
        ExtractionOutcome::Success { metadata } => table(metadata, external_map_url),
    }
}

fn table(metadata: &Metadata, external_map_url: &str) -> MetadataView {
    let rows = metadata
        .iter()
        .map(|entry| MetadataRow {
            key: entry.key.clone(),
            value: entry.value.to_string(),
        })
        .collect();

    let location = metadata.coordinates().map(|point| LocationView {
        latitude: point.latitude,
        longitude: point.longitude,
        external_url: external_map_link(external_map_url, point),
        map_available: true,
    });

    MetadataView::Table { location, rows }
}

/// `<base>?q=<lat>,<lon>` with the raw coordinates.
pub fn external_map_link(base: &str, point: GpsCoordinate) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!(
        "{}{}q={},{}",
        base, separator, point.latitude, point.longitude
    )
}
