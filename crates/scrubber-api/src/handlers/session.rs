use axum::extract::State;
use axum::Json;
use scrubber_core::AppError;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::views::{render, MetadataView, SessionView};

pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let snapshot = state.session.snapshot().await;
    Json(SessionView::new(
        snapshot,
        &state.config.map.external_map_url,
    ))
}

/// Rendered metadata for the selected image
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetadataView>, HttpAppError> {
    let outcome = state
        .session
        .outcome()
        .await
        .ok_or_else(|| AppError::NoActiveImage("No image is selected".to_string()))?;

    Ok(Json(render(&outcome, &state.config.map.external_map_url)))
}
