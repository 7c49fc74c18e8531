use axum::extract::State;
use axum::Json;
use scrubber_services::MapState;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Show the map for the current image. Repeated requests return the existing map.
pub async fn show_map(State(state): State<Arc<AppState>>) -> Result<Json<MapState>, HttpAppError> {
    let map = state.session.show_map().await?;
    Ok(Json(map))
}

/// Tear the map down (the page's map container went away)
pub async fn close_map(State(state): State<Arc<AppState>>) -> Json<MapState> {
    Json(state.session.close_map().await)
}
