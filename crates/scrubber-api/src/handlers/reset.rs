use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::state::AppState;
use crate::views::SessionView;

/// Drop the image, its outcome, preview handle and map.
pub async fn reset_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let snapshot = state.session.reset().await;
    Json(SessionView::new(
        snapshot,
        &state.config.map.external_map_url,
    ))
}
