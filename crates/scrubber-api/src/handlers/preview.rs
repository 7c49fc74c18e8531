use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use scrubber_core::AppError;
use scrubber_services::PreviewHandle;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Serve the bytes behind a live preview handle. Revoked handles are gone.
pub async fn get_preview(
    State(state): State<Arc<AppState>>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let not_found = || AppError::NotFound("Preview is no longer available".to_string());

    let handle: PreviewHandle = handle.parse().map_err(|_| not_found())?;
    let entry = state.session.preview(&handle).await.ok_or_else(not_found)?;

    Ok((
        [
            (header::CONTENT_TYPE, entry.mime.to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        entry.bytes,
    ))
}
