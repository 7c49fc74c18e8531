use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;
use scrubber_core::AppError;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::views::SessionView;

/// File intake: exactly one multipart field named `file`.
///
/// Rejected files leave the session as it was. Accepted files answer 202 with the
/// session in its pending state; the outcome settles in the background.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (data, file_name, content_type) = extract_single_file(multipart?).await?;

    let snapshot = state
        .session
        .intake(&file_name, &content_type, data)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SessionView::new(
            snapshot,
            &state.config.map.external_map_url,
        )),
    ))
}

async fn extract_single_file(
    mut multipart: Multipart,
) -> Result<(Bytes, String, String), AppError> {
    let mut file: Option<(Bytes, String, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Drop a single file; send exactly one field named 'file'".to_string(),
            ));
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

        file = Some((data, file_name, content_type));
    }

    file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}
