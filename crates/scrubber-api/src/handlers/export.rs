use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Download a metadata-free copy of the selected image.
pub async fn export_image(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let scrubbed = state.session.export().await?;

    Ok((
        [
            (header::CONTENT_TYPE, scrubbed.mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&scrubbed.file_name),
            ),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        scrubbed.bytes,
    ))
}

/// `attachment` with an ASCII fallback name and the exact UTF-8 name in `filename*`.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        utf8_percent_encode(file_name, NON_ALPHANUMERIC)
    )
}
