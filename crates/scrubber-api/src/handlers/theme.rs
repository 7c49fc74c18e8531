use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use scrubber_core::{ThemeMode, ThemePreference};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::page::system_hint;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub preference: ThemePreference,
    /// `null` while neither a stored preference nor the platform scheme is known
    pub resolved: Option<ThemeMode>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateThemeRequest {
    pub theme: ThemePreference,
}

pub async fn get_theme(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<ThemeResponse> {
    Json(theme_response(&state, &headers).await)
}

pub async fn update_theme(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<UpdateThemeRequest>,
) -> Result<Json<ThemeResponse>, HttpAppError> {
    state.theme.set(request.theme).await?;
    Ok(Json(theme_response(&state, &headers).await))
}

async fn theme_response(state: &AppState, headers: &HeaderMap) -> ThemeResponse {
    let preference = state.theme.preference().await;
    ThemeResponse {
        preference,
        resolved: preference.resolve(system_hint(headers)).mode(),
    }
}
