//! The single page
//!
//! The theme is resolved before the page is rendered and injected on the root element.
//! While it cannot be resolved (no stored preference and no colour-scheme client hint
//! yet) the page is rendered with a neutral placeholder that the script settles.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName};
use axum::response::{Html, IntoResponse};
use scrubber_core::constants::{APP_TAGLINE, APP_TITLE};
use scrubber_core::{ResolvedTheme, ThemeMode};
use std::sync::Arc;

use crate::assets::INDEX_HTML;
use crate::state::AppState;

pub const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

/// Platform colour scheme announced by the browser, if any.
pub fn system_hint(headers: &HeaderMap) -> Option<ThemeMode> {
    headers
        .get(COLOR_SCHEME_HINT)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let resolved = state.theme.resolve(system_hint(&headers)).await;

    (
        [
            (
                HeaderName::from_static("accept-ch"),
                "Sec-CH-Prefers-Color-Scheme",
            ),
            (header::VARY, "Sec-CH-Prefers-Color-Scheme"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Html(render_page(resolved)),
    )
}

pub fn render_page(theme: ResolvedTheme) -> String {
    let theme_attr = match theme {
        ResolvedTheme::Resolved(mode) => format!("data-theme=\"{}\"", mode.as_str()),
        ResolvedTheme::Unresolved => "data-theme-pending".to_string(),
    };

    INDEX_HTML
        .replace("{{theme_attr}}", &theme_attr)
        .replace("{{title}}", APP_TITLE)
        .replace("{{tagline}}", APP_TAGLINE)
}
