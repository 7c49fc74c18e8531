//! Route configuration and setup

use crate::handlers;
use crate::middleware::{security_headers_middleware, SecurityHeadersConfig};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use scrubber_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the application router
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let security_headers_config =
        Arc::new(SecurityHeadersConfig::from_map_config(&config.map));

    // The page carries the content security policy; JSON and image responses do not render
    let page_routes = Router::new()
        .route("/", get(handlers::page::index))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ));

    let body_limit = config.intake.max_file_size_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .merge(page_routes)
        .merge(asset_routes())
        .merge(api_routes())
        .route("/health", get(handlers::health::liveness_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn asset_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets/app.js", get(handlers::assets::app_js))
        .route("/assets/app.css", get(handlers::assets::app_css))
        .route("/preview/{handle}", get(handlers::preview::get_preview))
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/image", post(handlers::intake::upload_image))
        .route("/api/session", get(handlers::session::get_session))
        .route("/api/session/metadata", get(handlers::session::get_metadata))
        .route(
            "/api/map",
            post(handlers::map::show_map).delete(handlers::map::close_map),
        )
        .route("/api/export", get(handlers::export::export_image))
        .route("/api/reset", post(handlers::reset::reset_session))
        .route(
            "/api/theme",
            get(handlers::theme::get_theme).put(handlers::theme::update_theme),
        )
}
