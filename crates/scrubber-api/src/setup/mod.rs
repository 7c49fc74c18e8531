//! Application setup and initialization
//!
//! Kept out of main.rs so integration tests can build the same router.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use scrubber_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.server.log_json)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.server.environment,
        theme_store = %config.theme_store_path.display(),
        "Configuration loaded and validated successfully"
    );

    let state = AppState::new(config.clone()).await;
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
