use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str =
    "exif_scrubber=debug,scrubber_api=debug,scrubber_services=debug,tower_http=debug";

/// Initialize tracing: `RUST_LOG` filter, compact or JSON output
pub fn init_telemetry(json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer().compact()))
        .try_init()?;

    tracing::debug!(json, "Tracing initialized");
    Ok(())
}
