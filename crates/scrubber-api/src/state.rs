//! Application state shared by all handlers.

use scrubber_core::Config;
use scrubber_services::{ScrubSession, ThemeStore};
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    /// The one process-wide scrub session
    pub session: ScrubSession,
    pub theme: ThemeStore,
}

impl AppState {
    pub async fn new(config: Config) -> Arc<Self> {
        let session = ScrubSession::from_config(&config);
        let theme = ThemeStore::open(config.theme_store_path.clone()).await;
        Arc::new(Self {
            config,
            session,
            theme,
        })
    }
}
