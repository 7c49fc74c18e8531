//! Test helpers: build the real router over an isolated settings directory.
//!
//! Run from workspace root: `cargo test -p scrubber-api`.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use scrubber_api::setup::routes;
use scrubber_api::state::AppState;
use scrubber_core::Config;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Test application: server, shared state and the owned settings directory.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub config: Config,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Upload one file under the `file` field.
    pub async fn upload(&self, data: Vec<u8>, name: &str, mime: &str) -> axum_test::TestResponse {
        self.server.post("/api/image").multipart(file_form(data, name, mime)).await
    }

    /// Poll the session until extraction leaves the loading state.
    pub async fn wait_for_settled(&self) -> Value {
        for _ in 0..200 {
            let session: Value = self.server.get("/api/session").await.json();
            if session["metadata"]["kind"] != "loading" {
                return session;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("extraction did not settle");
    }
}

pub fn file_form(data: Vec<u8>, name: &str, mime: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(name.to_string())
        .mime_type(mime.to_string());
    MultipartForm::new().add_part("file", part)
}

pub fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.theme_store_path = temp_dir.path().join("theme.json");
    config.map.layout_delay_ms = 0;
    config
}

pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir);
    setup_test_app_with(config, temp_dir).await
}

pub async fn setup_test_app_with(config: Config, temp_dir: TempDir) -> TestApp {
    let state = AppState::new(config.clone()).await;
    let app = routes::setup_routes(&config, state.clone());
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        state,
        config,
        temp_dir,
    }
}
