//! Theme read and persistence.
//!
//! Run with: `cargo test -p scrubber-api --test theme_test`

mod helpers;

use helpers::{setup_test_app, setup_test_app_with};
use serde_json::{json, Value};

#[tokio::test]
async fn test_theme_defaults_to_system() {
    let app = setup_test_app().await;

    let body: Value = app.client().get("/api/theme").await.json();
    assert_eq!(body["preference"], "system");
    assert!(body["resolved"].is_null());

    let body: Value = app
        .client()
        .get("/api/theme")
        .add_header("Sec-CH-Prefers-Color-Scheme", "light")
        .await
        .json();
    assert_eq!(body["resolved"], "light");
}

#[tokio::test]
async fn test_theme_persists_across_restart() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .put("/api/theme")
        .json(&json!({ "theme": "dark" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["preference"], "dark");
    assert_eq!(body["resolved"], "dark");

    // Stored preference wins over the platform hint
    let html = app
        .client()
        .get("/")
        .add_header("Sec-CH-Prefers-Color-Scheme", "light")
        .await
        .text();
    assert!(html.contains("data-theme=\"dark\""));

    let helpers::TestApp {
        config, temp_dir, ..
    } = app;
    let restarted = setup_test_app_with(config, temp_dir).await;
    let body: Value = restarted.client().get("/api/theme").await.json();
    assert_eq!(body["preference"], "dark");
}

#[tokio::test]
async fn test_theme_rejects_unknown_value() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .put("/api/theme")
        .json(&json!({ "theme": "sepia" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");

    let body: Value = app.client().get("/api/theme").await.json();
    assert_eq!(body["preference"], "system");
}
