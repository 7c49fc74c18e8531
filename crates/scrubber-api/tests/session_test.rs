//! Intake, extraction, preview, map, export and reset through the HTTP surface.
//!
//! Run with: `cargo test -p scrubber-api --test session_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::{file_form, setup_test_app, setup_test_app_with, test_config};
use scrubber_processing::test_helpers::fixtures;
use scrubber_processing::KamadakExifExtractor;
use serde_json::Value;
use tempfile::TempDir;

#[tokio::test]
async fn test_intake_accepts_jpeg_and_settles_with_metadata() {
    let app = setup_test_app().await;

    let response = app
        .upload(fixtures::jpeg_with_exif(16, 12), "photo.jpg", "image/jpeg")
        .await;
    assert_eq!(response.status_code(), 202);
    let accepted: Value = response.json();
    assert_eq!(accepted["image"]["name"], "photo.jpg");
    assert_eq!(accepted["image"]["mime"], "image/jpeg");

    let session = app.wait_for_settled().await;
    let metadata = &session["metadata"];
    assert_eq!(metadata["kind"], "table");

    let rows = metadata["rows"].as_array().unwrap();
    assert!(rows
        .iter()
        .any(|row| row["key"] == "Make" && row["value"] == fixtures::CAMERA_MAKE));

    let location = &metadata["location"];
    assert!((location["latitude"].as_f64().unwrap() - fixtures::LATITUDE).abs() < 1e-4);
    assert!(location["external_url"]
        .as_str()
        .unwrap()
        .starts_with("https://maps.google.com/?q="));
    assert_eq!(location["map_available"], true);

    // Map is never created on its own
    assert_eq!(session["map"]["state"], "idle");
}

#[tokio::test]
async fn test_intake_plain_image_reports_no_metadata() {
    let app = setup_test_app().await;

    let response = app
        .upload(fixtures::plain_png(8, 8), "plain.png", "image/png")
        .await;
    assert_eq!(response.status_code(), 202);

    let session = app.wait_for_settled().await;
    assert_eq!(session["metadata"]["kind"], "empty");
    assert_eq!(
        session["metadata"]["message"],
        "No EXIF metadata found in this image."
    );
}

#[tokio::test]
async fn test_intake_corrupt_metadata_reports_error() {
    let app = setup_test_app().await;

    app.upload(fixtures::corrupt_jpeg(), "broken.jpg", "image/jpeg")
        .await;

    let session = app.wait_for_settled().await;
    assert_eq!(session["metadata"]["kind"], "error");
    assert!(session["metadata"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Could not read metadata"));
    // The image is still selected; another file can be dropped
    assert_eq!(session["image"]["name"], "broken.jpg");
}

#[tokio::test]
async fn test_intake_rejects_unsupported_type_without_state_change() {
    let app = setup_test_app().await;

    app.upload(fixtures::plain_jpeg(8, 8), "first.jpg", "image/jpeg")
        .await;
    app.wait_for_settled().await;

    let response = app
        .upload(b"just text".to_vec(), "notes.txt", "text/plain")
        .await;
    assert_eq!(response.status_code(), 415);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");

    let session: Value = app.client().get("/api/session").await.json();
    assert_eq!(session["image"]["name"], "first.jpg");
}

#[tokio::test]
async fn test_rejected_file_keeps_live_map() {
    let app = setup_test_app().await;

    app.upload(fixtures::jpeg_with_exif(8, 8), "gps.jpg", "image/jpeg")
        .await;
    app.wait_for_settled().await;
    let shown: Value = app.client().post("/api/map").await.json();
    assert_eq!(shown["state"], "ready");

    let response = app
        .upload(b"just text".to_vec(), "notes.txt", "text/plain")
        .await;
    assert_eq!(response.status_code(), 415);

    let session: Value = app.client().get("/api/session").await.json();
    assert_eq!(session["image"]["name"], "gps.jpg");
    assert_eq!(session["metadata"]["kind"], "table");
    assert_eq!(session["map"]["state"], "ready");
    assert_eq!(session["map"]["instance"]["id"], shown["instance"]["id"]);
    assert_eq!(app.state.session.map_viewer().instances_created(), 1);
}

#[tokio::test]
async fn test_intake_rejects_oversized_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.intake.max_file_size_bytes = 512;
    let app = setup_test_app_with(config, temp_dir).await;

    let response = app
        .upload(fixtures::jpeg_with_exif(128, 128), "big.jpg", "image/jpeg")
        .await;
    assert_eq!(response.status_code(), 413);

    let session: Value = app.client().get("/api/session").await.json();
    assert!(session["image"].is_null());
}

#[tokio::test]
async fn test_intake_requires_exactly_one_file() {
    let app = setup_test_app().await;

    let empty = MultipartForm::new().add_text("note", "no file here");
    let response = app.client().post("/api/image").multipart(empty).await;
    assert_eq!(response.status_code(), 400);

    let form = file_form(fixtures::plain_jpeg(4, 4), "a.jpg", "image/jpeg").add_part(
        "file",
        axum_test::multipart::Part::bytes(fixtures::plain_jpeg(4, 4))
            .file_name("b.jpg")
            .mime_type("image/jpeg"),
    );
    let response = app.client().post("/api/image").multipart(form).await;
    assert_eq!(response.status_code(), 400);

    let session: Value = app.client().get("/api/session").await.json();
    assert!(session["image"].is_null());
}

#[tokio::test]
async fn test_new_file_supersedes_previous() {
    let app = setup_test_app().await;

    let first: Value = app
        .upload(fixtures::jpeg_with_exif(8, 8), "first.jpg", "image/jpeg")
        .await
        .json();
    let first_preview = first["image"]["preview_url"].as_str().unwrap().to_string();

    app.upload(fixtures::plain_png(8, 8), "second.png", "image/png")
        .await;
    let session = app.wait_for_settled().await;

    // The outcome belongs to the second file, never the first
    assert_eq!(session["image"]["name"], "second.png");
    assert_eq!(session["metadata"]["kind"], "empty");

    assert_eq!(app.client().get(&first_preview).await.status_code(), 404);
    assert_eq!(app.state.session.live_preview_count().await, 1);
}

#[tokio::test]
async fn test_preview_serves_original_bytes() {
    let app = setup_test_app().await;
    let data = fixtures::plain_png(6, 6);

    let accepted: Value = app
        .upload(data.clone(), "preview.png", "image/png")
        .await
        .json();
    let url = accepted["image"]["preview_url"].as_str().unwrap();

    let response = app.client().get(url).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(response.as_bytes().as_ref(), data.as_slice());

    let bogus = app.client().get("/preview/not-a-handle").await;
    assert_eq!(bogus.status_code(), 404);
}

#[tokio::test]
async fn test_export_strips_metadata() {
    let app = setup_test_app().await;

    app.upload(fixtures::jpeg_with_exif(20, 10), "holiday photo.jpg", "image/jpeg")
        .await;
    app.wait_for_settled().await;

    let response = app.client().get("/api/export").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "image/jpeg");

    let disposition = response.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"scrubbed_holiday photo.jpg\""));

    let exported = response.as_bytes().to_vec();
    assert!(KamadakExifExtractor::extract_blocking(&exported)
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_export_without_image_is_conflict() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/export").await;
    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["code"], "NO_ACTIVE_IMAGE");
}

#[tokio::test]
async fn test_show_map_is_idempotent() {
    let app = setup_test_app().await;

    app.upload(fixtures::jpeg_with_exif(8, 8), "gps.jpg", "image/jpeg")
        .await;
    app.wait_for_settled().await;

    let first: Value = app.client().post("/api/map").await.json();
    assert_eq!(first["state"], "ready");
    let instance = &first["instance"];
    assert_eq!(instance["zoom"], 13);
    assert!(instance["assets"]["script_url"]
        .as_str()
        .unwrap()
        .ends_with("/leaflet.js"));

    let second: Value = app.client().post("/api/map").await.json();
    assert_eq!(second["instance"]["id"], instance["id"]);
    assert_eq!(app.state.session.map_viewer().instances_created(), 1);

    let closed: Value = app.client().delete("/api/map").await.json();
    assert_eq!(closed["state"], "idle");
}

#[tokio::test]
async fn test_show_map_without_coordinates_is_noop() {
    let app = setup_test_app().await;

    app.upload(fixtures::jpeg_with_camera_only(8, 8), "nogps.jpg", "image/jpeg")
        .await;
    app.wait_for_settled().await;

    let state: Value = app.client().post("/api/map").await.json();
    assert_eq!(state["state"], "idle");
    assert_eq!(app.state.session.map_viewer().instances_created(), 0);
}

#[tokio::test]
async fn test_reset_returns_to_idle() {
    let app = setup_test_app().await;

    let accepted: Value = app
        .upload(fixtures::jpeg_with_exif(8, 8), "gps.jpg", "image/jpeg")
        .await
        .json();
    let preview = accepted["image"]["preview_url"].as_str().unwrap().to_string();
    app.wait_for_settled().await;
    app.client().post("/api/map").await;

    let reset: Value = app.client().post("/api/reset").await.json();
    assert!(reset["image"].is_null());
    assert!(reset["metadata"].is_null());
    assert_eq!(reset["map"]["state"], "idle");

    assert_eq!(app.client().get(&preview).await.status_code(), 404);
    assert_eq!(
        app.client().get("/api/session/metadata").await.status_code(),
        409
    );
    assert_eq!(app.state.session.live_preview_count().await, 0);
}
