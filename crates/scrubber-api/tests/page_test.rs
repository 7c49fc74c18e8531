//! Page, asset and health endpoints.
//!
//! Run with: `cargo test -p scrubber-api --test page_test`

mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;
    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_page_carries_content_security_policy() {
    let app = setup_test_app().await;
    let response = app.client().get("/").await;

    assert_eq!(response.status_code(), 200);
    let csp = response.header("content-security-policy");
    let csp = csp.to_str().unwrap();
    assert!(csp.starts_with("default-src 'self'"));
    assert!(csp.contains("https://a.tile.openstreetmap.org"));
    assert!(csp.contains("https://unpkg.com"));
    assert_eq!(response.header("x-content-type-options"), "nosniff");
}

#[tokio::test]
async fn test_content_security_policy_only_on_page() {
    let app = setup_test_app().await;

    for path in ["/api/session", "/assets/app.js", "/health"] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), 200, "{}", path);
        assert!(
            response.headers().get("content-security-policy").is_none(),
            "{} should not carry a CSP",
            path
        );
    }
}

#[tokio::test]
async fn test_page_renders_placeholder_until_theme_known() {
    let app = setup_test_app().await;

    let html = app.client().get("/").await.text();
    assert!(html.contains("<html lang=\"en\" data-theme-pending>"));
    assert!(html.contains("<title>EXIF Scrubber</title>"));

    let html = app
        .client()
        .get("/")
        .add_header("Sec-CH-Prefers-Color-Scheme", "dark")
        .await
        .text();
    assert!(html.contains("<html lang=\"en\" data-theme=\"dark\">"));
}

#[tokio::test]
async fn test_assets_are_served() {
    let app = setup_test_app().await;

    let js = app.client().get("/assets/app.js").await;
    assert_eq!(js.status_code(), 200);
    assert!(js
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/javascript"));
    // Unsupported files are turned away before the page drops its current map
    let script = js.text();
    let upload = &script[script.find("async function upload").unwrap()..];
    let upload = &upload[..upload.find("\n}\n").unwrap()];
    assert!(upload.contains("ACCEPTED_TYPES.includes(file.type)"));
    assert!(!upload.contains("teardownMap()"));

    let css = app.client().get("/assets/app.css").await;
    assert_eq!(css.status_code(), 200);
    assert!(css.text().contains("data-theme"));
}
