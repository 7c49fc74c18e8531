use axum::http::HeaderValue;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use scrubber_core::config::MapConfig;
use std::sync::Arc;

/// Security headers configuration
///
/// The allowlist holds exactly the hosts the map needs: the tile hosts and the origin
/// serving the library script, stylesheet and marker icons.
#[derive(Clone, Debug)]
pub struct SecurityHeadersConfig {
    pub tile_hosts: Vec<String>,
    pub asset_origin: Option<String>,
}

impl SecurityHeadersConfig {
    pub fn new(tile_hosts: Vec<String>, asset_origin: Option<String>) -> Self {
        Self {
            tile_hosts,
            asset_origin,
        }
    }

    pub fn from_map_config(map: &MapConfig) -> Self {
        Self::new(
            tile_hosts(&map.tile_url_template, &map.tile_subdomains),
            origin_of(&map.asset_base_url),
        )
    }

    /// Build Content-Security-Policy header value
    pub fn build_csp(&self) -> String {
        let asset = self.asset_origin.as_deref().unwrap_or_default();

        let mut img_src = vec!["'self'", "blob:", "data:"];
        img_src.extend(self.tile_hosts.iter().map(String::as_str));
        img_src.push(asset);

        let csp_parts = [
            "default-src 'self'".to_string(),
            directive("img-src", &img_src),
            directive("script-src", &["'self'", asset]),
            "connect-src 'self'".to_string(),
            directive("style-src", &["'self'", "'unsafe-inline'", asset]),
            "font-src 'self' data:".to_string(),
        ];

        csp_parts.join("; ")
    }
}

fn directive(name: &str, sources: &[&str]) -> String {
    let mut out = name.to_string();
    for source in sources.iter().filter(|s| !s.is_empty()) {
        out.push(' ');
        out.push_str(source);
    }
    out
}

/// Hosts a tile template can resolve to, one per `{s}` subdomain.
fn tile_hosts(template: &str, subdomains: &[String]) -> Vec<String> {
    let Some(origin) = origin_of(template) else {
        return Vec::new();
    };
    if origin.contains("{s}") {
        subdomains
            .iter()
            .map(|sub| origin.replace("{s}", sub))
            .collect()
    } else {
        vec![origin]
    }
}

/// `scheme://host[:port]` of a URL, or `None` when it has no scheme.
fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return None;
    }
    Some(format!("{}://{}", scheme, host))
}

/// Attaches the content security policy to the page response.
/// Mounted on the root route only.
pub async fn security_headers_middleware(
    State(config): State<Arc<SecurityHeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    // Outbound map links must not leak the page URL
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));

    let csp = config.build_csp();
    match HeaderValue::from_str(&csp) {
        Ok(header_value) => {
            headers.insert("Content-Security-Policy", header_value);
        }
        Err(e) => {
            tracing::error!(error = %e, csp = %csp, "Invalid Content-Security-Policy value");
        }
    }

    response
}
