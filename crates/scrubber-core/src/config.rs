//! Configuration module
//!
//! Settings are read from the environment (optionally seeded from a `.env` file) once at
//! startup. Defaults describe a loopback-only deployment using OpenStreetMap tiles and the
//! Leaflet assets published on unpkg.

use std::env;
use std::path::PathBuf;

const SERVER_HOST: &str = "127.0.0.1";
const SERVER_PORT: u16 = 3000;
const MAX_FILE_SIZE_MB: usize = 25;
const MAX_FILE_SIZE_LIMIT_MB: usize = 1024;
const SUPPORTED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];
const JPEG_EXPORT_QUALITY: u8 = 90;
const MAP_DEFAULT_ZOOM: u8 = 13;
const MAP_MAX_ZOOM: u8 = 19;
const MAP_LAYOUT_DELAY_MS: u64 = 100;
const MAP_RELAYOUT_DELAY_MS: u64 = 100;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAP_TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const MAP_TILE_SUBDOMAINS: &str = "a,b,c";
const MAP_ASSET_BASE_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist";
const EXTERNAL_MAP_URL: &str = "https://maps.google.com/";
const ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png";
const THEME_STORE_FILE: &str = "theme.json";
const APP_DIR_NAME: &str = "exif-scrubber";

/// Server and transport settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub request_timeout_secs: u64,
    /// Emit logs as JSON lines instead of compact text
    pub log_json: bool,
}

/// File intake and export settings
#[derive(Clone, Debug)]
pub struct IntakeConfig {
    pub max_file_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub jpeg_export_quality: u8,
}

/// Map provider settings (tile layer, library assets, outbound link)
#[derive(Clone, Debug)]
pub struct MapConfig {
    pub default_zoom: u8,
    pub layout_delay_ms: u64,
    pub relayout_delay_ms: u64,
    pub tile_url_template: String,
    pub tile_subdomains: Vec<String>,
    pub asset_base_url: String,
    pub external_map_url: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub intake: IntakeConfig,
    pub map: MapConfig,
    pub theme_store_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_file_size_mb = env_parse("MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB);

        let allowed_content_types = split_list(
            &env::var("ALLOWED_CONTENT_TYPES").unwrap_or_else(|_| ALLOWED_CONTENT_TYPES.to_string()),
        )
        .into_iter()
        .map(|s| s.to_lowercase())
        .collect();

        let theme_store_path = match env::var("THEME_STORE_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
            _ => default_theme_store_path(),
        };

        let config = Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| SERVER_HOST.to_string()),
                port: env_parse("PORT", SERVER_PORT),
                environment,
                request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS)
                    .max(1),
                log_json: env::var("LOG_FORMAT")
                    .map(|v| v.trim().eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
            intake: IntakeConfig {
                max_file_size_bytes: mb_to_bytes(max_file_size_mb),
                allowed_content_types,
                jpeg_export_quality: env_parse("JPEG_EXPORT_QUALITY", JPEG_EXPORT_QUALITY),
            },
            map: MapConfig {
                default_zoom: env_parse("MAP_DEFAULT_ZOOM", MAP_DEFAULT_ZOOM),
                layout_delay_ms: env_parse("MAP_LAYOUT_DELAY_MS", MAP_LAYOUT_DELAY_MS),
                relayout_delay_ms: env_parse("MAP_RELAYOUT_DELAY_MS", MAP_RELAYOUT_DELAY_MS),
                tile_url_template: env::var("MAP_TILE_URL_TEMPLATE")
                    .unwrap_or_else(|_| MAP_TILE_URL_TEMPLATE.to_string()),
                tile_subdomains: split_list(
                    &env::var("MAP_TILE_SUBDOMAINS")
                        .unwrap_or_else(|_| MAP_TILE_SUBDOMAINS.to_string()),
                ),
                asset_base_url: env::var("MAP_ASSET_BASE_URL")
                    .unwrap_or_else(|_| MAP_ASSET_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                external_map_url: env::var("EXTERNAL_MAP_URL")
                    .unwrap_or_else(|_| EXTERNAL_MAP_URL.to_string()),
            },
            theme_store_path,
        };

        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.intake.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        if self.intake.max_file_size_bytes > mb_to_bytes(MAX_FILE_SIZE_LIMIT_MB) {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB must not exceed {}",
                MAX_FILE_SIZE_LIMIT_MB
            ));
        }

        if self.intake.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must list at least one MIME type"
            ));
        }

        // Export can only re-encode what the image codecs are built for
        if let Some(unsupported) = self
            .intake
            .allowed_content_types
            .iter()
            .find(|t| !SUPPORTED_CONTENT_TYPES.contains(&t.as_str()))
        {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES may only contain {} (got {})",
                SUPPORTED_CONTENT_TYPES.join(", "),
                unsupported
            ));
        }

        if !(1..=100).contains(&self.intake.jpeg_export_quality) {
            return Err(anyhow::anyhow!(
                "JPEG_EXPORT_QUALITY must be between 1 and 100 (got {})",
                self.intake.jpeg_export_quality
            ));
        }

        if self.map.default_zoom > MAP_MAX_ZOOM {
            return Err(anyhow::anyhow!(
                "MAP_DEFAULT_ZOOM must be between 0 and {} (got {})",
                MAP_MAX_ZOOM,
                self.map.default_zoom
            ));
        }

        for (name, value) in [
            ("MAP_TILE_URL_TEMPLATE", &self.map.tile_url_template),
            ("MAP_ASSET_BASE_URL", &self.map.asset_base_url),
            ("EXTERNAL_MAP_URL", &self.map.external_map_url),
        ] {
            if !value.starts_with("https://") {
                return Err(anyhow::anyhow!("{} must be an https:// URL", name));
            }
        }

        if self.map.tile_url_template.contains("{s}") && self.map.tile_subdomains.is_empty() {
            return Err(anyhow::anyhow!(
                "MAP_TILE_SUBDOMAINS must be set when MAP_TILE_URL_TEMPLATE uses {{s}}"
            ));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: SERVER_HOST.to_string(),
                port: SERVER_PORT,
                environment: "development".to_string(),
                request_timeout_secs: REQUEST_TIMEOUT_SECS,
                log_json: false,
            },
            intake: IntakeConfig {
                max_file_size_bytes: mb_to_bytes(MAX_FILE_SIZE_MB),
                allowed_content_types: split_list(ALLOWED_CONTENT_TYPES),
                jpeg_export_quality: JPEG_EXPORT_QUALITY,
            },
            map: MapConfig {
                default_zoom: MAP_DEFAULT_ZOOM,
                layout_delay_ms: MAP_LAYOUT_DELAY_MS,
                relayout_delay_ms: MAP_RELAYOUT_DELAY_MS,
                tile_url_template: MAP_TILE_URL_TEMPLATE.to_string(),
                tile_subdomains: split_list(MAP_TILE_SUBDOMAINS),
                asset_base_url: MAP_ASSET_BASE_URL.to_string(),
                external_map_url: EXTERNAL_MAP_URL.to_string(),
            },
            theme_store_path: default_theme_store_path(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Saturates instead of wrapping; `validate` rejects anything past the limit.
fn mb_to_bytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn default_theme_store_path() -> PathBuf {
    let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push(APP_DIR_NAME);
    dir.push(THEME_STORE_FILE);
    dir
}
