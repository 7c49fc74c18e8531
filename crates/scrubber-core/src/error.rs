//! Error types module
//!
//! All failures that can reach the HTTP boundary are unified under [`AppError`].
//! Each variant self-describes its response characteristics through [`ErrorMetadata`]
//! so the API layer renders and logs them consistently.
//!
//! Note that a failed metadata extraction is *not* an `AppError`: it is a valid
//! terminal extraction outcome that the session records and the page displays.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like rejected files
    Debug,
    /// Warning level - for recoverable issues like an unavailable map provider
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UNSUPPORTED_MEDIA_TYPE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No active image: {0}")]
    NoActiveImage(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Map unavailable: {0}")]
    MapUnavailable(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check the request and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedMediaType(_) => (
            415,
            "UNSUPPORTED_MEDIA_TYPE",
            false,
            Some("Select a JPEG or PNG image"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Select a smaller image"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Select the image again"),
            false,
            LogLevel::Debug,
        ),
        AppError::NoActiveImage(_) => (
            409,
            "NO_ACTIVE_IMAGE",
            false,
            Some("Select an image first"),
            false,
            LogLevel::Debug,
        ),
        AppError::ImageProcessing(_) => (
            422,
            "IMAGE_PROCESSING_ERROR",
            false,
            Some("Check image format and try a different file"),
            false,
            LogLevel::Warn,
        ),
        AppError::MapUnavailable(_) => (
            503,
            "MAP_UNAVAILABLE",
            true,
            Some("Retry showing the map in a moment"),
            false,
            LogLevel::Warn,
        ),
        AppError::Settings(_) => (
            500,
            "SETTINGS_ERROR",
            true,
            Some("Check that the settings directory is writable"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Variant name, used as a structured logging field
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::NotFound(_) => "NotFound",
            AppError::NoActiveImage(_) => "NoActiveImage",
            AppError::ImageProcessing(_) => "ImageProcessing",
            AppError::MapUnavailable(_) => "MapUnavailable",
            AppError::Settings(_) => "Settings",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::UnsupportedMediaType(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::NoActiveImage(ref msg) => msg.clone(),
            AppError::ImageProcessing(ref msg) => msg.clone(),
            AppError::MapUnavailable(_) => "The map could not be loaded".to_string(),
            AppError::Settings(_) => "Failed to save settings".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
