use scrubber_core::AppError;
use scrubber_processing::{ExportError, ValidationError};

use crate::map::MapError;
use crate::theme::ThemeStoreError;

/// Failures of session operations, all contained at the operation that raised them.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("No image is selected")]
    NoActiveImage,

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Map(#[from] MapError),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Rejected(e) => rejection(e),
            SessionError::NoActiveImage => {
                AppError::NoActiveImage("Select an image before exporting".to_string())
            }
            SessionError::Export(ExportError::Decode(msg)) => AppError::ImageProcessing(format!(
                "The image could not be decoded for export: {}",
                msg
            )),
            SessionError::Export(e) => AppError::Internal(e.to_string()),
            SessionError::Map(e) => AppError::MapUnavailable(e.to_string()),
        }
    }
}

impl From<ThemeStoreError> for AppError {
    fn from(err: ThemeStoreError) -> Self {
        AppError::Settings(err.to_string())
    }
}

fn rejection(err: ValidationError) -> AppError {
    match err {
        ValidationError::InvalidContentType { content_type, .. } => {
            AppError::UnsupportedMediaType(format!(
                "Only JPEG and PNG images are accepted (got '{}')",
                content_type
            ))
        }
        ValidationError::FileTooLarge { size, max } => AppError::PayloadTooLarge(format!(
            "File is {} bytes; the limit is {} bytes",
            size, max
        )),
        ValidationError::EmptyFile => AppError::InvalidInput("The file is empty".to_string()),
    }
}
