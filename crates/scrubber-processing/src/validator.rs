use scrubber_core::config::IntakeConfig;
use scrubber_core::ImageMime;

/// Reasons a file is refused at intake
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,
}

/// Intake validator
///
/// Checks the declared type and size of a dropped file before anything about the
/// current session changes.
#[derive(Debug, Clone)]
pub struct IntakeValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl IntakeValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ImageMime::from_content_type(&ct).as_str().to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &IntakeConfig) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.allowed_content_types.clone(),
        )
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate the declared content type against the allowlist.
    ///
    /// Aliases such as `image/jpg` normalize to their canonical type first.
    pub fn validate_content_type(&self, content_type: &str) -> Result<ImageMime, ValidationError> {
        let mime = ImageMime::from_content_type(content_type);

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == mime.as_str())
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(mime)
    }

    /// Validate type then size; the type check runs first so a wrong file is reported as such
    /// even when it is also empty or oversized.
    pub fn validate_all(
        &self,
        content_type: &str,
        file_size: usize,
    ) -> Result<ImageMime, ValidationError> {
        let mime = self.validate_content_type(content_type)?;
        self.validate_file_size(file_size)?;
        Ok(mime)
    }
}
