use super::metadata::Metadata;
use serde::Serialize;

/// Result of running the extractor over the selected image.
///
/// `Empty` ("the file carries no metadata") and `Failed` ("the file could not be read")
/// are distinct terminal states and are never conflated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Pending,
    Success { metadata: Metadata },
    Empty,
    Failed { reason: String },
}

impl ExtractionOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExtractionOutcome::Pending)
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            ExtractionOutcome::Pending => "pending",
            ExtractionOutcome::Success { .. } => "success",
            ExtractionOutcome::Empty => "empty",
            ExtractionOutcome::Failed { .. } => "failed",
        }
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            ExtractionOutcome::Success { metadata } => Some(metadata),
            _ => None,
        }
    }
}
