//! Errors surfaced to callers of the content pipeline
//!
//! Cache failures never appear here; the stores absorb them.

use oqu_cache::ContentKind;
use thiserror::Error;

use crate::generator::GenerateError;

#[derive(Error, Debug)]
pub enum ContentError {
    /// Topic id is not in the catalog
    #[error("Topic {0} not found")]
    NotFound(String),

    /// No credential produced any text
    #[error("AI generation failed: {0}")]
    GenerationUpstream(#[from] GenerateError),

    /// Text came back but is not the expected JSON
    #[error("AI returned invalid format: {0}")]
    GenerationFormat(String),

    /// JSON parsed but lacks the required minimum content
    #[error("AI generated incomplete {kind}: {reason}")]
    IncompleteContent { kind: ContentKind, reason: String },

    /// Background generation task panicked or was cancelled by the runtime
    #[error("Generation task aborted: {0}")]
    TaskAborted(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ContentError {
    pub(crate) fn incomplete(kind: ContentKind, reason: impl Into<String>) -> Self {
        ContentError::IncompleteContent {
            kind,
            reason: reason.into(),
        }
    }

    /// Whether asking the learner to try again can help
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ContentError::GenerationUpstream(_)
                | ContentError::GenerationFormat(_)
                | ContentError::IncompleteContent { .. }
                | ContentError::TaskAborted(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
