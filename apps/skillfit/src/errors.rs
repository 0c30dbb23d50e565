use serde_json::{json, Value};
use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Core error type.
///
/// Empty text, no skills, and no projects are valid states and never surface here.
/// `EmbeddingUnavailable` is absorbed by degraded-mode deduplication inside the
/// pipeline; everything else aborts `evaluate`.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(#[from] EmbeddingError),

    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    #[error("Contract violation: {0}")]
    Contract(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl MatchError {
    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::InvalidInput(_) => "INVALID_INPUT",
            MatchError::EmbeddingUnavailable(_) => "EMBEDDING_UNAVAILABLE",
            MatchError::Taxonomy(_) => "TAXONOMY_ERROR",
            MatchError::Contract(_) => "CONTRACT_VIOLATION",
            MatchError::Io(_) => "IO_ERROR",
            MatchError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// JSON error body handed to whatever surface renders failures.
    pub fn to_body(&self) -> Value {
        let message = match self {
            MatchError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        })
    }
}
