use std::time::Duration;
use thiserror::Error;

/// A request that is rejected before any document is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("both 'top_k' and 'skillset' are required")]
    MissingField,

    #[error("number of top resumes must be a positive integer, got {0:?}")]
    InvalidTopK(String),
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Corpus(anyhow::Error),

    #[error("failed to read {filename}")]
    Retrieve {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("evaluation did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}
