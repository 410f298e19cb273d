use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a single document could not be turned into text.
///
/// Every variant is recoverable at the batch level: the document is skipped
/// and the rest of the corpus is still evaluated.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("extraction of {} timed out after {timeout:?}", .path.display())]
    Timeout { path: PathBuf, timeout: Duration },
}

impl ExtractError {
    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Unsupported files are expected in a corpus directory and are not worth a warning.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }
}
