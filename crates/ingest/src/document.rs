use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A file in the corpus that has not been read yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub filename: String,
    pub path: PathBuf,
}

impl DocumentHandle {
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
        }
    }

    /// Lower-cased extension, empty when the file has none.
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }
}

/// Extracted text of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub filename: String,
    pub text: String,
    /// Where the original file lives; passed through to results untouched.
    pub file_path: String,
}

impl Document {
    pub fn new(filename: impl Into<String>, text: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
            file_path: file_path.into(),
        }
    }

    pub fn from_handle(handle: &DocumentHandle, text: String) -> Self {
        Self {
            filename: handle.filename.clone(),
            text,
            file_path: handle.path.to_string_lossy().to_string(),
        }
    }
}

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
