use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

use crate::document::DocumentHandle;

/// A read-only directory of candidate documents.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
}

impl Corpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Regular files directly under the corpus root, ordered by file name.
    ///
    /// This order is the tie-break for documents with equal scores.
    pub fn list(&self) -> Result<Vec<DocumentHandle>> {
        let mut handles = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.context(format!("Failed to list corpus: {:?}", self.root))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().to_string();
            handles.push(DocumentHandle::new(filename, entry.into_path()));
        }

        Ok(handles)
    }

    /// Path of `filename` inside the corpus, if the name is a plain file name.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.root.join(filename)),
            _ => None,
        }
    }

    /// Raw bytes of a corpus file; `None` when no such file exists.
    pub async fn open(&self, filename: &str) -> std::io::Result<Option<Vec<u8>>> {
        let Some(path) = self.resolve(filename) else {
            return Ok(None);
        };

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => fs::read(&path).await.map(Some),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_sorted_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"").unwrap();
        std::fs::write(dir.path().join("a.docx"), b"").unwrap();
        std::fs::create_dir(dir.path().join("archive")).unwrap();
        std::fs::write(dir.path().join("archive").join("old.pdf"), b"").unwrap();

        let names: Vec<_> = Corpus::new(dir.path())
            .list()
            .unwrap()
            .into_iter()
            .map(|h| h.filename)
            .collect();

        assert_eq!(names, vec!["a.docx", "b.pdf"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Corpus::new(dir.path().join("nope")).list().is_err());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let corpus = Corpus::new("resume");
        assert!(corpus.resolve("cv.pdf").is_some());
        assert!(corpus.resolve("../secret.txt").is_none());
        assert!(corpus.resolve("nested/cv.pdf").is_none());
        assert!(corpus.resolve("/etc/passwd").is_none());
        assert!(corpus.resolve("").is_none());
    }

    #[tokio::test]
    async fn test_open_existing_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cv.pdf"), b"%PDF").unwrap();
        let corpus = Corpus::new(dir.path());

        assert_eq!(corpus.open("cv.pdf").await.unwrap(), Some(b"%PDF".to_vec()));
        assert_eq!(corpus.open("other.pdf").await.unwrap(), None);
        assert_eq!(corpus.open("..").await.unwrap(), None);
    }
}
