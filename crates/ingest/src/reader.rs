use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::cache::ExtractionCache;
use crate::document::{extension_of, Document, DocumentHandle};
use crate::error::ExtractError;

/// Turns the raw bytes of a file into plain text.
pub trait TextExtractor: Send + Sync {
    /// Whether `path` looks like something this extractor can decode.
    fn supports(&self, path: &Path) -> bool;

    fn extract(&self, path: &Path, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Default extractor: PDF, DOCX and plain text files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileReader;

impl FileReader {
    pub const EXTENSIONS: [&'static str; 4] = ["pdf", "docx", "txt", "md"];

    fn read_pdf(path: &Path, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::decode(path, e))
    }

    fn read_docx(path: &Path, bytes: &[u8]) -> Result<String, ExtractError> {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::decode(path, e))?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| ExtractError::decode(path, e))?
            .read_to_string(&mut xml)
            .map_err(|e| ExtractError::decode(path, e))?;

        docx_body_text(&xml).map_err(|e| ExtractError::decode(path, e))
    }

    fn read_plain(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

impl TextExtractor for FileReader {
    fn supports(&self, path: &Path) -> bool {
        let extension = extension_of(path);
        Self::EXTENSIONS.iter().any(|e| *e == extension)
    }

    fn extract(&self, path: &Path, bytes: &[u8]) -> Result<String, ExtractError> {
        match extension_of(path).as_str() {
            "pdf" => Self::read_pdf(path, bytes),
            "docx" => Self::read_docx(path, bytes),
            "txt" | "md" => Ok(Self::read_plain(bytes)),
            _ => Err(ExtractError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Collect the run text of a WordprocessingML body, one line per paragraph.
fn docx_body_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Reads corpus files and extracts their text off the async runtime.
#[derive(Clone)]
pub struct DocumentLoader {
    extractor: Arc<dyn TextExtractor>,
    cache: Option<Arc<ExtractionCache>>,
    timeout: Duration,
}

impl DocumentLoader {
    pub fn new(extractor: Arc<dyn TextExtractor>, timeout: Duration) -> Self {
        Self {
            extractor,
            cache: None,
            timeout,
        }
    }

    pub fn with_cache(mut self, cache: Arc<ExtractionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&Arc<ExtractionCache>> {
        self.cache.as_ref()
    }

    pub async fn load(&self, handle: &DocumentHandle) -> Result<Document, ExtractError> {
        if !self.extractor.supports(&handle.path) {
            return Err(ExtractError::UnsupportedFormat {
                path: handle.path.clone(),
            });
        }

        let bytes = fs::read(&handle.path).await.map_err(|source| ExtractError::Read {
            path: handle.path.clone(),
            source,
        })?;

        if let Some(text) = self.cache.as_ref().and_then(|c| c.get(&bytes)) {
            debug!(filename = %handle.filename, "Extracted text served from cache");
            return Ok(Document::from_handle(handle, text));
        }

        let text = self.extract_blocking(handle, bytes).await?;
        Ok(Document::from_handle(handle, text))
    }

    async fn extract_blocking(
        &self,
        handle: &DocumentHandle,
        bytes: Vec<u8>,
    ) -> Result<String, ExtractError> {
        let extractor = Arc::clone(&self.extractor);
        let cache = self.cache.clone();
        let path = handle.path.clone();

        // Decoders can panic on malformed input; a JoinError is just another corrupt file.
        let task = tokio::task::spawn_blocking(move || {
            let text = extractor.extract(&path, &bytes)?;
            if let Some(cache) = cache {
                cache.insert(&bytes, text.clone());
            }
            Ok::<_, ExtractError>(text)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ExtractError::decode(&handle.path, join_error)),
            Err(_) => Err(ExtractError::Timeout {
                path: handle.path.clone(),
                timeout: self.timeout,
            }),
        }
    }
}
