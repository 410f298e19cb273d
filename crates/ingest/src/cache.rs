use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Extracted document text keyed by a hash of the file contents.
///
/// Decoding PDFs dominates evaluation time, and the corpus rarely changes
/// between requests, so the text is reused until the file bytes change.
pub struct ExtractionCache {
    texts: DashMap<String, String>,
    max_entries: usize,
    hits: AtomicUsize,
}

impl ExtractionCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            texts: DashMap::new(),
            max_entries,
            hits: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, bytes: &[u8], text: String) {
        if self.max_entries == 0 {
            return;
        }
        if self.texts.len() >= self.max_entries {
            // Simple eviction: clear 25% when full
            let to_remove: Vec<_> = self.texts.iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.texts.remove(&key);
            }
        }
        self.texts.insert(Self::content_key(bytes), text);
    }

    pub fn get(&self, bytes: &[u8]) -> Option<String> {
        let text = self.texts
            .get(&Self::content_key(bytes))
            .map(|r| r.value().clone());
        if text.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        text
    }

    fn content_key(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hex::encode(hasher.finalize())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            documents_cached: self.texts.len(),
            hits: self.hits.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct CacheStats {
    pub documents_cached: usize,
    pub hits: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_bytes_hit() {
        let cache = ExtractionCache::new(8);
        cache.insert(b"%PDF-1.7 ...", "rust developer".to_string());

        assert_eq!(cache.get(b"%PDF-1.7 ...").as_deref(), Some("rust developer"));
        assert_eq!(cache.get(b"%PDF-1.7 changed"), None);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_eviction_keeps_size_bounded() {
        let cache = ExtractionCache::new(4);
        for i in 0..10 {
            cache.insert(format!("file-{i}").as_bytes(), format!("text {i}"));
        }

        assert!(cache.stats().documents_cached <= 4);
        // The most recent insert always survives
        assert_eq!(cache.get(b"file-9").as_deref(), Some("text 9"));
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = ExtractionCache::new(0);
        cache.insert(b"bytes", "text".to_string());
        assert_eq!(cache.stats().documents_cached, 0);
    }
}
