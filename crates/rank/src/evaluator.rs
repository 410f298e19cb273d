use extract::{MetadataExtractor, PosTagger};
use ingest::{
    CacheStats, Corpus, Document, DocumentHandle, DocumentLoader, ExtractionCache, FileReader,
    TextExtractor,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::EvaluatorConfig;
use crate::error::EvaluationError;
use crate::metrics::{Metrics, TimedOperation};
use crate::ranker::rank;
use crate::schema::{MatchResult, RankedBatch};
use crate::scorer::{KeywordSet, Scorer};
use crate::service::{EvaluationRequest, EvaluationResponse, TopK, ValidatedRequest};

/// Score one already-extracted document.
pub fn evaluate_document(
    document: &Document,
    keywords: &KeywordSet,
    scorer: &Scorer,
    metadata: &MetadataExtractor,
) -> MatchResult {
    let score = scorer.score(keywords, &document.text);
    let contact = metadata.extract(&document.text);
    MatchResult::new(document, score, contact)
}

/// Score and rank a batch of already-extracted documents, in input order.
pub fn evaluate_documents(
    documents: &[Document],
    keywords: &KeywordSet,
    scorer: &Scorer,
    metadata: &MetadataExtractor,
    top_k: TopK,
) -> RankedBatch {
    let results = documents
        .iter()
        .map(|document| evaluate_document(document, keywords, scorer, metadata))
        .collect();
    rank(results, top_k)
}

/// Ranks the documents of a corpus directory against requested skills.
///
/// One evaluator can serve many requests; the corpus is only ever read.
pub struct Evaluator {
    corpus: Corpus,
    loader: DocumentLoader,
    metadata: MetadataExtractor,
    scorer: Scorer,
    permits: Arc<Semaphore>,
    metrics: Arc<Metrics>,
}

impl Evaluator {
    pub fn new(corpus: Corpus, config: EvaluatorConfig, tagger: Arc<dyn PosTagger>) -> Self {
        Self::with_extractor(corpus, config, tagger, Arc::new(FileReader))
    }

    pub fn with_extractor(
        corpus: Corpus,
        config: EvaluatorConfig,
        tagger: Arc<dyn PosTagger>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let mut loader = DocumentLoader::new(extractor, config.extraction_timeout);
        if let Some(entries) = config.cache_entries {
            loader = loader.with_cache(Arc::new(ExtractionCache::new(entries)));
        }

        Self {
            corpus,
            loader,
            metadata: MetadataExtractor::new(tagger),
            scorer: Scorer::new(config.policy, config.algorithm),
            permits: Arc::new(Semaphore::new(config.max_concurrent_extractions.max(1))),
            metrics: Metrics::new(),
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.loader.cache().map(|cache| cache.stats())
    }

    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, EvaluationError> {
        let request = request.validate()?;

        let request_id = Uuid::new_v4();
        let span = info_span!(
            "evaluate",
            %request_id,
            top_k = %request.top_k,
            keywords = request.keywords.len()
        );

        let timer = TimedOperation::start();
        let outcome = self.run(request).instrument(span).await;
        self.metrics.record_evaluation(outcome.is_ok(), timer.elapsed());
        outcome
    }

    /// [`Evaluator::evaluate`] bounded by an overall deadline.
    pub async fn evaluate_within(
        &self,
        request: &EvaluationRequest,
        deadline: Duration,
    ) -> Result<EvaluationResponse, EvaluationError> {
        match tokio::time::timeout(deadline, self.evaluate(request)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                // The dropped evaluation never got to record itself
                self.metrics.record_evaluation(false, deadline);
                warn!(?deadline, "Evaluation deadline exceeded");
                Err(EvaluationError::DeadlineExceeded(deadline))
            }
        }
    }

    /// Raw bytes of a corpus document.
    pub async fn retrieve(&self, filename: &str) -> Result<Vec<u8>, EvaluationError> {
        match self.corpus.open(filename).await {
            Ok(Some(bytes)) => Ok(bytes),
            Ok(None) => Err(EvaluationError::NotFound(filename.to_string())),
            Err(source) => Err(EvaluationError::Retrieve {
                filename: filename.to_string(),
                source,
            }),
        }
    }

    async fn run(&self, request: ValidatedRequest) -> Result<EvaluationResponse, EvaluationError> {
        let corpus = self.corpus.clone();
        let handles = tokio::task::spawn_blocking(move || corpus.list())
            .await
            .map_err(|e| EvaluationError::Corpus(e.into()))?
            .map_err(EvaluationError::Corpus)?;
        info!(documents = handles.len(), "Listed corpus");

        let results = self.score_handles(handles, &request.keywords).await;
        let scored = results.len();
        let top_resumes = rank(results, request.top_k);
        info!(scored, returned = top_resumes.len(), "Evaluation finished");

        Ok(EvaluationResponse {
            skillset: request.skillset,
            top_resumes,
        })
    }

    async fn score_handles(
        &self,
        handles: Vec<DocumentHandle>,
        keywords: &KeywordSet,
    ) -> Vec<MatchResult> {
        let keywords = Arc::new(keywords.clone());
        let mut tasks = JoinSet::new();

        for (index, handle) in handles.into_iter().enumerate() {
            let worker = DocumentWorker {
                loader: self.loader.clone(),
                metadata: self.metadata.clone(),
                scorer: self.scorer.clone(),
                keywords: Arc::clone(&keywords),
                metrics: Arc::clone(&self.metrics),
            };
            let permits = Arc::clone(&self.permits);

            tasks.spawn(
                async move {
                    let _permit = permits.acquire_owned().await.ok()?;
                    worker.process(handle).await.map(|result| (index, result))
                }
                .in_current_span(),
            );
        }

        let mut scored = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(entry)) => scored.push(entry),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Document task failed"),
            }
        }

        // Workers finish in any order; the ranker breaks ties by listing order
        scored.sort_by_key(|(index, _)| *index);
        scored.into_iter().map(|(_, result)| result).collect()
    }
}

/// Everything one document needs, owned so it can move into a task.
struct DocumentWorker {
    loader: DocumentLoader,
    metadata: MetadataExtractor,
    scorer: Scorer,
    keywords: Arc<KeywordSet>,
    metrics: Arc<Metrics>,
}

impl DocumentWorker {
    async fn process(self, handle: DocumentHandle) -> Option<MatchResult> {
        let timer = TimedOperation::start();
        let document = match self.loader.load(&handle).await {
            Ok(document) => document,
            Err(e) if e.is_unsupported() => {
                debug!(
                    filename = %handle.filename,
                    extension = %handle.extension(),
                    "Skipping unsupported file"
                );
                self.metrics.record_skipped();
                return None;
            }
            Err(e) => {
                warn!(filename = %handle.filename, error = %e, "Skipping unreadable document");
                self.metrics.record_skipped();
                return None;
            }
        };
        self.metrics.record_extract(timer.elapsed());

        let timer = TimedOperation::start();
        let (scorer, metadata, keywords) = (self.scorer, self.metadata, self.keywords);
        let scored = tokio::task::spawn_blocking(move || {
            evaluate_document(&document, &keywords, &scorer, &metadata)
        })
        .await;

        match scored {
            Ok(result) => {
                self.metrics.record_scored(timer.elapsed());
                debug!(
                    filename = %result.filename,
                    percentage = result.matching_percentage,
                    "Scored document"
                );
                Some(result)
            }
            Err(e) => {
                warn!(filename = %handle.filename, error = %e, "Scoring failed");
                self.metrics.record_skipped();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::CapitalizationTagger;

    fn metadata() -> MetadataExtractor {
        MetadataExtractor::new(Arc::new(CapitalizationTagger))
    }

    #[test]
    fn test_evaluate_document_fields() {
        let document = Document::new(
            "jane.txt",
            "Jane Doe\njane.doe@example.com | 555-123-4567\nRust, Python and Kubernetes",
            "resume/jane.txt",
        );
        let keywords = KeywordSet::new(["rust", "python", "go"]);

        let result = evaluate_document(&document, &keywords, &Scorer::default(), &metadata());

        assert_eq!(result.filename, "jane.txt");
        assert_eq!(result.file_path, "resume/jane.txt");
        assert_eq!(result.emails, vec!["jane.doe@example.com"]);
        assert_eq!(result.phone.as_deref(), Some("555-123-4567"));
        assert_eq!(result.name.as_deref(), Some("Jane Doe"));
        assert!((result.matching_percentage - 200.0 / 3.0).abs() < 1e-9);
        assert!(result.non_matching_keywords.contains("go"));
    }

    #[test]
    fn test_evaluate_documents_ranks_batch() {
        let documents = vec![
            Document::new("a.txt", "python", "resume/a.txt"),
            Document::new("b.txt", "python sql", "resume/b.txt"),
            Document::new("c.txt", "sql", "resume/c.txt"),
        ];
        let keywords = KeywordSet::new(["python", "sql"]);

        let batch = evaluate_documents(
            &documents,
            &keywords,
            &Scorer::default(),
            &metadata(),
            TopK::new(2).unwrap(),
        );

        let names: Vec<_> = batch.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["b.txt", "a.txt"]);
    }
}
