pub mod config;
pub mod error;
pub mod evaluator;
pub mod matcher;
pub mod metrics;
pub mod ranker;
pub mod schema;
pub mod scorer;
pub mod service;

pub use config::EvaluatorConfig;
pub use error::{EvaluationError, ValidationError};
pub use evaluator::{evaluate_document, evaluate_documents, Evaluator};
pub use matcher::{AhoCorasickMatcher, PatternMatcher, RabinKarp};
pub use metrics::{Metrics, MetricsSnapshot, TimedOperation};
pub use ranker::rank;
pub use schema::{MatchResult, RankedBatch, PHONE_NOT_FOUND};
pub use scorer::{KeywordScore, KeywordSet, MatchPolicy, Scorer, SearchAlgorithm};
pub use service::{EvaluationRequest, EvaluationResponse, Skillset, TopK, ValidatedRequest};
