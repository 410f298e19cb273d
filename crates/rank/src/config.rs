use std::time::Duration;

use crate::scorer::{MatchPolicy, SearchAlgorithm};

pub struct EvaluatorConfig {
    pub max_concurrent_extractions: usize,
    pub extraction_timeout: Duration,
    pub policy: MatchPolicy,
    pub algorithm: SearchAlgorithm,
    /// Capacity of the extracted-text cache; `None` disables it.
    pub cache_entries: Option<usize>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_extractions: 5,
            extraction_timeout: Duration::from_secs(30),
            policy: MatchPolicy::Substring,
            algorithm: SearchAlgorithm::RabinKarp,
            cache_entries: Some(10_000),
        }
    }
}
