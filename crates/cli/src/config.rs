use anyhow::{Context, Result};
use rank::{EvaluatorConfig, MatchPolicy, SearchAlgorithm};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `corpus.resume_dir`.
pub const DIR_ENV: &str = "RESUME_RANK_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub corpus: CorpusConfig,
    pub concurrency: ConcurrencyConfig,
    pub matching: MatchingConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub resume_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub max_concurrent_extractions: usize,
    pub extraction_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub policy: MatchPolicy,
    pub algorithm: SearchAlgorithm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            resume_dir: PathBuf::from("resume"),
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_extractions: 5,
            extraction_timeout_secs: 30,
            request_timeout_secs: 120,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 10000,
        }
    }
}

impl AppConfig {
    /// Defaults, or the TOML file at `path` layered over them.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&raw).context(format!("Failed to parse config file: {:?}", path))
    }

    pub fn apply_env(&mut self) {
        self.override_dir(std::env::var(DIR_ENV).ok());
    }

    fn override_dir(&mut self, dir: Option<String>) {
        if let Some(dir) = dir.filter(|d| !d.trim().is_empty()) {
            self.corpus.resume_dir = PathBuf::from(dir);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.concurrency.request_timeout_secs)
    }

    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            max_concurrent_extractions: self.concurrency.max_concurrent_extractions,
            extraction_timeout: Duration::from_secs(self.concurrency.extraction_timeout_secs),
            policy: self.matching.policy,
            algorithm: self.matching.algorithm,
            cache_entries: self.cache.enabled.then_some(self.cache.max_entries),
        }
    }
}
