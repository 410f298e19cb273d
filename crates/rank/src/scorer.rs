use extract::{normalize_keyword, normalize_text};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::matcher::{AhoCorasickMatcher, PatternMatcher, RabinKarp};

/// How a keyword is considered present in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Anywhere in the text, including inside longer words.
    #[default]
    Substring,
    /// Every word of the keyword is a whitespace-delimited token of the text.
    Token,
}

/// Substring search backend used by [`MatchPolicy::Substring`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchAlgorithm {
    #[default]
    RabinKarp,
    AhoCorasick,
}

impl SearchAlgorithm {
    pub fn matcher(self) -> Arc<dyn PatternMatcher> {
        match self {
            Self::RabinKarp => Arc::new(RabinKarp::default()),
            Self::AhoCorasick => Arc::new(AhoCorasickMatcher),
        }
    }
}

/// Normalized, deduplicated keywords of one request.
///
/// A keyword that normalizes to `""` stays in the set and is scored like
/// any other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet(BTreeSet<String>);

impl KeywordSet {
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            raw.into_iter()
                .map(|k| normalize_keyword(k.as_ref()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordScore {
    /// Share of keywords found, 0 to 100
    pub percentage: f64,
    pub matched: BTreeSet<String>,
    pub unmatched: BTreeSet<String>,
}

/// Scores a document's text against a keyword set under one policy.
#[derive(Clone)]
pub struct Scorer {
    policy: MatchPolicy,
    matcher: Arc<dyn PatternMatcher>,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(MatchPolicy::default(), SearchAlgorithm::default())
    }
}

impl Scorer {
    pub fn new(policy: MatchPolicy, algorithm: SearchAlgorithm) -> Self {
        Self {
            policy,
            matcher: algorithm.matcher(),
        }
    }

    pub fn score(&self, keywords: &KeywordSet, text: &str) -> KeywordScore {
        if keywords.is_empty() {
            return KeywordScore::default();
        }

        let found = match self.policy {
            MatchPolicy::Substring => self
                .matcher
                .find_matches(&normalize_text(text), keywords.as_set()),
            MatchPolicy::Token => token_matches(keywords, text),
        };

        let (matched, unmatched): (BTreeSet<String>, BTreeSet<String>) = keywords
            .as_set()
            .iter()
            .cloned()
            .partition(|k| found.contains(k));

        KeywordScore {
            percentage: matched.len() as f64 / keywords.len() as f64 * 100.0,
            matched,
            unmatched,
        }
    }
}

/// Keywords whose every word is a standalone token of `text`, in any order.
fn token_matches(keywords: &KeywordSet, text: &str) -> BTreeSet<String> {
    let tokens: HashSet<String> = text.split_whitespace().map(normalize_text).collect();

    keywords
        .iter()
        .filter(|keyword| keyword.split_whitespace().all(|word| tokens.contains(word)))
        .map(str::to_string)
        .collect()
}
