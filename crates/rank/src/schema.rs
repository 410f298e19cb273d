use extract::ContactInfo;
use ingest::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::scorer::KeywordScore;

/// Serialized in place of a phone number when none was found.
pub const PHONE_NOT_FOUND: &str = "Phone number not found";

/// Score and contact details for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub filename: String,
    pub matching_percentage: f64,
    pub matching_keywords: BTreeSet<String>,
    pub non_matching_keywords: BTreeSet<String>,
    pub emails: Vec<String>,
    pub name: Option<String>,
    pub file_path: String,
    #[serde(with = "phone_sentinel")]
    pub phone: Option<String>,
}

impl MatchResult {
    pub fn new(document: &Document, score: KeywordScore, contact: ContactInfo) -> Self {
        Self {
            filename: document.filename.clone(),
            matching_percentage: score.percentage,
            matching_keywords: score.matched,
            non_matching_keywords: score.unmatched,
            emails: contact.emails,
            name: contact.name,
            file_path: document.file_path.clone(),
            phone: contact.phone,
        }
    }
}

mod phone_sentinel {
    use super::PHONE_NOT_FOUND;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(phone: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(phone.as_deref().unwrap_or(PHONE_NOT_FOUND))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let phone = Option::<String>::deserialize(deserializer)?;
        Ok(phone.filter(|p| p != PHONE_NOT_FOUND))
    }
}

/// Results ordered by matching percentage, best first, at most top-K long.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedBatch {
    results: Vec<MatchResult>,
}

impl RankedBatch {
    pub(crate) fn new(results: Vec<MatchResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[MatchResult] {
        &self.results
    }
}

impl<'a> IntoIterator for &'a RankedBatch {
    type Item = &'a MatchResult;
    type IntoIter = std::slice::Iter<'a, MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
