use extract::split_skillset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::schema::RankedBatch;
use crate::scorer::KeywordSet;

/// How many ranked results a request wants back; always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TopK(NonZeroUsize);

impl TopK {
    pub fn new(n: usize) -> Result<Self, ValidationError> {
        NonZeroUsize::new(n)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTopK(n.to_string()))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<i64> for TopK {
    type Error = ValidationError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        usize::try_from(n)
            .map_err(|_| ValidationError::InvalidTopK(n.to_string()))
            .and_then(Self::new)
    }
}

impl FromStr for TopK {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidTopK(s.to_string()))?;
        Self::try_from(n)
    }
}

impl fmt::Display for TopK {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Requested skills, either `"python,sql"` or `["python", "sql"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skillset {
    Csv(String),
    List(Vec<String>),
}

impl Skillset {
    /// Raw tokens as the caller sent them, before normalization.
    pub fn raw_keywords(&self) -> Vec<String> {
        match self {
            Self::Csv(s) => split_skillset(s),
            Self::List(items) => items.clone(),
        }
    }
}

impl From<&str> for Skillset {
    fn from(s: &str) -> Self {
        Self::Csv(s.to_string())
    }
}

impl From<String> for Skillset {
    fn from(s: String) -> Self {
        Self::Csv(s)
    }
}

impl From<Vec<String>> for Skillset {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// An evaluation request as it arrives from a caller, not yet validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationRequest {
    pub top_k: Option<i64>,
    pub skillset: Option<Skillset>,
}

impl EvaluationRequest {
    pub fn new(top_k: i64, skillset: impl Into<Skillset>) -> Self {
        Self {
            top_k: Some(top_k),
            skillset: Some(skillset.into()),
        }
    }

    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let (Some(top_k), Some(skillset)) = (self.top_k, self.skillset.as_ref()) else {
            return Err(ValidationError::MissingField);
        };

        let top_k = TopK::try_from(top_k)?;
        let skillset = skillset.raw_keywords();
        let keywords = KeywordSet::new(&skillset);

        Ok(ValidatedRequest {
            top_k,
            skillset,
            keywords,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub top_k: TopK,
    /// Skillset tokens as received, echoed back in the response.
    pub skillset: Vec<String>,
    pub keywords: KeywordSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub skillset: Vec<String>,
    pub top_resumes: RankedBatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_must_be_positive() {
        assert_eq!(TopK::try_from(3).unwrap().get(), 3);
        assert_eq!(TopK::try_from(0), Err(ValidationError::InvalidTopK("0".to_string())));
        assert_eq!(TopK::try_from(-1), Err(ValidationError::InvalidTopK("-1".to_string())));
    }

    #[test]
    fn test_top_k_from_str() {
        assert_eq!("5".parse::<TopK>().unwrap().get(), 5);
        assert!("five".parse::<TopK>().is_err());
        assert!("2.5".parse::<TopK>().is_err());
        assert!("0".parse::<TopK>().is_err());
    }

    #[test]
    fn test_missing_fields() {
        let missing_skills = EvaluationRequest {
            top_k: Some(3),
            skillset: None,
        };
        assert_eq!(missing_skills.validate().unwrap_err(), ValidationError::MissingField);
        assert_eq!(
            EvaluationRequest::default().validate().unwrap_err(),
            ValidationError::MissingField
        );
    }

    #[test]
    fn test_csv_and_list_skillsets_agree() {
        let csv = EvaluationRequest::new(2, "Python, SQL,python").validate().unwrap();
        let list = EvaluationRequest::new(2, vec!["python".to_string(), "sql".to_string()])
            .validate()
            .unwrap();

        assert_eq!(csv.keywords, list.keywords);
        assert_eq!(csv.skillset, vec!["Python", " SQL", "python"]);
    }

    #[test]
    fn test_request_from_json() {
        let req: EvaluationRequest =
            serde_json::from_str(r#"{"top_k": 2, "skillset": ["rust", "go"]}"#).unwrap();
        assert_eq!(req.validate().unwrap().keywords.len(), 2);

        let req: EvaluationRequest =
            serde_json::from_str(r#"{"top_k": -4, "skillset": "rust"}"#).unwrap();
        assert!(matches!(req.validate(), Err(ValidationError::InvalidTopK(_))));
    }

    #[test]
    fn test_empty_skillset_is_valid() {
        let validated = EvaluationRequest::new(1, "").validate().unwrap();
        assert_eq!(validated.skillset, vec![""]);
        assert_eq!(validated.keywords.len(), 1);
        assert_eq!(validated.keywords.iter().collect::<Vec<_>>(), vec![""]);
    }
}
