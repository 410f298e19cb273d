use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::schema::{ContactInfo, TaggedToken};
use crate::tagger::PosTagger;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9.\-+_]+@[a-z0-9.\-+_]+\.[a-z]+").expect("email pattern is valid")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\+?[0-9]{1,3}[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b")
        .expect("phone pattern is valid")
});

/// Shortest and longest proper-noun runs accepted as a person's name.
const NAME_MIN_TOKENS: usize = 2;
const NAME_MAX_TOKENS: usize = 4;

/// Best-effort contact details: emails, a phone number, a candidate name.
#[derive(Clone)]
pub struct MetadataExtractor {
    tagger: Arc<dyn PosTagger>,
}

impl MetadataExtractor {
    pub fn new(tagger: Arc<dyn PosTagger>) -> Self {
        Self { tagger }
    }

    pub fn extract(&self, text: &str) -> ContactInfo {
        ContactInfo {
            emails: extract_emails(text),
            phone: extract_phone(text),
            name: self.extract_name(text),
        }
    }

    /// First run of consecutive proper nouns on a single line, capped at four tokens.
    pub fn extract_name(&self, text: &str) -> Option<String> {
        let tokens = self.tagger.tag(text);
        let mut run: Vec<&TaggedToken> = Vec::new();

        for token in &tokens {
            if token.is_proper_noun() {
                let continues_run = run.last().is_some_and(|prev| {
                    text.get(prev.end..token.start)
                        .is_some_and(|gap| !gap.contains('\n'))
                });
                if !continues_run {
                    if let Some(name) = name_from_run(text, &run) {
                        return Some(name);
                    }
                    run.clear();
                }
                run.push(token);
            } else {
                if let Some(name) = name_from_run(text, &run) {
                    return Some(name);
                }
                run.clear();
            }
        }

        name_from_run(text, &run)
    }
}

fn name_from_run(text: &str, run: &[&TaggedToken]) -> Option<String> {
    if run.len() < NAME_MIN_TOKENS {
        return None;
    }
    let first = run[0];
    let last = run[run.len().min(NAME_MAX_TOKENS) - 1];
    text.get(first.start..last.end).map(str::to_string)
}

/// Every email-looking substring, lower-cased, in order of appearance.
pub fn extract_emails(text: &str) -> Vec<String> {
    EMAIL.find_iter(text).map(|m| m.as_str().to_lowercase()).collect()
}

/// The first phone-number-looking substring.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE.find(text).map(|m| m.as_str().to_string())
}
