use unicode_segmentation::UnicodeSegmentation;

use crate::schema::{PosTag, TaggedToken};

/// Part-of-speech tagging used by the name heuristic.
///
/// Real taggers load a model; construct one once and share it behind an `Arc`.
pub trait PosTagger: Send + Sync {
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

/// Words that are capitalized in resumes without being part of a name.
const HEADING_WORDS: &[&str] = &[
    "a", "about", "address", "an", "and", "at", "certifications", "contact", "curriculum",
    "cv", "details", "education", "email", "experience", "for", "github", "i", "in",
    "information", "languages", "linkedin", "mobile", "my", "objective", "of", "personal",
    "phone", "professional", "profile", "projects", "references", "resume", "skills",
    "summary", "technical", "the", "to", "vitae", "with", "work",
];

/// Deterministic tagger that treats capitalized alphabetic words as proper nouns.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalizationTagger;

impl CapitalizationTagger {
    fn looks_like_proper_noun(word: &str) -> bool {
        let mut chars = word.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !first.is_uppercase() {
            return false;
        }
        if !word.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '’' || c == '-') {
            return false;
        }
        let lower = word.to_lowercase();
        !HEADING_WORDS.iter().any(|heading| *heading == lower)
    }
}

impl PosTagger for CapitalizationTagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        text.unicode_word_indices()
            .map(|(start, word)| {
                let tag = if Self::looks_like_proper_noun(word) {
                    PosTag::ProperNoun
                } else {
                    PosTag::Other
                };
                TaggedToken::new(start, start + word.len(), tag)
            })
            .collect()
    }
}
