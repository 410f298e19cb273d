use serde::{Deserialize, Serialize};

/// Contact details pulled out of a document's text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub emails: Vec<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
}

/// Grammatical category attached to a token by a [`crate::PosTagger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PosTag {
    ProperNoun,
    Other,
}

/// One tagged token and its byte span in the tagged text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub start: usize,
    pub end: usize,
    pub tag: PosTag,
}

impl TaggedToken {
    pub fn new(start: usize, end: usize, tag: PosTag) -> Self {
        Self { start, end, tag }
    }

    pub fn is_proper_noun(&self) -> bool {
        self.tag == PosTag::ProperNoun
    }
}
