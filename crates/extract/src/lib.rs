pub mod metadata;
pub mod normalizer;
pub mod schema;
pub mod tagger;

pub use metadata::{extract_emails, extract_phone, MetadataExtractor};
pub use normalizer::{normalize_keyword, normalize_text, split_skillset};
pub use schema::{ContactInfo, PosTag, TaggedToken};
pub use tagger::{CapitalizationTagger, PosTagger};
