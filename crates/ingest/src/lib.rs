pub mod cache;
pub mod corpus;
pub mod document;
pub mod error;
pub mod reader;

pub use cache::{CacheStats, ExtractionCache};
pub use corpus::Corpus;
pub use document::{Document, DocumentHandle};
pub use error::ExtractError;
pub use reader::{DocumentLoader, FileReader, TextExtractor};
