pub mod cache;
pub mod corpus;
pub mod field;
pub mod search;
pub mod stats;
pub mod types;

pub use cache::DocumentCache;
pub use corpus::load_corpus;
pub use field::FieldIndex;
pub use search::SearchIndex;
pub use stats::IndexStatistics;
pub use types::*;
