use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time counts of the search index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexStatistics {
    pub total_files: usize,
    pub unique_tokens: usize,
    pub unique_types: usize,
    pub unique_packages: usize,
    pub unique_methods: usize,
    pub unique_imports: usize,
}

impl IndexStatistics {
    /// Distinct keys across all five field indexes
    pub fn total_keys(&self) -> usize {
        self.unique_tokens
            + self.unique_types
            + self.unique_packages
            + self.unique_methods
            + self.unique_imports
    }
}

impl fmt::Display for IndexStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Index Statistics: {} files, {} tokens, {} types, {} packages, {} methods, {} imports",
            self.total_files,
            self.unique_tokens,
            self.unique_types,
            self.unique_packages,
            self.unique_methods,
            self.unique_imports
        )
    }
}
