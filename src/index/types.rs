use crate::utils::MIN_TOKEN_LENGTH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Identifier of a document in the index: its file path, unique per corpus
pub type DocPath = String;

/// A source file as handed over by the document repository.
///
/// Parsing happens upstream; the index only sees the extracted fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    pub path: DocPath,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
}

impl SourceDocument {
    pub fn new(path: impl Into<DocPath>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.types.push(name.into());
        self
    }

    pub fn with_method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(name.into());
        self
    }

    /// Package name, treating an empty string as absent
    pub fn package_name(&self) -> Option<&str> {
        self.package.as_deref().filter(|p| !p.is_empty())
    }

    /// Package-qualified name of a declared type
    pub fn qualified_name(&self, type_name: &str) -> String {
        match self.package_name() {
            Some(package) => format!("{}.{}", package, type_name),
            None => type_name.to_string(),
        }
    }
}

/// Configuration for the search index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Content tokens shorter than this are not indexed
    pub min_token_length: usize,
    /// Number of compiled regexes kept for repeated regex queries
    pub regex_cache_size: usize,
    /// Upper bound on the compiled size of a query regex, in bytes
    pub regex_size_limit: usize,
    /// Index rebuild batches on the rayon pool
    pub parallel_rebuild: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            min_token_length: MIN_TOKEN_LENGTH,
            regex_cache_size: 64,
            regex_size_limit: 10 * 1024 * 1024,
            parallel_rebuild: true,
        }
    }
}

impl IndexConfig {
    /// Load a config from a JSON file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }
}
