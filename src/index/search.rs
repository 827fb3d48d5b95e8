//! The search index facade.
//!
//! [`SearchIndex`] owns the five field indexes and the document cache and is
//! meant to be shared (`Arc<SearchIndex>`) between indexing and query threads.
//! There is no lock spanning the whole index: a reader racing a writer may see
//! a document present in some fields and not yet in others, but every
//! individual posting update is atomic.

use crate::error::{QueryError, QueryResult};
use crate::graph::{
    analyze_dependencies, analyze_type_change_impact, optimize_imports, DependencyAnalysisResult,
    ImpactAnalysisResult, ImportOptimization,
};
use crate::index::cache::DocumentCache;
use crate::index::field::FieldIndex;
use crate::index::stats::IndexStatistics;
use crate::index::types::{DocPath, IndexConfig, SourceDocument};
use crate::query::executor::QueryExecutor;
use crate::query::parser::ContentQuery;
use crate::utils::extract_index_tokens;
use lru::LruCache;
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, trace};

/// In-memory multi-field inverted index over source documents
pub struct SearchIndex {
    config: IndexConfig,
    content: FieldIndex,
    types: FieldIndex,
    packages: FieldIndex,
    methods: FieldIndex,
    imports: FieldIndex,
    cache: DocumentCache,
    regex_cache: Option<Mutex<LruCache<(String, bool), Regex>>>,
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    pub fn with_config(config: IndexConfig) -> Self {
        let regex_cache =
            NonZeroUsize::new(config.regex_cache_size).map(|cap| Mutex::new(LruCache::new(cap)));
        Self {
            config,
            content: FieldIndex::new(),
            types: FieldIndex::new(),
            packages: FieldIndex::new(),
            methods: FieldIndex::new(),
            imports: FieldIndex::new(),
            cache: DocumentCache::new(),
            regex_cache,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Index a document, replacing whatever was indexed under its path.
    ///
    /// Documents with an empty path are ignored.
    pub fn index_file(&self, document: impl Into<Arc<SourceDocument>>) {
        let document = document.into();
        if document.path.is_empty() {
            trace!("skipping document without a path");
            return;
        }

        if self.cache.contains(&document.path) {
            self.remove_postings(&document.path);
        }
        self.insert_document(document);
    }

    /// Index several documents one after another
    pub fn index_files<I>(&self, documents: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<SourceDocument>>,
    {
        for document in documents {
            self.index_file(document);
        }
    }

    /// Remove a document from every field and the cache. No-op when absent.
    ///
    /// Postings are swept even when the cache has no entry for `path`: a
    /// racing `index_file` can leave postings behind after its snapshot was
    /// dropped, and only a later removal can clean them up.
    pub fn remove_file(&self, path: &str) {
        if path.is_empty() {
            return;
        }
        self.remove_postings(path);
        self.cache.remove(path);
        trace!(path, "removed document");
    }

    /// Replace the whole index with `documents`.
    ///
    /// When a path occurs more than once the last document wins. Readers
    /// running concurrently may observe an empty or partially filled index.
    pub fn rebuild<I>(&self, documents: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<SourceDocument>>,
    {
        let start = Instant::now();

        let mut by_path: HashMap<DocPath, Arc<SourceDocument>> = HashMap::new();
        for document in documents {
            let document = document.into();
            if !document.path.is_empty() {
                by_path.insert(document.path.clone(), document);
            }
        }
        let batch: Vec<Arc<SourceDocument>> = by_path.into_values().collect();

        self.clear();

        // The index was just cleared and paths are unique, so no document
        // needs its previous postings removed.
        if self.config.parallel_rebuild {
            batch
                .par_iter()
                .for_each(|doc| self.insert_document(Arc::clone(doc)));
        } else {
            for doc in &batch {
                self.insert_document(Arc::clone(doc));
            }
        }

        debug!(
            documents = batch.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "rebuilt search index"
        );
    }

    /// Empty every field index and the cache
    pub fn clear(&self) {
        self.content.clear();
        self.types.clear();
        self.packages.clear();
        self.methods.clear();
        self.imports.clear();
        self.cache.clear();
    }

    pub fn statistics(&self) -> IndexStatistics {
        IndexStatistics {
            total_files: self.cache.len(),
            unique_tokens: self.content.len(),
            unique_types: self.types.len(),
            unique_packages: self.packages.len(),
            unique_methods: self.methods.len(),
            unique_imports: self.imports.len(),
        }
    }

    /// Documents containing every token of `text`.
    ///
    /// With `whole_word`, the candidates are rechecked against the original
    /// text bounded by non-identifier characters.
    pub fn search_content(
        &self,
        text: &str,
        case_sensitive: bool,
        whole_word: bool,
    ) -> Vec<Arc<SourceDocument>> {
        let paths = QueryExecutor::new(self).token_candidates(text, case_sensitive, whole_word);
        self.cache.resolve(&paths)
    }

    /// Run a structured content query
    pub fn search(&self, query: &ContentQuery) -> QueryResult<Vec<Arc<SourceDocument>>> {
        QueryExecutor::new(self).execute(query)
    }

    /// Documents declaring a type with exactly this name
    pub fn search_by_type(&self, name: &str) -> Vec<Arc<SourceDocument>> {
        self.cache.resolve(&self.types.get(name))
    }

    pub fn search_by_package(&self, name: &str) -> Vec<Arc<SourceDocument>> {
        self.cache.resolve(&self.packages.get(name))
    }

    pub fn search_by_method(&self, name: &str) -> Vec<Arc<SourceDocument>> {
        self.cache.resolve(&self.methods.get(name))
    }

    /// Documents with an import containing `pattern` as a substring
    pub fn search_by_import(&self, pattern: &str) -> Vec<Arc<SourceDocument>> {
        if pattern.is_empty() {
            return Vec::new();
        }
        let paths = self.imports.get_matching(|import| import.contains(pattern));
        self.cache.resolve(&paths)
    }

    pub fn get_document(&self, path: &str) -> Option<Arc<SourceDocument>> {
        self.cache.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.cache.contains(path)
    }

    /// Every indexed document, in path order
    pub fn documents(&self) -> Vec<Arc<SourceDocument>> {
        self.cache.snapshot()
    }

    /// Dependency analysis over a snapshot of the indexed documents
    pub fn analyze_dependencies(&self) -> DependencyAnalysisResult {
        analyze_dependencies(&self.documents())
    }

    /// Documents affected by changing `type_name`
    pub fn analyze_type_change_impact(&self, type_name: &str) -> ImpactAnalysisResult {
        analyze_type_change_impact(&self.documents(), type_name)
    }

    /// Import suggestions for one indexed document
    pub fn optimize_imports(&self, path: &str) -> Option<ImportOptimization> {
        self.cache.get(path).map(|doc| optimize_imports(&doc))
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Whether `path` still appears in any field index
    pub fn references(&self, path: &str) -> bool {
        self.field_indexes().iter().any(|field| field.references(path))
    }

    pub(crate) fn content_index(&self) -> &FieldIndex {
        &self.content
    }

    pub(crate) fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Compile a query regex, reusing a cached one when possible
    pub(crate) fn compile_regex(&self, pattern: &str, case_sensitive: bool) -> QueryResult<Regex> {
        let key = (pattern.to_string(), case_sensitive);
        if let Some(cache) = &self.regex_cache {
            if let Ok(mut cache) = cache.lock() {
                if let Some(regex) = cache.get(&key) {
                    return Ok(regex.clone());
                }
            }
        }

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .size_limit(self.config.regex_size_limit)
            .build()
            .map_err(|source| QueryError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })?;

        if let Some(cache) = &self.regex_cache {
            if let Ok(mut cache) = cache.lock() {
                cache.put(key, regex.clone());
            }
        }
        Ok(regex)
    }

    fn field_indexes(&self) -> [&FieldIndex; 5] {
        [
            &self.content,
            &self.types,
            &self.packages,
            &self.methods,
            &self.imports,
        ]
    }

    fn remove_postings(&self, path: &str) {
        for field in self.field_indexes() {
            field.remove(path);
        }
    }

    /// Add a document's keys to every field. Callers ensure no stale
    /// postings exist for its path.
    fn insert_document(&self, document: Arc<SourceDocument>) {
        let path = document.path.as_str();

        for token in extract_index_tokens(&document.content, self.config.min_token_length) {
            self.content.put(&token, path);
        }
        for name in &document.types {
            self.types.put(name, path);
        }
        if let Some(package) = document.package_name() {
            self.packages.put(package, path);
        }
        for name in &document.methods {
            self.methods.put(name, path);
        }
        for import in &document.imports {
            self.imports.put(import, path);
        }

        trace!(path, "indexed document");
        self.cache.insert(document);
    }

    /// Paths of every cached document, in order
    pub(crate) fn all_paths(&self) -> BTreeSet<DocPath> {
        self.cache
            .snapshot()
            .into_iter()
            .map(|doc| doc.path.clone())
            .collect()
    }
}
