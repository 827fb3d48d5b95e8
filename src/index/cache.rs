use crate::index::types::{DocPath, SourceDocument};
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::Arc;

/// Last-indexed snapshot of every document, keyed by path
#[derive(Debug, Default)]
pub struct DocumentCache {
    documents: DashMap<DocPath, Arc<SourceDocument>, RandomState>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot, returning the one it replaces
    pub fn insert(&self, document: Arc<SourceDocument>) -> Option<Arc<SourceDocument>> {
        self.documents.insert(document.path.clone(), document)
    }

    pub fn remove(&self, path: &str) -> Option<Arc<SourceDocument>> {
        self.documents.remove(path).map(|(_, doc)| doc)
    }

    pub fn get(&self, path: &str) -> Option<Arc<SourceDocument>> {
        self.documents.get(path).map(|doc| Arc::clone(doc.value()))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.documents.contains_key(path)
    }

    /// Resolve paths to cached documents, skipping any evicted meanwhile
    pub fn resolve<'a>(
        &self,
        paths: impl IntoIterator<Item = &'a DocPath>,
    ) -> Vec<Arc<SourceDocument>> {
        paths.into_iter().filter_map(|path| self.get(path)).collect()
    }

    /// Snapshot of every cached document, sorted by path
    pub fn snapshot(&self) -> Vec<Arc<SourceDocument>> {
        let mut docs: Vec<_> = self
            .documents
            .iter()
            .map(|doc| Arc::clone(doc.value()))
            .collect();
        docs.sort_by(|a, b| a.path.cmp(&b.path));
        docs
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn clear(&self) {
        self.documents.clear();
    }
}
