//! Concurrent key -> document set mapping.
//!
//! Each of the five searchable fields (content tokens, types, packages,
//! methods, imports) is one [`FieldIndex`]. Postings are `DashSet`s held in a
//! `DashMap`, so readers and writers never take a lock across the whole index.

use crate::index::types::DocPath;
use ahash::RandomState;
use dashmap::{DashMap, DashSet};
use std::collections::BTreeSet;

type Postings = DashSet<DocPath, RandomState>;

/// Inverted mapping from a key to the documents containing it
#[derive(Debug, Default)]
pub struct FieldIndex {
    entries: DashMap<String, Postings, RandomState>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `path` to the postings of `key`, creating them if absent.
    ///
    /// The entry guard is held across create-and-insert, so a concurrent
    /// `remove` cannot prune the set in between.
    pub fn put(&self, key: &str, path: &str) {
        if key.is_empty() {
            return;
        }
        self.entries
            .entry(key.to_string())
            .or_default()
            .insert(path.to_string());
    }

    /// Remove `path` from every key, pruning keys left without documents
    pub fn remove(&self, path: &str) {
        self.entries.retain(|_, postings| {
            postings.remove(path);
            !postings.is_empty()
        });
    }

    /// Documents containing `key`; empty when the key is unknown
    pub fn get(&self, key: &str) -> BTreeSet<DocPath> {
        self.entries
            .get(key)
            .map(|postings| postings.iter().map(|p| p.key().clone()).collect())
            .unwrap_or_default()
    }

    /// Union of the postings of every key for which `predicate` holds
    pub fn get_matching(&self, predicate: impl Fn(&str) -> bool) -> BTreeSet<DocPath> {
        let mut result = BTreeSet::new();
        for entry in self.entries.iter() {
            if predicate(entry.key()) {
                result.extend(entry.value().iter().map(|p| p.key().clone()));
            }
        }
        result
    }

    /// Number of postings for `key`, without copying them
    pub fn doc_freq(&self, key: &str) -> usize {
        self.entries.get(key).map(|p| p.len()).unwrap_or(0)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether `path` appears under any key
    pub fn references(&self, path: &str) -> bool {
        self.entries.iter().any(|entry| entry.value().contains(path))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let index = FieldIndex::new();
        index.put("logger", "A.java");
        index.put("logger", "B.java");
        index.put("main", "A.java");

        let docs = index.get("logger");
        assert_eq!(docs.len(), 2);
        assert!(docs.contains("A.java"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_get_unknown_key_is_empty() {
        let index = FieldIndex::new();
        assert!(index.get("missing").is_empty());
        assert_eq!(index.doc_freq("missing"), 0);
    }

    #[test]
    fn test_remove_prunes_empty_keys() {
        let index = FieldIndex::new();
        index.put("shared", "A.java");
        index.put("shared", "B.java");
        index.put("only_a", "A.java");

        index.remove("A.java");

        assert!(!index.contains_key("only_a"));
        assert_eq!(index.get("shared").len(), 1);
        assert!(!index.references("A.java"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_empty_key_ignored() {
        let index = FieldIndex::new();
        index.put("", "A.java");
        assert!(index.is_empty());
    }

    #[test]
    fn test_get_matching_substring() {
        let index = FieldIndex::new();
        index.put("java.util.List", "A.java");
        index.put("java.util.Map", "B.java");
        index.put("org.slf4j.Logger", "C.java");

        let docs = index.get_matching(|key| key.contains("java.util"));
        assert_eq!(docs.len(), 2);
        assert!(!docs.contains("C.java"));
    }
}
