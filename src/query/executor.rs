use crate::error::QueryResult;
use crate::index::search::SearchIndex;
use crate::index::types::{DocPath, SourceDocument};
use crate::query::parser::ContentQuery;
use crate::utils::tokenize;
use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{trace, warn};

/// Identifier characters, as a regex class; anything else bounds a word
const NON_IDENT_CLASS: &str = "[^A-Za-z0-9_$]";

/// Query executor
pub struct QueryExecutor<'a> {
    index: &'a SearchIndex,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self { index }
    }

    /// Execute a structured query.
    ///
    /// Resolution order: candidate set (token index or regex scan), package
    /// include filter, package exclude filter, then the result cap. Results
    /// are in path order.
    pub fn execute(&self, query: &ContentQuery) -> QueryResult<Vec<Arc<SourceDocument>>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = if query.use_regex {
            self.regex_candidates(&query.text, query.case_sensitive)?
        } else {
            self.token_candidates(&query.text, query.case_sensitive, query.whole_word)
        };

        let mut results = self.index.cache().resolve(&candidates);
        self.apply_package_filters(&mut results, query);

        if let Some(limit) = query.max_results {
            results.truncate(limit);
        }

        trace!(
            text = query.text.as_str(),
            regex = query.use_regex,
            results = results.len(),
            "executed content query"
        );
        Ok(results)
    }

    /// Paths of documents containing every token of `text` (AND semantics)
    pub fn token_candidates(
        &self,
        text: &str,
        case_sensitive: bool,
        whole_word: bool,
    ) -> BTreeSet<DocPath> {
        if text.trim().is_empty() {
            return BTreeSet::new();
        }

        let tokens = tokenize(text, case_sensitive);
        if tokens.is_empty() {
            return BTreeSet::new();
        }

        let min_length = self.index.config().min_token_length;
        let content = self.index.content_index();

        // The content index is lowercase; look up the folded form and, for
        // case-sensitive queries, recheck the exact form below.
        let mut indexed: Vec<String> = tokens
            .iter()
            .filter(|t| t.len() >= min_length)
            .map(|t| t.to_ascii_lowercase())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let has_short = tokens.iter().any(|t| t.len() < min_length);

        // Smallest postings first keeps the running intersection small
        indexed.sort_by_key(|t| content.doc_freq(t));

        let mut candidates: Option<BTreeSet<DocPath>> = None;
        for token in &indexed {
            let docs = content.get(token);
            let next = match candidates {
                Some(existing) => existing.intersection(&docs).cloned().collect(),
                None => docs,
            };
            if next.is_empty() {
                return BTreeSet::new();
            }
            candidates = Some(next);
        }

        // Only short tokens: nothing in the index can narrow the search
        let mut candidates = candidates.unwrap_or_else(|| self.index.all_paths());

        if case_sensitive || has_short {
            candidates = self.verify_tokens(candidates, &tokens, case_sensitive);
        }

        if whole_word && !candidates.is_empty() {
            candidates = self.verify_whole_word(candidates, text.trim(), case_sensitive);
        }

        candidates
    }

    /// Paths of documents whose content matches `pattern`
    fn regex_candidates(&self, pattern: &str, case_sensitive: bool) -> QueryResult<BTreeSet<DocPath>> {
        let regex = self.index.compile_regex(pattern, case_sensitive)?;
        Ok(self.scan(self.index.cache().snapshot(), &regex))
    }

    /// Keep candidates whose content has every query token, compared as
    /// tokenized with the query's case sensitivity
    fn verify_tokens(
        &self,
        candidates: BTreeSet<DocPath>,
        tokens: &HashSet<String>,
        case_sensitive: bool,
    ) -> BTreeSet<DocPath> {
        let docs = self.index.cache().resolve(&candidates);
        docs.par_iter()
            .filter(|doc| {
                let doc_tokens = tokenize(&doc.content, case_sensitive);
                tokens.iter().all(|t| doc_tokens.contains(t))
            })
            .map(|doc| doc.path.clone())
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Keep candidates containing `text` bounded by non-identifier characters.
    ///
    /// Tokens alone cannot answer this: a phrase is split into separate
    /// terms and a token match says nothing about its neighbours.
    fn verify_whole_word(
        &self,
        candidates: BTreeSet<DocPath>,
        text: &str,
        case_sensitive: bool,
    ) -> BTreeSet<DocPath> {
        let pattern = whole_word_pattern(text);
        match self.index.compile_regex(&pattern, case_sensitive) {
            Ok(regex) => self.scan(self.index.cache().resolve(&candidates), &regex),
            Err(err) => {
                warn!(error = %err, "whole-word pattern failed to compile");
                BTreeSet::new()
            }
        }
    }

    fn scan(&self, docs: Vec<Arc<SourceDocument>>, regex: &Regex) -> BTreeSet<DocPath> {
        docs.par_iter()
            .filter(|doc| regex.is_match(&doc.content))
            .map(|doc| doc.path.clone())
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Include filter first, then exclude, so exclusion wins on conflict
    fn apply_package_filters(&self, results: &mut Vec<Arc<SourceDocument>>, query: &ContentQuery) {
        if !query.include_packages.is_empty() {
            results.retain(|doc| {
                doc.package_name()
                    .is_some_and(|p| query.include_packages.contains(p))
            });
        }
        if !query.exclude_packages.is_empty() {
            results.retain(|doc| {
                !doc.package_name()
                    .is_some_and(|p| query.exclude_packages.contains(p))
            });
        }
    }
}

/// Regex matching `text` literally, bounded by non-identifier characters or
/// the ends of the input
pub fn whole_word_pattern(text: &str) -> String {
    format!(
        "(?:^|{class}){text}(?:{class}|$)",
        class = NON_IDENT_CLASS,
        text = regex::escape(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(docs: Vec<SourceDocument>) -> SearchIndex {
        let index = SearchIndex::new();
        index.rebuild(docs);
        index
    }

    fn paths(docs: &[Arc<SourceDocument>]) -> Vec<&str> {
        docs.iter().map(|d| d.path.as_str()).collect()
    }

    #[test]
    fn test_whole_word_pattern() {
        let re = Regex::new(&whole_word_pattern("cat")).unwrap();
        assert!(re.is_match("the cat sat"));
        assert!(re.is_match("cat"));
        assert!(re.is_match("(cat)"));
        assert!(!re.is_match("category"));
        assert!(!re.is_match("$cat"));
        assert!(!re.is_match("my_cat"));
    }

    #[test]
    fn test_whole_word_pattern_escapes_text() {
        let re = Regex::new(&whole_word_pattern("a.b")).unwrap();
        assert!(re.is_match("x a.b y"));
        assert!(!re.is_match("x aXb y"));
    }

    #[test]
    fn test_case_sensitive_rechecks_exact_form() {
        let index = index_with(vec![
            SourceDocument::new("A.java", "Logger log"),
            SourceDocument::new("B.java", "logger log"),
        ]);
        let exec = QueryExecutor::new(&index);

        let sensitive = exec.token_candidates("Logger", true, false);
        assert_eq!(sensitive.into_iter().collect::<Vec<_>>(), vec!["A.java"]);

        let insensitive = exec.token_candidates("Logger", false, false);
        assert_eq!(insensitive.len(), 2);
    }

    #[test]
    fn test_short_terms_still_match() {
        let index = index_with(vec![
            SourceDocument::new("A.java", "int x = of(list);"),
            SourceDocument::new("B.java", "int y = list.size();"),
        ]);
        let exec = QueryExecutor::new(&index);

        let hits = exec.token_candidates("of list", false, false);
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec!["A.java"]);

        let hits = exec.token_candidates("x", false, false);
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec!["A.java"]);
    }

    #[test]
    fn test_regex_query() {
        let index = index_with(vec![
            SourceDocument::new("A.java", "getValue(); getName();"),
            SourceDocument::new("B.java", "setValue(1);"),
        ]);

        let docs = index.search(&ContentQuery::regex(r"get[A-Z]\w+\(")).unwrap();
        assert_eq!(paths(&docs), vec!["A.java"]);

        // Regex bypasses tokenization, so partial identifiers match
        let docs = index.search(&ContentQuery::regex("alu")).unwrap();
        assert_eq!(paths(&docs), vec!["A.java", "B.java"]);
    }

    #[test]
    fn test_whitespace_regex_scans() {
        let index = index_with(vec![
            SourceDocument::new("A.java", "two words"),
            SourceDocument::new("B.java", "oneword"),
        ]);

        let docs = index.search(&ContentQuery::regex(" ")).unwrap();
        assert_eq!(paths(&docs), vec!["A.java"]);
        assert!(index.search(&ContentQuery::regex("")).unwrap().is_empty());
    }

    #[test]
    fn test_regex_case_sensitivity() {
        let index = index_with(vec![SourceDocument::new("A.java", "Logger")]);
        assert!(index
            .search(&ContentQuery::regex("logger").case_sensitive(true))
            .unwrap()
            .is_empty());
        assert_eq!(index.search(&ContentQuery::regex("logger")).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let index = index_with(vec![SourceDocument::new("A.java", "anything")]);
        let err = index.search(&ContentQuery::regex("(unclosed")).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_max_results_in_path_order() {
        let docs = (0..5)
            .rev()
            .map(|i| SourceDocument::new(format!("F{i}.java"), "shared token"))
            .collect();
        let index = index_with(docs);

        let hits = index
            .search(&ContentQuery::new("shared").max_results(2))
            .unwrap();
        assert_eq!(paths(&hits), vec!["F0.java", "F1.java"]);
    }

    #[test]
    fn test_documents_without_package_fail_include() {
        let index = index_with(vec![
            SourceDocument::new("A.java", "shared").with_package("com.x"),
            SourceDocument::new("B.java", "shared"),
        ]);

        let hits = index
            .search(&ContentQuery::new("shared").include_package("com.x"))
            .unwrap();
        assert_eq!(paths(&hits), vec!["A.java"]);

        let hits = index
            .search(&ContentQuery::new("shared").exclude_package("com.x"))
            .unwrap();
        assert_eq!(paths(&hits), vec!["B.java"]);
    }
}
