//! Import clean-up suggestions for a single document.

use crate::index::types::SourceDocument;
use crate::utils::token_slices;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::LazyLock;
use tracing::trace;

/// `Type.method(` call sites
static STATIC_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][a-zA-Z0-9]+)\.([a-z][a-zA-Z0-9]+)\(").unwrap());

/// Calls of the same `Type.method` needed before a static import is suggested
pub const STATIC_IMPORT_MIN_CALLS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportOptimization {
    /// Imports whose simple name never appears outside the import block
    pub unused: BTreeSet<String>,
    /// `.*` imports
    pub wildcards: BTreeSet<String>,
    /// `Type.method` calls frequent enough for a static import
    pub static_candidates: BTreeSet<String>,
    /// Remaining imports, sorted and deduplicated
    pub optimized: Vec<String>,
}

impl ImportOptimization {
    pub fn has_suggestions(&self) -> bool {
        !self.unused.is_empty() || !self.wildcards.is_empty() || !self.static_candidates.is_empty()
    }
}

fn is_header_line(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("import ") || line.starts_with("package ")
}

/// Suggest import changes for `document`.
///
/// An import counts as used when its last segment appears as a token in the
/// content outside `package`/`import` lines. Wildcard imports are always
/// kept and reported separately.
pub fn optimize_imports(document: &SourceDocument) -> ImportOptimization {
    let body: Vec<&str> = document
        .content
        .lines()
        .filter(|line| !is_header_line(line))
        .collect();
    let body_tokens: HashSet<&str> = body.iter().flat_map(|line| token_slices(line)).collect();

    let mut result = ImportOptimization::default();
    for import in document.imports.iter().filter(|i| !i.is_empty()) {
        if import.ends_with(".*") {
            result.wildcards.insert(import.clone());
            continue;
        }
        let simple = import.rsplit('.').next().unwrap_or(import);
        if !body_tokens.contains(simple) {
            result.unused.insert(import.clone());
        }
    }

    let mut calls: BTreeMap<String, usize> = BTreeMap::new();
    for line in &body {
        for caps in STATIC_CALL.captures_iter(line) {
            *calls.entry(format!("{}.{}", &caps[1], &caps[2])).or_default() += 1;
        }
    }
    result.static_candidates = calls
        .into_iter()
        .filter(|(_, count)| *count >= STATIC_IMPORT_MIN_CALLS)
        .map(|(call, _)| call)
        .collect();

    let kept: BTreeSet<&String> = document
        .imports
        .iter()
        .filter(|i| !i.is_empty() && !result.unused.contains(*i))
        .collect();
    result.optimized = kept.into_iter().cloned().collect();

    trace!(
        path = document.path.as_str(),
        unused = result.unused.len(),
        wildcards = result.wildcards.len(),
        "imports analyzed"
    );
    result
}
