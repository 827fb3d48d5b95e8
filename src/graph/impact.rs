//! Documents affected by a change to one type.

use crate::index::types::{DocPath, SourceDocument};
use crate::utils::token_slices;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Why a document is affected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImpactReason {
    /// One of its imports names the type
    Import { import: String },
    /// Its content mentions the simple name without importing it, as
    /// same-package code does
    Reference,
}

impl fmt::Display for ImpactReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactReason::Import { import } => write!(f, "import {}", import),
            ImpactReason::Reference => write!(f, "reference"),
        }
    }
}

/// Impacted documents of a type change, keyed by path
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImpactAnalysisResult {
    changed_type: String,
    impacted: BTreeMap<DocPath, ImpactReason>,
}

impl ImpactAnalysisResult {
    pub fn changed_type(&self) -> &str {
        &self.changed_type
    }

    pub fn impacted(&self) -> &BTreeMap<DocPath, ImpactReason> {
        &self.impacted
    }

    pub fn reason(&self, path: &str) -> Option<&ImpactReason> {
        self.impacted.get(path)
    }

    pub fn len(&self) -> usize {
        self.impacted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impacted.is_empty()
    }
}

/// Whether `import` names `type_name` (simple or qualified).
///
/// Matches whole dotted segments, so `List` does not match
/// `java.util.ArrayList`. A member import such as `com.x.Util.max` also
/// names `Util`.
pub fn import_names_type(import: &str, type_name: &str) -> bool {
    let target = import.strip_suffix(".*").unwrap_or(import);
    if target == type_name {
        return true;
    }
    let segments: Vec<&str> = target.split('.').collect();
    let wanted: Vec<&str> = type_name.split('.').collect();
    segments
        .windows(wanted.len())
        .enumerate()
        .any(|(start, window)| {
            window == wanted.as_slice()
                // a qualified name must start at the root of the import
                && (wanted.len() == 1 || start == 0)
        })
}

/// Find the documents that would be affected by changing `type_name`.
///
/// Documents declaring the type are only reported when they import it.
pub fn analyze_type_change_impact<D>(documents: &[D], type_name: &str) -> ImpactAnalysisResult
where
    D: Borrow<SourceDocument>,
{
    let type_name = type_name.trim();
    let mut result = ImpactAnalysisResult {
        changed_type: type_name.to_string(),
        impacted: BTreeMap::new(),
    };
    if type_name.is_empty() {
        return result;
    }

    let simple = type_name.rsplit('.').next().unwrap_or(type_name);

    for doc in documents {
        let doc = doc.borrow();
        if doc.path.is_empty() {
            continue;
        }

        if let Some(import) = doc.imports.iter().find(|i| import_names_type(i, type_name)) {
            result.impacted.insert(
                doc.path.clone(),
                ImpactReason::Import {
                    import: import.clone(),
                },
            );
            continue;
        }

        let declares = doc.types.iter().any(|t| t == simple);
        if !declares && token_slices(&doc.content).any(|t| t == simple) {
            result
                .impacted
                .insert(doc.path.clone(), ImpactReason::Reference);
        }
    }

    debug!(
        changed_type = type_name,
        impacted = result.impacted.len(),
        "type change impact analyzed"
    );
    result
}
