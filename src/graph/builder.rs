use crate::graph::DependencyGraph;
use crate::index::types::{DocPath, SourceDocument};
use rustc_hash::FxHashMap;
use std::borrow::Borrow;

/// Type name -> declaring document.
///
/// Both the simple and the package-qualified name of every declared type
/// are registered. When two documents declare the same name the later one
/// wins, so same-named types in different packages can resolve to the wrong
/// document.
#[derive(Debug, Default)]
pub struct ResolutionTable {
    names: FxHashMap<String, DocPath>,
}

impl ResolutionTable {
    pub fn build<D>(documents: &[D]) -> Self
    where
        D: Borrow<SourceDocument>,
    {
        let mut names = FxHashMap::default();
        for doc in documents {
            let doc = doc.borrow();
            if doc.path.is_empty() {
                continue;
            }
            for type_name in doc.types.iter().filter(|t| !t.is_empty()) {
                names.insert(doc.qualified_name(type_name), doc.path.clone());
                names.insert(type_name.clone(), doc.path.clone());
            }
        }
        Self { names }
    }

    pub fn resolve(&self, name: &str) -> Option<&DocPath> {
        self.names.get(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Strip a trailing wildcard: `com.x.*` -> `com.x`
fn import_target(import: &str) -> &str {
    import.strip_suffix(".*").unwrap_or(import)
}

/// Build the import graph of `documents`.
///
/// Every document with a path becomes a node; an import that resolves to a
/// declared type adds an edge to the declaring document.
pub fn build_graph<D>(documents: &[D]) -> DependencyGraph
where
    D: Borrow<SourceDocument>,
{
    let table = ResolutionTable::build(documents);
    let mut graph = DependencyGraph::new();

    for doc in documents {
        let doc = doc.borrow();
        if doc.path.is_empty() {
            continue;
        }
        graph.add_node(&doc.path);

        for import in &doc.imports {
            if let Some(target) = table.resolve(import_target(import)) {
                graph.add_edge(&doc.path, target);
            }
        }
    }

    graph
}
