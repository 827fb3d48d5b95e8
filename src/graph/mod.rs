//! Reference graph between source documents.
//!
//! [`analyze_dependencies`] builds a fresh [`DependencyGraph`] from the
//! documents' imports and reports every cycle found by a depth-first walk.
//! Nothing is kept between calls.
//!
//! [`impact`] and [`imports`] answer narrower questions over the same
//! document fields: who is affected by changing a type, and which imports
//! of a document can go.

pub mod builder;
pub mod cycles;
pub mod impact;
pub mod imports;

pub use builder::{build_graph, ResolutionTable};
pub use cycles::find_cycles;
pub use impact::{analyze_type_change_impact, ImpactAnalysisResult, ImpactReason};
pub use imports::{optimize_imports, ImportOptimization};

use crate::index::types::{DocPath, SourceDocument};
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::debug;

/// A closed path of documents; the last one references the first
pub type Cycle = Vec<DocPath>;

/// Directed adjacency mapping: document -> documents it references
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: BTreeMap<DocPath, BTreeSet<DocPath>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, path: &str) {
        if !self.edges.contains_key(path) {
            self.edges.insert(path.to_string(), BTreeSet::new());
        }
    }

    /// Add an edge, creating both endpoints as nodes
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.add_node(to);
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    /// Nodes in path order
    pub fn nodes(&self) -> impl Iterator<Item = &DocPath> {
        self.edges.keys()
    }

    /// Documents referenced by `path`; empty for unknown nodes
    pub fn neighbors(&self, path: &str) -> std::collections::btree_set::Iter<'_, DocPath> {
        static EMPTY: BTreeSet<DocPath> = BTreeSet::new();
        self.edges.get(path).unwrap_or(&EMPTY).iter()
    }

    /// Documents referencing `path`
    pub fn dependents(&self, path: &str) -> BTreeSet<DocPath> {
        self.edges
            .iter()
            .filter(|(_, targets)| targets.contains(path))
            .map(|(source, _)| source.clone())
            .collect()
    }

    pub fn contains_node(&self, path: &str) -> bool {
        self.edges.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn as_map(&self) -> &BTreeMap<DocPath, BTreeSet<DocPath>> {
        &self.edges
    }
}

/// Outcome of a dependency analysis
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyAnalysisResult {
    graph: DependencyGraph,
    cycles: BTreeSet<Cycle>,
}

impl DependencyAnalysisResult {
    pub fn new(graph: DependencyGraph, cycles: BTreeSet<Cycle>) -> Self {
        Self { graph, cycles }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn dependency_map(&self) -> &BTreeMap<DocPath, BTreeSet<DocPath>> {
        self.graph.as_map()
    }

    /// Distinct cycles, each as an ordered list of paths
    pub fn cycles(&self) -> &BTreeSet<Cycle> {
        &self.cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn dependencies_of(&self, path: &str) -> Vec<&DocPath> {
        self.graph.neighbors(path).collect()
    }

    pub fn dependents_of(&self, path: &str) -> BTreeSet<DocPath> {
        self.graph.dependents(path)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Build the reference graph of `documents` and detect its cycles
pub fn analyze_dependencies<D>(documents: &[D]) -> DependencyAnalysisResult
where
    D: Borrow<SourceDocument>,
{
    let start = Instant::now();
    debug!(documents = documents.len(), "analyzing dependencies");

    let graph = build_graph(documents);
    let cycles = find_cycles(&graph);

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        cycles = cycles.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "dependency analysis completed"
    );
    DependencyAnalysisResult::new(graph, cycles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_creates_nodes() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("A", "B");
        assert!(graph.contains_node("A"));
        assert!(graph.contains_node("B"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors("B").count(), 0);
        assert_eq!(graph.neighbors("missing").count(), 0);
    }

    #[test]
    fn test_dependents() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("A", "C");
        graph.add_edge("B", "C");
        graph.add_node("D");
        let dependents: Vec<_> = graph.dependents("C").into_iter().collect();
        assert_eq!(dependents, vec!["A", "B"]);
        assert!(graph.dependents("D").is_empty());
    }

    #[test]
    fn test_serializes_as_map() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("A", "B");
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(json, r#"{"A":["B"],"B":[]}"#);
    }
}
