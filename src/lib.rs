//! # srcidx - In-memory source index
//!
//! srcidx keeps a multi-field inverted index over already-parsed source
//! files and finds circular references between them. It answers "which files
//! mention X", "which files declare type Y" and "do these files import each
//! other in a cycle" without rescanning raw text per query.
//!
//! ## Architecture
//!
//! - [`utils`] - Tokenizer shared by indexing and queries
//! - [`index`] - Field indexes, document cache and the [`SearchIndex`] facade
//! - [`query`] - Structured content queries, query-string parsing, execution
//! - [`graph`] - Import graph, cycle detection, type change impact and
//!   import clean-up
//! - [`output`] - Terminal formatting for the `srcidx` binary
//!
//! ## Quick Start
//!
//! ```
//! use srcidx::{ContentQuery, SearchIndex, SourceDocument};
//!
//! let index = SearchIndex::new();
//! index.index_file(
//!     SourceDocument::new("A.java", "class A uses Logger").with_package("com.x"),
//! );
//! index.index_file(
//!     SourceDocument::new("B.java", "class B uses Logger").with_package("com.y"),
//! );
//!
//! assert_eq!(index.search_content("logger", false, false).len(), 2);
//!
//! let query = ContentQuery::new("Logger").include_package("com.x");
//! let hits = index.search(&query).unwrap();
//! assert_eq!(hits[0].path, "A.java");
//! ```
//!
//! ## Concurrency
//!
//! Every field index is a `DashMap` of `DashSet`s, so a shared
//! `Arc<SearchIndex>` can be written and queried from many threads without a
//! global lock. Readers may observe a document that is only partly indexed.

pub mod error;
pub mod graph;
pub mod index;
pub mod output;
pub mod query;
pub mod utils;

pub use error::QueryError;
pub use graph::{
    analyze_dependencies, analyze_type_change_impact, optimize_imports, DependencyAnalysisResult,
    DependencyGraph, ImpactAnalysisResult, ImportOptimization,
};
pub use index::{IndexConfig, IndexStatistics, SearchIndex, SourceDocument};
pub use query::{parse_query, ContentQuery};
