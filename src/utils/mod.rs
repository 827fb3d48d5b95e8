//! Utility functions shared by the index and query engine.
//!
//! ## Modules
//!
//! - [`tokenizer`] - Identifier-style token extraction
//!
//! ```
//! use srcidx::utils::tokenize;
//!
//! let tokens = tokenize("Logger.getLogger(Main.class)", false);
//! assert!(tokens.contains("getlogger"));
//! assert!(tokens.contains("class"));
//! ```

pub mod tokenizer;

pub use tokenizer::*;
