//! Error types for query execution.
//!
//! Lookups never fail: unknown keys and empty input produce empty results.
//! The only reportable failure is a regex query whose pattern does not
//! compile, which must not be confused with "no matches".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid regex pattern `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;
