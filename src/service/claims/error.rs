//! Error types for claim extraction

use thiserror::Error;

/// A vocabulary table produced a pattern that does not compile
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    #[error("Invalid {table} pattern: {source}")]
    Invalid {
        table: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Vocabulary table {0} is empty")]
    EmptyTable(&'static str),
}
