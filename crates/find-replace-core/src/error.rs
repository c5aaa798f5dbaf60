//! Error types for query construction.

use thiserror::Error;

/// Errors produced while building search queries.
///
/// "No match" is never an error; it is reported as an empty [`TextRange`](crate::TextRange).
#[derive(Debug, Error)]
pub enum SearchError {
    /// A regular expression failed to compile.
    #[error("Error in regular expression: {source}")]
    InvalidPattern {
        /// The pattern source as given by the caller.
        pattern: String,
        /// The underlying compiler diagnostic.
        #[source]
        source: regex::Error,
    },
}

impl SearchError {
    /// The regex engine's diagnostic message.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidPattern { source, .. } => source.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SearchError>;
