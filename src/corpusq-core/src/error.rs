//! Error types for corpusq-core
//!
//! Per-record problems never surface here: the resolver degrades bad cells to
//! nulls and reports them through [`crate::schema::ResolutionWarning`]. The
//! variants below are the conditions a caller has to handle.

use std::borrow::Cow;

use crate::field::CanonicalField;

/// Result type alias for corpusq operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for corpusq operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Mandatory identifying columns could not be matched to any source column
    #[error(
        "Missing required column(s): {}. Found columns: {}",
        join_fields(.missing),
        .available.join(", ")
    )]
    MissingColumns {
        /// Canonical fields that could not be resolved
        missing: Vec<CanonicalField>,
        /// Source column names that were present
        available: Vec<String>,
    },

    /// An argmax-style query was evaluated over a view with no usable values
    #[error("No data available for '{query}' in the current selection")]
    EmptySelection {
        /// Key of the query that found no data
        query: String,
    },

    /// A query key that is not in the registry
    #[error("Unknown query: {0}")]
    UnknownQuery(String),

    /// A query parameter that the query does not declare, or a bad value
    #[error("Invalid parameter '{param}' for query '{query}': {reason}")]
    InvalidParameter {
        /// Query key
        query: String,
        /// Parameter name
        param: String,
        /// What was wrong with it
        reason: String,
    },

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars errors raised while ingesting a CSV file
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// General operation errors
    #[error("Operation error: {0}")]
    Operation(Cow<'static, str>),
}

fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create an operation error with a custom message
    pub fn operation(msg: impl Into<Cow<'static, str>>) -> Self {
        Error::Operation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create the "no data" error for a query
    pub fn empty_selection(query: impl Into<String>) -> Self {
        Error::EmptySelection {
            query: query.into(),
        }
    }

    /// Whether this error only means "nothing to report" for the current view
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Error::EmptySelection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = Error::MissingColumns {
            missing: vec![CanonicalField::Title, CanonicalField::Author],
            available: vec!["ID".to_string(), "Name".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required column(s): Title, Author. Found columns: ID, Name"
        );
    }

    #[test]
    fn test_empty_selection() {
        let err = Error::empty_selection("busiest_year");
        assert!(err.is_no_data());
        assert!(err.to_string().contains("busiest_year"));
        assert!(!Error::UnknownQuery("x".into()).is_no_data());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
