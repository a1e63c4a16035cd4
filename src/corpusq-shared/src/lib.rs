//! corpusq-shared: Shared types and utilities for corpusq crates
//!
//! This crate contains the cell value type, the common `Result` alias and
//! small helpers used by the resolver, the filter engine, the query registry
//! and the command-line front end.
//!
//! # Features
//!
//! - **Common Result Type**: Standardized Result type alias
//! - **Error Utilities**: Common error constructors for the binary layer
//! - **Cell Values**: The [`value::Value`] type every dataset cell is held in

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown,
    clippy::uninlined_format_args
)]

/// Result type alias for corpusq front-end operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common error handling utilities
pub mod error {
    /// Create a generic operation error
    pub fn operation_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Operation error: {}", msg.into())
    }

    /// Create a configuration error
    pub fn config_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Configuration error: {}", msg.into())
    }
}

/// Cell value type for dataset records
pub mod value;

pub use value::Value;

/// Common utility functions
pub mod utils {
    /// Check if a string is empty or whitespace-only
    #[must_use]
    pub fn is_blank(s: &str) -> bool {
        s.trim().is_empty()
    }

    /// Case-insensitive substring test.
    ///
    /// Scripts without letter case (Telugu, for one) compare byte-for-byte.
    #[must_use]
    pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Normalize a column name for synonym matching
    #[must_use]
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }
}

/// Common constants
pub mod constants {
    /// Number of most frequent authors offered by the author facet
    pub const AUTHOR_FACET_SIZE: usize = 50;

    /// Default size of the positional preview window
    pub const DEFAULT_PREVIEW_ROWS: usize = 1000;

    /// Default number of resolved datasets kept by the load cache
    pub const DEFAULT_CACHE_SIZE: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_error_functions() {
        let err = error::operation_error("test message");
        assert!(err.to_string().contains("Operation error: test message"));

        let err = error::config_error("config issue");
        assert!(err
            .to_string()
            .contains("Configuration error: config issue"));
    }

    #[test]
    fn test_utils_is_blank() {
        assert!(utils::is_blank(""));
        assert!(utils::is_blank("   "));
        assert!(utils::is_blank("\t\n"));
        assert!(!utils::is_blank(" hello "));
        assert!(!utils::is_blank("0"));
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(utils::contains_ignore_case("The Old Man", "old"));
        assert!(utils::contains_ignore_case("The Old Man", "THE"));
        assert!(utils::contains_ignore_case("anything", ""));
        assert!(!utils::contains_ignore_case("poem", "story"));
        assert!(utils::contains_ignore_case("కవితలు", "కవిత"));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(utils::normalize_name("  Published Date "), "published date");
        assert_eq!(utils::normalize_name("STATUS"), "status");
    }
}
