//! corpusq: filter and question literary corpus metadata
//!
//! This crate bundles the corpusq libraries behind one dependency. A CSV
//! catalog is resolved into a canonical [`Dataset`], narrowed with a
//! [`FilterSpec`], and questioned through the [`QueryRegistry`].
//!
//! ```rust,ignore
//! use corpusq::{load_dataset, ColumnHints, CsvOptions, FilterSpec, QueryRegistry};
//!
//! let resolution = load_dataset("catalog.csv", &CsvOptions::default(), &ColumnHints::default())?;
//! let view = FilterSpec::default().year_range(1990, 1999).apply(&resolution.dataset);
//! let answer = QueryRegistry::new().evaluate("top_magazines", &view)?;
//! ```
//!
//! The member crates are re-exported whole for anything not lifted here.

pub use corpusq_core;
pub use corpusq_filter;
pub use corpusq_queries;
pub use corpusq_shared;

pub use corpusq_core::{
    load_dataset, resolve, CanonicalField, ColumnHints, CsvOptions, Dataset, DatasetCache, Error,
    FilteredView, QueryResult, RawTable, Record, Resolution, Result, Scalar, Table, Value,
};
pub use corpusq_filter::{Facets, FilterSpec, Predicate};
pub use corpusq_queries::{QueryParams, QueryRegistry, Section};
