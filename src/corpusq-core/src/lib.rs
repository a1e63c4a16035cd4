//! corpusq-core: Core library for corpusq corpus exploration
//!
//! This crate turns a raw table of literary metadata (titles, authors,
//! magazines, publication dates, status flags) into an immutable canonical
//! [`Dataset`], whatever the source columns happen to be called. Filters and
//! queries in the sibling crates operate on borrowed [`FilteredView`]s of it
//! and answer with a uniform [`QueryResult`].
//!
//! # Features
//!
//! - **Schema Resolution**: Synonym-tolerant, case-insensitive column binding
//! - **Lenient Cleaning**: Bad dates and flags become nulls, never errors
//! - **CSV Ingestion**: `Polars` reader bridged into raw cells
//! - **Load Cache**: Resolved datasets memoized per file in an LRU cache
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use corpusq_core::{io, ColumnHints, CanonicalField};
//!
//! let resolution = io::load_dataset("corpus.csv", &io::CsvOptions::default(), &ColumnHints::default())?;
//! for warning in &resolution.report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//!
//! let dataset = resolution.dataset;
//! let dated = dataset.view().retain(|r| r.year().is_some());
//! println!("{} of {} records carry a date", dated.len(), dataset.len());
//! # Ok::<(), corpusq_core::Error>(())
//! ```
//!
//! # Architecture
//!
//! - [`field`] - Canonical fields and the synonym table
//! - [`raw`] - Raw tables handed over by ingestion
//! - [`schema`] - The resolver and its report
//! - [`dataset`] - Records, datasets and filtered views
//! - [`date`] - Lenient date parsing
//! - [`result`] - Scalar and table results
//! - [`io`] - CSV reading and the load cache
//! - [`error`] - Error handling and result types

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::cast_precision_loss
)]

pub use corpusq_shared::{Value, VERSION};

/// Error types and handling
pub mod error;

pub mod dataset;
pub mod date;
pub mod field;
pub mod io;
pub mod raw;
pub mod result;
pub mod schema;

pub use crate::error::{Error, Result};

pub use dataset::{Dataset, FilteredView, Record, ViewSummary};
pub use field::{CanonicalField, ColumnHints};
pub use io::{load_dataset, read_csv, CsvOptions, DatasetCache};
pub use raw::RawTable;
pub use result::{FormatHint, QueryResult, Scalar, Shape, Table};
pub use schema::{resolve, Resolution, ResolutionReport, ResolutionWarning};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        resolve, CanonicalField, ColumnHints, Dataset, Error, FilteredView, QueryResult,
        RawTable, Record, Result, Scalar, Shape, Table, Value,
    };
}
