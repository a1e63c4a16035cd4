//! Built-in query catalog, one module per section
//!
//! Every query here is a plain function over a view and its parameters,
//! submitted to the registry with `inventory::submit!`.

pub mod author_overview;
pub mod authors;
pub mod dashboard;
pub mod metadata;
pub mod publishing;
pub mod quality;
pub mod status;
pub mod time;
pub mod types;

use corpusq_core::{Error, QueryResult, Result, Scalar, Shape};

/// Label result of an argmax, or the no-data error for the query
pub(crate) fn label_or_empty(key: &str, label: Option<&str>) -> Result<QueryResult> {
    label
        .map(|l| Scalar::label(l).into_result())
        .ok_or_else(|| Error::empty_selection(key))
}

/// Year result of an argmax or extremum, or the no-data error for the query
pub(crate) fn year_or_empty(key: &str, year: Option<i32>) -> Result<QueryResult> {
    year.map(|y| Scalar::year(y).into_result())
        .ok_or_else(|| Error::empty_selection(key))
}
