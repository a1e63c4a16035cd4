//! Active/inactive status questions
//!
//! A record with no status is neither active nor inactive.

use corpusq_core::{CanonicalField, FilteredView, QueryResult, Result, Shape, Table, Value};

use crate::aggregate::{all_with_status, count_where};
use crate::params::QueryParams;
use crate::registry::{QueryRegistration, Section};

fn single_column(label: &str, keys: Vec<&str>) -> Result<QueryResult> {
    let mut table = Table::new([label]);
    for key in keys {
        table.push_row(vec![Value::from(key)])?;
    }
    Ok(table.into_result())
}

/// Records whose status is true
pub fn active_count(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    Ok(count_where(view, |r| r.status() == Some(true)).into_result())
}

/// Records whose status is false
pub fn inactive_count(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    Ok(count_where(view, |r| r.status() == Some(false)).into_result())
}

/// Authors whose every record is inactive
pub fn authors_all_inactive(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    single_column("Author", all_with_status(view, CanonicalField::Author, false))
}

/// Magazines whose every record is active. A null status disqualifies.
pub fn magazines_all_active(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    single_column("Magazine", all_with_status(view, CanonicalField::Magazine, true))
}

inventory::submit! {
    QueryRegistration {
        key: "active_count",
        question: "How many active records are there?",
        section: Section::Status,
        rank: 1,
        params: &[],
        func: active_count,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "inactive_count",
        question: "How many inactive records are there?",
        section: Section::Status,
        rank: 2,
        params: &[],
        func: inactive_count,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "authors_all_inactive",
        question: "Which authors have inactive works only?",
        section: Section::Status,
        rank: 3,
        params: &[],
        func: authors_all_inactive,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "magazines_all_active",
        question: "Which magazines have only active works?",
        section: Section::Status,
        rank: 4,
        params: &[],
        func: magazines_all_active,
    }
}
