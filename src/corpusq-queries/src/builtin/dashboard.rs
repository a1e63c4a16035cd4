//! Dashboard metrics and chart series

use corpusq_core::{CanonicalField, FilteredView, QueryResult, Result, Shape, Table, Value};
use itertools::Itertools;

use crate::aggregate::{count_by, count_where, distinct, texts, top_n};
use crate::params::QueryParams;
use crate::registry::{QueryRegistration, Section};

/// Headline metrics of a view
pub fn overview(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let metrics = [
        ("Total Records", view.len()),
        ("Unique Authors", distinct(texts(view, CanonicalField::Author))),
        (
            "Unique Publishers",
            distinct(texts(view, CanonicalField::Publisher)),
        ),
        ("Active Status", count_where(view, |r| r.status() == Some(true))),
    ];
    Ok(Table::from_counts("Metric", "Value", metrics).into_result())
}

/// Record counts per year, oldest first
pub fn publications_by_year(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(view.iter().filter_map(|r| r.year()));
    let rows = counts.into_iter().sorted_by_key(|(year, _)| *year);
    Ok(Table::from_counts("Year", "Count", rows).into_result())
}

/// Record counts per (year, month), in calendar order
pub fn publications_by_month(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(view.iter().filter_map(|r| r.year().zip(r.month())));
    let mut table = Table::new(["Year", "Month", "Count"]);
    for ((year, month), n) in counts.into_iter().sorted_by_key(|(key, _)| *key) {
        table.push_row(vec![Value::from(year), Value::from(month), Value::from(n)])?;
    }
    Ok(table.into_result())
}

/// Ten most frequent types, for the distribution chart
pub fn type_distribution(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(texts(view, CanonicalField::Type));
    Ok(Table::from_counts("Type", "Count", top_n(counts, Some(10))).into_result())
}

pub fn publisher_distribution(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(texts(view, CanonicalField::Publisher));
    Ok(Table::from_counts("Publisher", "Count", top_n(counts, Some(8))).into_result())
}

/// Fifteen most frequent authors
pub fn prolific_authors(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(texts(view, CanonicalField::Author));
    Ok(Table::from_counts("Author", "Count", top_n(counts, Some(15))).into_result())
}

inventory::submit! {
    QueryRegistration {
        key: "overview",
        question: "Dataset overview",
        section: Section::Dashboard,
        rank: 1,
        params: &[],
        func: overview,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "publications_by_year",
        question: "Publications by year",
        section: Section::Dashboard,
        rank: 2,
        params: &[],
        func: publications_by_year,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "publications_by_month",
        question: "Monthly publication trends",
        section: Section::Dashboard,
        rank: 3,
        params: &[],
        func: publications_by_month,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "type_distribution",
        question: "Distribution by content type (top 10)",
        section: Section::Dashboard,
        rank: 4,
        params: &[],
        func: type_distribution,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "publisher_distribution",
        question: "Distribution by publisher (top 8)",
        section: Section::Dashboard,
        rank: 5,
        params: &[],
        func: publisher_distribution,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "prolific_authors",
        question: "Top 15 most prolific authors",
        section: Section::Dashboard,
        rank: 6,
        params: &[],
        func: prolific_authors,
    }
}
