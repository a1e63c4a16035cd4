//! Per-author drill-down
//!
//! These queries are meant to run on a view already narrowed to one author
//! with `FilterSpec::default().author(..)`; on a wider view they aggregate
//! over every author in it.

use corpusq_core::{CanonicalField, FilteredView, QueryResult, Record, Result, Shape, Table, Value};
use itertools::Itertools;

use crate::aggregate::{count_by, distinct, distinct_by_group, texts, top_n};
use crate::params::QueryParams;
use crate::registry::{QueryRegistration, Section};

const LISTING: [CanonicalField; 5] = [
    CanonicalField::Title,
    CanonicalField::PublishedDate,
    CanonicalField::Magazine,
    CanonicalField::Status,
    CanonicalField::Link,
];

const TIMELINE: [CanonicalField; 5] = [
    CanonicalField::PublishedDate,
    CanonicalField::Title,
    CanonicalField::Magazine,
    CanonicalField::Type,
    CanonicalField::Status,
];

fn project<'a, I>(records: I, fields: &[CanonicalField]) -> Result<Table>
where
    I: Iterator<Item = &'a Record>,
{
    let mut table = Table::new(fields.iter().map(|f| f.label()));
    for record in records {
        table.push_row(fields.iter().map(|&f| record.get(f)).collect())?;
    }
    Ok(table)
}

/// Total, unique and duplicate title counts per author, in first-seen order
pub fn title_summary(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let pairs = || view.iter().filter_map(|r| r.author().zip(r.title()));
    let totals = count_by(pairs().map(|(author, _)| author));
    let unique = distinct_by_group(pairs());

    let mut table = Table::new(["Author", "Total Titles", "Unique Titles", "Duplicate Titles"]);
    for (author, total) in totals {
        let distinct_titles = unique.get(author).map_or(0, |titles| titles.len());
        table.push_row(vec![
            Value::from(author),
            Value::from(total),
            Value::from(distinct_titles),
            Value::from(total - distinct_titles),
        ])?;
    }
    Ok(table.into_result())
}

/// Extra occurrences of repeated titles
pub fn duplicate_entries(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let total = texts(view, CanonicalField::Title).count();
    Ok((total - distinct(texts(view, CanonicalField::Title))).into_result())
}

/// Titles occurring more than once, most repeated first
pub fn duplicate_titles_by_count(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let mut counts = count_by(texts(view, CanonicalField::Title));
    counts.retain(|_, n| *n > 1);
    Ok(Table::from_counts("Title", "Count", top_n(counts, None)).into_result())
}

/// Title, date, magazine, status and link of every record in the view
pub fn titles_listing(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    Ok(project(view.iter(), &LISTING)?.into_result())
}

/// Distinct titles per publication year, oldest first
pub fn unique_titles_by_year(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let groups = distinct_by_group(view.iter().filter_map(|r| r.year().zip(r.title())));
    let rows = groups
        .into_iter()
        .map(|(year, titles)| (year, titles.len()))
        .sorted_by_key(|(year, _)| *year);
    Ok(Table::from_counts("Year", "Unique Titles", rows).into_result())
}

pub fn type_breakdown(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(texts(view, CanonicalField::Type));
    Ok(Table::from_counts("Type", "Count", top_n(counts, None)).into_result())
}

/// Dated records only, in view order
pub fn publication_timeline(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let dated = view.iter().filter(|r| r.published().is_some());
    Ok(project(dated, &TIMELINE)?.into_result())
}

inventory::submit! {
    QueryRegistration {
        key: "title_summary",
        question: "Title summary per author",
        section: Section::AuthorOverview,
        rank: 1,
        params: &[],
        func: title_summary,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "duplicate_entries",
        question: "Duplicate entries where the same title appears multiple times",
        section: Section::AuthorOverview,
        rank: 2,
        params: &[],
        func: duplicate_entries,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "duplicate_titles_by_count",
        question: "Duplicate titles by count",
        section: Section::AuthorOverview,
        rank: 3,
        params: &[],
        func: duplicate_titles_by_count,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "titles_listing",
        question: "Titles by author",
        section: Section::AuthorOverview,
        rank: 4,
        params: &[],
        func: titles_listing,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "unique_titles_by_year",
        question: "Unique titles published per year",
        section: Section::AuthorOverview,
        rank: 5,
        params: &[],
        func: unique_titles_by_year,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "type_breakdown",
        question: "Type-wise breakdown (total entries)",
        section: Section::AuthorOverview,
        rank: 6,
        params: &[],
        func: type_breakdown,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "publication_timeline",
        question: "Publication timeline",
        section: Section::AuthorOverview,
        rank: 7,
        params: &[],
        func: publication_timeline,
    }
}
