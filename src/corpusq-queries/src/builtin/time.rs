//! Publication year questions over dated records

use corpusq_core::{FilteredView, QueryResult, Result, Shape, Table};
use itertools::Itertools;

use crate::aggregate::{count_by, count_where, mode};
use crate::builtin::year_or_empty;
use crate::params::{ParamDefault, QueryParams};
use crate::registry::{QueryRegistration, Section};

fn years<'a>(view: &'a FilteredView<'a>) -> impl Iterator<Item = i32> + 'a {
    view.iter().filter_map(|r| r.year())
}

/// Most recent publication year
pub fn latest_year(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    year_or_empty("latest_year", years(view).max())
}

/// Oldest publication year
pub fn earliest_year(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    year_or_empty("earliest_year", years(view).min())
}

/// Records dated strictly after `after_year`
pub fn works_after_2000(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    let after = params.year("after_year")?;
    Ok(count_where(view, |r| r.year().is_some_and(|y| y > after)).into_result())
}

/// Record counts per decade, oldest decade first
pub fn publications_per_decade(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(view.iter().filter_map(|r| r.decade()));
    let rows = counts.into_iter().sorted_by_key(|(decade, _)| *decade);
    Ok(Table::from_counts("Decade", "Count", rows).into_result())
}

/// Year with the most records. Ties go to the year seen first.
pub fn busiest_year(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    year_or_empty("busiest_year", mode(years(view)))
}

inventory::submit! {
    QueryRegistration {
        key: "latest_year",
        question: "What is the most recent publication year?",
        section: Section::Time,
        rank: 1,
        params: &[],
        func: latest_year,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "earliest_year",
        question: "What is the earliest publication year?",
        section: Section::Time,
        rank: 2,
        params: &[],
        func: earliest_year,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "works_after_2000",
        question: "How many works were published after 2000?",
        section: Section::Time,
        rank: 3,
        params: &[("after_year", ParamDefault::Int(2000))],
        func: works_after_2000,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "publications_per_decade",
        question: "How many publications per decade?",
        section: Section::Time,
        rank: 4,
        params: &[],
        func: publications_per_decade,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "busiest_year",
        question: "Which year had the highest number of publications?",
        section: Section::Time,
        rank: 5,
        params: &[],
        func: busiest_year,
    }
}
