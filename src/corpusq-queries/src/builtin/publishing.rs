//! Magazine and publisher questions

use corpusq_core::{CanonicalField, FilteredView, QueryResult, Result, Shape, Table};

use crate::aggregate::{ascending, count_by, distinct, mode, texts, top_n};
use crate::builtin::label_or_empty;
use crate::params::{ParamDefault, QueryParams};
use crate::registry::{QueryRegistration, Section};

/// Number of distinct magazines
pub fn magazine_count(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    Ok(distinct(texts(view, CanonicalField::Magazine)).into_result())
}

pub fn top_publishers(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(texts(view, CanonicalField::Publisher));
    Ok(Table::from_counts("Publisher", "Count", top_n(counts, Some(10))).into_result())
}

/// Ten magazines with the most records
pub fn top_magazines(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(texts(view, CanonicalField::Magazine));
    Ok(Table::from_counts("Magazine", "Count", top_n(counts, Some(10))).into_result())
}

pub fn busiest_magazine(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    label_or_empty("busiest_magazine", mode(texts(view, CanonicalField::Magazine)))
}

/// Most frequent publisher among records dated after `after_year`
pub fn top_publisher_after_2000(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    let after = params.year("after_year")?;
    let publishers = view
        .iter()
        .filter(|r| r.year().is_some_and(|y| y > after))
        .filter_map(|r| r.publisher());
    label_or_empty("top_publisher_after_2000", mode(publishers))
}

/// Magazines with at least `min_count` records, lowest count first
pub fn magazines_ascending(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    let min = params.count("min_count")?;
    let counts = count_by(texts(view, CanonicalField::Magazine));
    Ok(Table::from_counts("Magazine", "Count", ascending(counts, min)).into_result())
}

/// Publishers with at least `min_count` records, lowest count first
pub fn publishers_ascending(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    let min = params.count("min_count")?;
    let counts = count_by(texts(view, CanonicalField::Publisher));
    Ok(Table::from_counts("Publisher", "Count", ascending(counts, min)).into_result())
}

inventory::submit! {
    QueryRegistration {
        key: "magazine_count",
        question: "How many magazines are there?",
        section: Section::Publishing,
        rank: 1,
        params: &[],
        func: magazine_count,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "top_publishers",
        question: "Top 10 publishers",
        section: Section::Publishing,
        rank: 2,
        params: &[],
        func: top_publishers,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "top_magazines",
        question: "Top 10 magazines by publication count",
        section: Section::Publishing,
        rank: 3,
        params: &[],
        func: top_magazines,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "busiest_magazine",
        question: "Which magazine has the most publications?",
        section: Section::Publishing,
        rank: 4,
        params: &[],
        func: busiest_magazine,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "top_publisher_after_2000",
        question: "Which publisher published most content after 2000?",
        section: Section::Publishing,
        rank: 5,
        params: &[("after_year", ParamDefault::Int(2000))],
        func: top_publisher_after_2000,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "magazines_ascending",
        question: "Magazines ranked from lowest to highest (min 2 records)",
        section: Section::Publishing,
        rank: 6,
        params: &[("min_count", ParamDefault::Int(2))],
        func: magazines_ascending,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "publishers_ascending",
        question: "Publishers ranked from lowest to highest (min 2 records)",
        section: Section::Publishing,
        rank: 7,
        params: &[("min_count", ParamDefault::Int(2))],
        func: publishers_ascending,
    }
}
