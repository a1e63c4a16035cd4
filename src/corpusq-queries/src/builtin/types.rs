//! Content type counts
//!
//! Poem and story queries match on a configurable marker substring of the
//! type label, so variants such as `కథానిక` count as stories.

use corpusq_core::{CanonicalField, FilteredView, QueryResult, Result, Shape, Table};

use crate::aggregate::{ascending, count_by, count_where, mode, texts, top_n};
use crate::builtin::label_or_empty;
use crate::params::{ParamDefault, QueryParams};
use crate::registry::{QueryRegistration, Section};

/// Most frequent type label
pub fn most_common_type(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    label_or_empty("most_common_type", mode(texts(view, CanonicalField::Type)))
}

/// Three most frequent type labels
pub fn top_types(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(texts(view, CanonicalField::Type));
    Ok(Table::from_counts("Type", "Count", top_n(counts, Some(3))).into_result())
}

fn count_marked(view: &FilteredView<'_>, marker: &str) -> usize {
    count_where(view, |r| r.kind().is_some_and(|k| k.contains(marker)))
}

/// Records whose type contains `poem_marker`
pub fn poem_count(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    Ok(count_marked(view, params.text("poem_marker")?).into_result())
}

/// Records whose type contains `story_marker`
pub fn story_count(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    Ok(count_marked(view, params.text("story_marker")?).into_result())
}

/// Stories dated strictly after `after_year`. Undated records never count.
pub fn stories_after_1990(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    let marker = params.text("story_marker")?;
    let after = params.year("after_year")?;
    let n = count_where(view, |r| {
        r.kind().is_some_and(|k| k.contains(marker)) && r.year().is_some_and(|y| y > after)
    });
    Ok(n.into_result())
}

pub fn types_ascending(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(texts(view, CanonicalField::Type));
    Ok(Table::from_counts("Type", "Count", ascending(counts, 0)).into_result())
}

inventory::submit! {
    QueryRegistration {
        key: "most_common_type",
        question: "Which content type is most common?",
        section: Section::Types,
        rank: 1,
        params: &[],
        func: most_common_type,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "top_types",
        question: "Top 3 content types and their counts",
        section: Section::Types,
        rank: 2,
        params: &[],
        func: top_types,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "poem_count",
        question: "How many poems are there?",
        section: Section::Types,
        rank: 3,
        params: &[("poem_marker", ParamDefault::Text("కవిత"))],
        func: poem_count,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "story_count",
        question: "How many stories are there?",
        section: Section::Types,
        rank: 4,
        params: &[("story_marker", ParamDefault::Text("కథ"))],
        func: story_count,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "stories_after_1990",
        question: "How many stories were published after 1990?",
        section: Section::Types,
        rank: 5,
        params: &[
            ("story_marker", ParamDefault::Text("కథ")),
            ("after_year", ParamDefault::Int(1990)),
        ],
        func: stories_after_1990,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "types_ascending",
        question: "Content types ranked from least to most common",
        section: Section::Types,
        rank: 6,
        params: &[],
        func: types_ascending,
    }
}
