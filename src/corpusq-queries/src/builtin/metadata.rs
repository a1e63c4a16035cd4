//! Volume and link metadata

use corpusq_core::{CanonicalField, FilteredView, QueryResult, Result, Shape};

use crate::aggregate::{count_where, mode, texts};
use crate::builtin::label_or_empty;
use crate::params::{ParamDefault, QueryParams};
use crate::registry::{QueryRegistration, Section};

pub fn most_frequent_volume(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    label_or_empty("most_frequent_volume", mode(texts(view, CanonicalField::Volume)))
}

/// Records whose link starts with `link_prefix`
pub fn working_links(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    let prefix = params.text("link_prefix")?;
    Ok(count_where(view, |r| r.link().is_some_and(|l| l.starts_with(prefix))).into_result())
}

/// Author with the most linked records
pub fn most_linked_author(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let authors = view
        .iter()
        .filter(|r| r.link().is_some())
        .filter_map(|r| r.author());
    label_or_empty("most_linked_author", mode(authors))
}

inventory::submit! {
    QueryRegistration {
        key: "most_frequent_volume",
        question: "Which volume appears most often?",
        section: Section::Metadata,
        rank: 1,
        params: &[],
        func: most_frequent_volume,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "working_links",
        question: "How many records have working links?",
        section: Section::Metadata,
        rank: 2,
        params: &[("link_prefix", ParamDefault::Text("http"))],
        func: working_links,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "most_linked_author",
        question: "Which author has most linked documents?",
        section: Section::Metadata,
        rank: 3,
        params: &[],
        func: most_linked_author,
    }
}
