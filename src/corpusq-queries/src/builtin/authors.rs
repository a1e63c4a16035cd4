//! Author rankings
//!
//! Counts are taken over non-null author names. The top-N tables break
//! ties by name.

use corpusq_core::{CanonicalField, FilteredView, QueryResult, Result, Shape, Table};

use crate::aggregate::{
    ascending, count_by, distinct_by_group, mode, ranked_first_seen, texts, top_n,
};
use crate::builtin::label_or_empty;
use crate::params::{ParamDefault, QueryParams};
use crate::registry::{QueryRegistration, Section};

/// Author with the most records
pub fn most_prolific_author(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    label_or_empty(
        "most_prolific_author",
        mode(texts(view, CanonicalField::Author)),
    )
}

/// Ten most frequent authors with their record counts
pub fn top_authors(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(texts(view, CanonicalField::Author));
    Ok(Table::from_counts("Author", "Count", top_n(counts, Some(10))).into_result())
}

/// Five authors with the most records whose type contains `poem_marker`
pub fn top_poets(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    let marker = params.text("poem_marker")?;
    let poets = view
        .iter()
        .filter(|r| r.kind().is_some_and(|k| k.contains(marker)))
        .filter_map(|r| r.author());
    Ok(Table::from_counts("Author", "Poems", top_n(count_by(poets), Some(5))).into_result())
}

/// Authors who appeared in more than `min_magazines` distinct magazines,
/// sorted by name
pub fn multi_magazine_authors(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    let min = params.count("min_magazines")?;
    let groups = distinct_by_group(view.iter().filter_map(|r| r.author().zip(r.magazine())));
    let mut rows: Vec<(&str, usize)> = groups
        .into_iter()
        .map(|(author, magazines)| (author, magazines.len()))
        .filter(|(_, n)| *n > min)
        .collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    Ok(Table::from_counts("Author", "Magazines", rows).into_result())
}

/// Every author by record count, highest first
pub fn authors_ranked(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let counts = count_by(texts(view, CanonicalField::Author));
    Ok(Table::from_counts("Author", "Count", top_n(counts, None)).into_result())
}

/// Distinct titles per author
pub fn authors_by_unique_titles(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let groups = distinct_by_group(view.iter().filter_map(|r| r.author().zip(r.title())));
    let unique = groups
        .into_iter()
        .map(|(author, titles)| (author, titles.len()))
        .collect();
    Ok(Table::from_counts("Author", "Unique Titles", ranked_first_seen(unique)).into_result())
}

/// Authors with at least `min_count` records, lowest count first
pub fn authors_ascending(view: &FilteredView<'_>, params: &QueryParams) -> Result<QueryResult> {
    let min = params.count("min_count")?;
    let counts = count_by(texts(view, CanonicalField::Author));
    Ok(Table::from_counts("Author", "Count", ascending(counts, min)).into_result())
}

inventory::submit! {
    QueryRegistration {
        key: "most_prolific_author",
        question: "Who wrote the most stories?",
        section: Section::Authors,
        rank: 1,
        params: &[],
        func: most_prolific_author,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "top_authors",
        question: "Top 10 authors by number of works",
        section: Section::Authors,
        rank: 2,
        params: &[],
        func: top_authors,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "top_poets",
        question: "Top 5 authors who published poems",
        section: Section::Authors,
        rank: 3,
        params: &[("poem_marker", ParamDefault::Text("కవిత"))],
        func: top_poets,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "multi_magazine_authors",
        question: "Which authors published in more than 5 magazines?",
        section: Section::Authors,
        rank: 4,
        params: &[("min_magazines", ParamDefault::Int(5))],
        func: multi_magazine_authors,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "authors_ranked",
        question: "Authors ranked by number of works",
        section: Section::Authors,
        rank: 5,
        params: &[],
        func: authors_ranked,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "authors_by_unique_titles",
        question: "Unique title counts by author",
        section: Section::Authors,
        rank: 6,
        params: &[],
        func: authors_by_unique_titles,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "authors_ascending",
        question: "Authors ranked from lowest to highest (min 2 works)",
        section: Section::Authors,
        rank: 7,
        params: &[("min_count", ParamDefault::Int(2))],
        func: authors_ascending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpusq_core::{resolve, ColumnHints, Dataset, RawTable, Value};
    use pretty_assertions::assert_eq;

    fn dataset(rows: &[(&str, &str, &str, &str)]) -> Dataset {
        let records = rows.iter().map(|(title, author, kind, magazine)| {
            vec![
                ("Title", Value::from(*title)),
                ("Author", Value::from(*author)),
                ("Type", Value::from(*kind)),
                ("Magazine", Value::from(*magazine)),
            ]
        });
        resolve(&RawTable::from_records(records), &ColumnHints::default())
            .unwrap()
            .dataset
    }

    fn params(defaults: &[(&str, ParamDefault)]) -> QueryParams {
        QueryParams::declared("test", defaults)
    }

    #[test]
    fn test_unique_titles_by_author() {
        let ds = dataset(&[
            ("X", "A", "", ""),
            ("X", "A", "", ""),
            ("Y", "A", "", ""),
            ("Z", "B", "", ""),
        ]);
        let result = authors_by_unique_titles(&ds.view(), &params(&[])).unwrap();
        let table = result.as_table().unwrap();
        assert_eq!(table.columns(), ["Author", "Unique Titles"]);
        assert_eq!(
            table.rows(),
            &[
                vec![Value::from("A"), Value::Int(2)],
                vec![Value::from("B"), Value::Int(1)]
            ]
        );
    }

    #[test]
    fn test_top_poets_uses_marker() {
        let ds = dataset(&[
            ("P1", "A", "కవిత", ""),
            ("P2", "B", "కవితలు", ""),
            ("S1", "C", "కథ", ""),
            ("P3", "B", "కవిత", ""),
        ]);
        let p = params(&[("poem_marker", ParamDefault::Text("కవిత"))]);
        let table = top_poets(&ds.view(), &p).unwrap();
        let table = table.as_table().unwrap();
        assert_eq!(
            table.rows(),
            &[
                vec![Value::from("B"), Value::Int(2)],
                vec![Value::from("A"), Value::Int(1)]
            ]
        );
    }

    #[test]
    fn test_multi_magazine_threshold() {
        let ds = dataset(&[
            ("a", "A", "", "M1"),
            ("b", "A", "", "M2"),
            ("c", "A", "", "M2"),
            ("d", "B", "", "M1"),
        ]);
        let p = params(&[("min_magazines", ParamDefault::Int(1))]);
        let table = multi_magazine_authors(&ds.view(), &p).unwrap();
        assert_eq!(
            table.as_table().unwrap().rows(),
            &[vec![Value::from("A"), Value::Int(2)]]
        );
    }

    #[test]
    fn test_most_prolific_empty_view() {
        let ds = dataset(&[("X", "A", "", "")]);
        let empty = FilteredView::from_indices(&ds, Vec::new());
        let err = most_prolific_author(&empty, &params(&[])).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_authors_ascending_min_count() {
        let ds = dataset(&[
            ("a", "A", "", ""),
            ("b", "B", "", ""),
            ("c", "B", "", ""),
            ("d", "C", "", ""),
            ("e", "C", "", ""),
            ("f", "C", "", ""),
        ]);
        let p = params(&[("min_count", ParamDefault::Int(2))]);
        let table = authors_ascending(&ds.view(), &p).unwrap();
        assert_eq!(
            table.as_table().unwrap().rows(),
            &[
                vec![Value::from("B"), Value::Int(2)],
                vec![Value::from("C"), Value::Int(3)]
            ]
        );
    }
}
