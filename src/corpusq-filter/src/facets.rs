//! Values offered by the filter widgets

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use corpusq_core::{Dataset, FilteredView, Record};
use corpusq_shared::constants::AUTHOR_FACET_SIZE;

/// Distinct values of the filterable fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Distinct publication years, ascending
    pub years: Vec<i32>,
    /// Smallest and largest publication year
    pub year_bounds: Option<(i32, i32)>,
    /// Distinct types in first-seen order
    pub types: Vec<String>,
    /// Distinct magazines in first-seen order
    pub magazines: Vec<String>,
    /// Distinct status flags in first-seen order
    pub statuses: Vec<bool>,
    /// Distinct publishers, ascending
    pub publishers: Vec<String>,
    /// Most frequent authors, ties by first appearance
    pub authors: Vec<String>,
}

impl Facets {
    /// Facets of a whole dataset
    #[must_use]
    pub fn collect(dataset: &Dataset) -> Self {
        Self::from_view(&dataset.view())
    }

    /// Facets of the records in a view
    #[must_use]
    pub fn from_view(view: &FilteredView<'_>) -> Self {
        let years: Vec<i32> = view.iter().filter_map(Record::year).sorted().dedup().collect();
        let year_bounds = years.first().copied().zip(years.last().copied());

        let distinct = |get: fn(&Record) -> Option<&str>| -> Vec<String> {
            view.iter()
                .filter_map(get)
                .unique()
                .map(str::to_string)
                .collect()
        };

        let mut author_counts: IndexMap<&str, usize> = IndexMap::new();
        for author in view.iter().filter_map(Record::author) {
            *author_counts.entry(author).or_insert(0) += 1;
        }
        // stable sort keeps first appearance among equal counts
        let authors = author_counts
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(AUTHOR_FACET_SIZE)
            .map(|(name, _)| name.to_string())
            .collect();

        Self {
            years,
            year_bounds,
            types: distinct(Record::kind),
            magazines: distinct(Record::magazine),
            statuses: view.iter().filter_map(Record::status).unique().collect(),
            publishers: distinct(Record::publisher).into_iter().sorted().collect(),
            authors,
        }
    }
}
