//! The full set of filter slots and their application to a dataset

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use corpusq_core::{CanonicalField, Dataset, FilteredView, Record};
use corpusq_shared::utils::contains_ignore_case;

use crate::predicate::Predicate;

/// One filterable slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSlot {
    /// Publication year
    Year,
    /// Content type
    Type,
    /// Magazine
    Magazine,
    /// Active flag
    Status,
    /// Author
    Author,
    /// Publisher
    Publisher,
    /// Free-text search
    Search,
    /// Row-index range
    Rows,
}

impl fmt::Display for FilterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterSlot::Year => "year",
            FilterSlot::Type => "type",
            FilterSlot::Magazine => "magazine",
            FilterSlot::Status => "status",
            FilterSlot::Author => "author",
            FilterSlot::Publisher => "publisher",
            FilterSlot::Search => "search",
            FilterSlot::Rows => "rows",
        };
        write!(f, "{name}")
    }
}

/// A conjunction of per-slot constraints
///
/// The default value constrains nothing and selects the whole dataset.
/// Builder methods consume and return the spec:
///
/// ```rust,ignore
/// let spec = FilterSpec::default()
///     .year_range(1980, 1999)
///     .types(["కథ", "కవిత"])
///     .status(true);
/// let view = spec.apply(&dataset);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    year: Predicate<i32>,
    kind: Predicate<String>,
    magazine: Predicate<String>,
    status: Predicate<bool>,
    author: Predicate<String>,
    publisher: Predicate<String>,
    search: Option<String>,
    rows: Option<Range<usize>>,
}

impl FilterSpec {
    /// Keep records published in exactly this year
    #[must_use]
    pub fn year(mut self, year: i32) -> Self {
        self.year = Predicate::Equals(year);
        self
    }

    /// Keep records published between two years, inclusive
    #[must_use]
    pub fn year_range(mut self, min: i32, max: i32) -> Self {
        self.year = Predicate::Between(min, max);
        self
    }

    /// Keep records whose type is one of the given values
    #[must_use]
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind = Predicate::one_of(types);
        self
    }

    /// Keep records of exactly this type
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Predicate::Equals(kind.into());
        self
    }

    /// Keep records from any of the given magazines
    #[must_use]
    pub fn magazines<I, S>(mut self, magazines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.magazine = Predicate::one_of(magazines);
        self
    }

    /// Keep active (`true`) or inactive (`false`) records
    #[must_use]
    pub fn status(mut self, active: bool) -> Self {
        self.status = Predicate::Equals(active);
        self
    }

    /// Keep records by exactly this author
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Predicate::Equals(author.into());
        self
    }

    /// Keep records from exactly this publisher
    #[must_use]
    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Predicate::Equals(publisher.into());
        self
    }

    /// Case-insensitive substring search; a blank query matches everything
    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.search = if query.trim().is_empty() {
            None
        } else {
            Some(query)
        };
        self
    }

    /// Keep records whose dataset position lies in `[start, end)`
    #[must_use]
    pub fn rows(mut self, rows: Range<usize>) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Replace the year slot with an arbitrary predicate
    #[must_use]
    pub fn with_year(mut self, year: Predicate<i32>) -> Self {
        self.year = year;
        self
    }

    /// Replace the type slot with an arbitrary predicate
    #[must_use]
    pub fn with_kind(mut self, kind: Predicate<String>) -> Self {
        self.kind = kind;
        self
    }

    /// Replace the magazine slot with an arbitrary predicate
    #[must_use]
    pub fn with_magazine(mut self, magazine: Predicate<String>) -> Self {
        self.magazine = magazine;
        self
    }

    /// Replace the status slot with an arbitrary predicate
    #[must_use]
    pub fn with_status(mut self, status: Predicate<bool>) -> Self {
        self.status = status;
        self
    }

    /// The search query, if any
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Whether no slot is constrained
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.constrained_slots().is_empty()
    }

    /// Slots that carry a constraint, in a fixed order
    #[must_use]
    pub fn constrained_slots(&self) -> Vec<FilterSlot> {
        let flags = [
            (FilterSlot::Year, !self.year.is_any()),
            (FilterSlot::Type, !self.kind.is_any()),
            (FilterSlot::Magazine, !self.magazine.is_any()),
            (FilterSlot::Status, !self.status.is_any()),
            (FilterSlot::Author, !self.author.is_any()),
            (FilterSlot::Publisher, !self.publisher.is_any()),
            (FilterSlot::Search, self.search.is_some()),
            (FilterSlot::Rows, self.rows.is_some()),
        ];
        flags
            .into_iter()
            .filter_map(|(slot, on)| on.then_some(slot))
            .collect()
    }

    /// Whether the record at a dataset position passes every slot
    #[must_use]
    pub fn matches(&self, position: usize, record: &Record) -> bool {
        if let Some(rows) = &self.rows {
            if !rows.contains(&position) {
                return false;
            }
        }
        self.year.matches(record.year().as_ref())
            && self.kind.matches(record.kind())
            && self.magazine.matches(record.magazine())
            && self.status.matches(record.status().as_ref())
            && self.author.matches(record.author())
            && self.publisher.matches(record.publisher())
            && self.search.as_deref().map_or(true, |q| search_matches(record, q))
    }

    /// Select the matching records of a dataset
    #[must_use]
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> FilteredView<'a> {
        self.apply_to(&dataset.view())
    }

    /// Narrow an existing view
    #[must_use]
    pub fn apply_to<'a>(&self, view: &FilteredView<'a>) -> FilteredView<'a> {
        if self.is_unconstrained() {
            return view.clone();
        }
        let records = view.dataset().records();
        let indices = view
            .indices()
            .iter()
            .copied()
            .filter(|&i| self.matches(i, &records[i]))
            .collect();
        let narrowed = FilteredView::from_indices(view.dataset(), indices);
        debug!(
            "Filter on [{}] kept {} of {} records",
            self.constrained_slots()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            narrowed.len(),
            view.len()
        );
        narrowed
    }
}

/// Any searchable field contains the query; null fields never match
fn search_matches(record: &Record, query: &str) -> bool {
    CanonicalField::SEARCHABLE
        .iter()
        .filter_map(|f| record.text(*f))
        .any(|text| contains_ignore_case(text, query))
}

/// Select the records of a dataset that satisfy a filter
#[must_use]
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    spec.apply(dataset)
}
