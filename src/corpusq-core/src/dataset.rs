//! Canonical datasets and the views derived from them
//!
//! A [`Dataset`] is produced once by the resolver and is read-only from then
//! on. A [`FilteredView`] borrows it and names a subset of its rows by
//! position; views are cheap to build and are never cached.

use chrono::NaiveDate;
use serde::Serialize;

use corpusq_shared::Value;

use crate::field::CanonicalField;

/// One record with every canonical field resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub(crate) title: Option<String>,
    pub(crate) author: Option<String>,
    pub(crate) kind: Option<String>,
    pub(crate) magazine: Option<String>,
    pub(crate) publisher: Option<String>,
    pub(crate) published: Option<NaiveDate>,
    pub(crate) volume: Option<String>,
    pub(crate) link: Option<String>,
    pub(crate) status: Option<bool>,
    pub(crate) year: Option<i32>,
    pub(crate) decade: Option<i32>,
    pub(crate) month: Option<u32>,
    pub(crate) extras: Vec<Value>,
}

impl Record {
    /// Title of the work
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Author name
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Content type
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Magazine name
    #[must_use]
    pub fn magazine(&self) -> Option<&str> {
        self.magazine.as_deref()
    }

    /// Publisher name
    #[must_use]
    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    /// Publication date
    #[must_use]
    pub fn published(&self) -> Option<NaiveDate> {
        self.published
    }

    /// Volume information
    #[must_use]
    pub fn volume(&self) -> Option<&str> {
        self.volume.as_deref()
    }

    /// Document link
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Active flag
    #[must_use]
    pub fn status(&self) -> Option<bool> {
        self.status
    }

    /// Publication year
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Publication decade
    #[must_use]
    pub fn decade(&self) -> Option<i32> {
        self.decade
    }

    /// Publication month (1-12)
    #[must_use]
    pub fn month(&self) -> Option<u32> {
        self.month
    }

    /// Pass-through cells of unmatched source columns
    #[must_use]
    pub fn extras(&self) -> &[Value] {
        &self.extras
    }

    /// Text payload of a text field; `None` for nulls and non-text fields
    #[must_use]
    pub fn text(&self, field: CanonicalField) -> Option<&str> {
        match field {
            CanonicalField::Title => self.title(),
            CanonicalField::Author => self.author(),
            CanonicalField::Type => self.kind(),
            CanonicalField::Magazine => self.magazine(),
            CanonicalField::Publisher => self.publisher(),
            CanonicalField::Volume => self.volume(),
            CanonicalField::Link => self.link(),
            _ => None,
        }
    }

    /// Any field as a cell value
    #[must_use]
    pub fn get(&self, field: CanonicalField) -> Value {
        match field {
            CanonicalField::PublishedDate => self.published.into(),
            CanonicalField::Status => self.status.into(),
            CanonicalField::Year => self.year.into(),
            CanonicalField::Decade => self.decade.into(),
            CanonicalField::Month => self.month.into(),
            text => self.text(text).into(),
        }
    }

    /// Whether the field holds no value
    #[must_use]
    pub fn is_null(&self, field: CanonicalField) -> bool {
        self.get(field).is_null()
    }
}

/// An immutable, canonicalized dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    fields: Vec<CanonicalField>,
    extra_columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub(crate) fn new(
        fields: Vec<CanonicalField>,
        extra_columns: Vec<String>,
        records: Vec<Record>,
    ) -> Self {
        Self {
            fields,
            extra_columns,
            records,
        }
    }

    /// Canonical fields present in this dataset (derived ones included)
    #[must_use]
    pub fn fields(&self) -> &[CanonicalField] {
        &self.fields
    }

    /// Whether a canonical field was resolved (or derived)
    #[must_use]
    pub fn has_field(&self, field: CanonicalField) -> bool {
        self.fields.contains(&field)
    }

    /// Source columns that matched no canonical field, in source order
    #[must_use]
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// All records in source order
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Record at a position
    #[must_use]
    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A view over every record
    #[must_use]
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::all(self)
    }

    /// Preview column headers: canonical labels then extra columns
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| f.label().to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }

    /// A record laid out under [`Dataset::headers`]
    #[must_use]
    pub fn row_cells(&self, record: &Record) -> Vec<Value> {
        self.fields
            .iter()
            .map(|f| record.get(*f))
            .chain(record.extras.iter().cloned())
            .collect()
    }
}

/// A subset of a dataset's records, named by position
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record of the dataset
    #[must_use]
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// A view over the given positions; out-of-range positions are dropped
    #[must_use]
    pub fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        let mut indices = indices;
        indices.retain(|&i| i < dataset.len());
        Self { dataset, indices }
    }

    /// The dataset this view borrows
    #[must_use]
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Positions of the records in the view, in dataset order
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of records in the view
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the view has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Whether the underlying dataset carries a field
    #[must_use]
    pub fn has_field(&self, field: CanonicalField) -> bool {
        self.dataset.has_field(field)
    }

    /// Records in the view, in dataset order
    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Keep only the records matching a predicate
    #[must_use]
    pub fn retain<F>(&self, mut keep: F) -> FilteredView<'a>
    where
        F: FnMut(&Record) -> bool,
    {
        let records = self.dataset.records();
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| keep(&records[i]))
            .collect();
        FilteredView {
            dataset: self.dataset,
            indices,
        }
    }

    /// Rows of the view as preview cells (see [`Dataset::headers`])
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<Value>> {
        self.iter().map(|r| self.dataset.row_cells(r)).collect()
    }
}

impl PartialEq for FilteredView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dataset, other.dataset) && self.indices == other.indices
    }
}

/// Row count and header summary of a view, for serialization
#[derive(Debug, Clone, Serialize)]
pub struct ViewSummary {
    /// Number of rows in the view
    pub rows: usize,
    /// Number of rows in the whole dataset
    pub total: usize,
    /// Preview headers
    pub columns: Vec<String>,
}

impl From<&FilteredView<'_>> for ViewSummary {
    fn from(view: &FilteredView<'_>) -> Self {
        Self {
            rows: view.len(),
            total: view.dataset().len(),
            columns: view.dataset().headers(),
        }
    }
}
