//! Positional preview window
//!
//! The preview is a slice of the full dataset by position. It is separate
//! from the logical filter and never narrows query input.

use std::ops::Range;

use corpusq_core::{Dataset, FilteredView};
use corpusq_shared::constants::DEFAULT_PREVIEW_ROWS;

/// The default preview window, `[0, DEFAULT_PREVIEW_ROWS)`
#[must_use]
pub fn default_window() -> Range<usize> {
    0..DEFAULT_PREVIEW_ROWS
}

/// Records at positions `[start, end)`, clamped to the dataset length.
///
/// An inverted window is empty.
#[must_use]
pub fn preview(dataset: &Dataset, window: Range<usize>) -> FilteredView<'_> {
    let end = window.end.min(dataset.len());
    let start = window.start.min(end);
    FilteredView::from_indices(dataset, (start..end).collect())
}
