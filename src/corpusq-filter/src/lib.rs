//! corpusq-filter: Predicate and filter engine for corpusq
//!
//! A [`FilterSpec`] holds one slot per filterable field. Each slot is either
//! unconstrained or carries a [`Predicate`]; applying the spec keeps the
//! records that satisfy every constrained slot. Application is a single
//! linear pass that borrows the dataset and never copies records.
//!
//! # Features
//!
//! - **Null-safe Predicates**: Nulls satisfy only unconstrained slots
//! - **Free-text Search**: Case-insensitive over title, author, type, publisher and magazine
//! - **Preview Window**: Positional slice kept apart from the logical filter
//! - **Facets**: Distinct values for populating filter widgets
//!
//! # Examples
//!
//! ```rust,ignore
//! use corpusq_filter::{FilterSpec, Facets};
//!
//! let facets = Facets::collect(&dataset);
//! let spec = FilterSpec::default()
//!     .magazines(facets.magazines.iter().take(2).cloned())
//!     .search("chandamama");
//! let view = spec.apply(&dataset);
//! println!("{} matching records", view.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod facets;
pub mod filter_spec;
pub mod predicate;
pub mod preview;

pub use facets::Facets;
pub use filter_spec::{apply, FilterSlot, FilterSpec};
pub use predicate::Predicate;
pub use preview::{default_window, preview};
