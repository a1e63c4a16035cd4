//! Built-in aggregate queries for corpusq
//!
//! This crate provides the catalog of named questions a user can ask about a
//! filtered view, and the registry that evaluates them. Every query is a
//! plain function of the view and its declared parameters; nothing reads
//! global state.
//!
//! # Examples
//!
//! ```rust,ignore
//! use corpusq_queries::QueryRegistry;
//!
//! let mut registry = QueryRegistry::new();
//! registry.set_param("stories_after_1990", "after_year", 1995)?;
//! let answer = registry.evaluate("stories_after_1990", &dataset.view())?;
//! ```

#![allow(
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::unnecessary_wraps,
    clippy::redundant_closure_for_method_calls
)]

pub mod aggregate;
pub mod builtin;
pub mod params;
pub mod registry;

// Re-export inventory for use by builtin modules
pub use inventory;

pub use params::{ParamDefault, QueryParams};
pub use registry::{QueryFn, QueryInfo, QueryRegistration, QueryRegistry, Section};
