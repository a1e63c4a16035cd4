//! Single-slot predicates

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// A constraint on one field
///
/// Nulls only ever satisfy [`Predicate::Any`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Predicate<T> {
    /// Unconstrained: matches everything, nulls included
    #[default]
    Any,
    /// Exact equality
    Equals(T),
    /// Set membership; an empty set matches nothing
    OneOf(Vec<T>),
    /// Inclusive range
    Between(T, T),
}

impl<T> Predicate<T> {
    /// Whether this predicate constrains anything
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Predicate::Any)
    }

    /// Test a possibly-null value
    pub fn matches<Q>(&self, value: Option<&Q>) -> bool
    where
        T: Borrow<Q>,
        Q: PartialOrd + ?Sized,
    {
        match (self, value) {
            (Predicate::Any, _) => true,
            (_, None) => false,
            (Predicate::Equals(target), Some(v)) => target.borrow() == v,
            (Predicate::OneOf(set), Some(v)) => set.iter().any(|t| t.borrow() == v),
            (Predicate::Between(lo, hi), Some(v)) => lo.borrow() <= v && v <= hi.borrow(),
        }
    }
}

impl<T> Predicate<T> {
    /// Set membership over any collection of convertible items
    pub fn one_of<I, U>(items: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<T>,
    {
        Predicate::OneOf(items.into_iter().map(Into::into).collect())
    }
}
