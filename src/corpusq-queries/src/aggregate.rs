//! Counting, ranking and grouping primitives shared by the built-in queries
//!
//! Keys are counted in first-seen order so that "first encountered" tie
//! breaks fall out of a stable sort.

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use std::hash::Hash;

use corpusq_core::{CanonicalField, FilteredView, Record};

/// Occurrences of each key, in first-seen order
pub fn count_by<K, I>(keys: I) -> IndexMap<K, usize>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut counts = IndexMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Non-null text values of a field across a view
pub fn texts<'a>(view: &'a FilteredView<'a>, field: CanonicalField) -> impl Iterator<Item = &'a str> + 'a {
    view.iter().filter_map(move |r| r.text(field))
}

/// Count descending, ties by key ascending, at most `n` rows when given
pub fn top_n<K: Ord>(counts: IndexMap<K, usize>, n: Option<usize>) -> Vec<(K, usize)> {
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(n.unwrap_or(usize::MAX))
        .collect()
}

/// Count descending, ties in first-seen order
pub fn ranked_first_seen<K>(counts: IndexMap<K, usize>) -> Vec<(K, usize)> {
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .collect()
}

/// Keys seen at least `min` times, count ascending, ties by key ascending
pub fn ascending<K: Ord>(counts: IndexMap<K, usize>, min: usize) -> Vec<(K, usize)> {
    counts
        .into_iter()
        .filter(|(_, n)| *n >= min)
        .sorted_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}

/// Most frequent key; ties go to the key encountered first
pub fn mode<K, I>(keys: I) -> Option<K>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let counts = count_by(keys);
    let best = counts.values().copied().max()?;
    counts.into_iter().find(|(_, n)| *n == best).map(|(k, _)| k)
}

/// Number of distinct keys
pub fn distinct<K, I>(keys: I) -> usize
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    keys.into_iter().collect::<IndexSet<K>>().len()
}

/// Distinct values per group, groups in first-seen order
pub fn distinct_by_group<K, V, I>(pairs: I) -> IndexMap<K, IndexSet<V>>
where
    K: Eq + Hash,
    V: Eq + Hash,
    I: IntoIterator<Item = (K, V)>,
{
    let mut groups: IndexMap<K, IndexSet<V>> = IndexMap::new();
    for (key, value) in pairs {
        groups.entry(key).or_default().insert(value);
    }
    groups
}

/// Groups of a text field whose every record has the wanted status,
/// ascending by key. A null status disqualifies the group.
pub fn all_with_status<'a>(
    view: &'a FilteredView<'a>,
    field: CanonicalField,
    wanted: bool,
) -> Vec<&'a str> {
    let mut groups: IndexMap<&str, bool> = IndexMap::new();
    for record in view.iter() {
        if let Some(key) = record.text(field) {
            let ok = record.status() == Some(wanted);
            groups
                .entry(key)
                .and_modify(|all| *all &= ok)
                .or_insert(ok);
        }
    }
    groups
        .into_iter()
        .filter_map(|(key, all)| all.then_some(key))
        .sorted()
        .collect()
}

/// Records in a view that satisfy a predicate
pub fn count_where<F>(view: &FilteredView<'_>, keep: F) -> usize
where
    F: FnMut(&&Record) -> bool,
{
    view.iter().filter(keep).count()
}
