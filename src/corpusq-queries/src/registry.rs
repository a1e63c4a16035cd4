//! The query registry
//!
//! Built-in queries register themselves through `inventory`; callers add
//! their own with [`QueryRegistry::register`]. Evaluation always takes the
//! view explicitly and never touches shared state.

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use corpusq_core::{Error, FilteredView, QueryResult, Result, Value};

use crate::params::{ParamDefault, QueryParams};

/// Query implementation
pub type QueryFn = Arc<dyn Fn(&FilteredView<'_>, &QueryParams) -> Result<QueryResult> + Send + Sync>;

/// Catalog section a query is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Author rankings and counts
    Authors,
    /// Content type statistics
    Types,
    /// Magazines and publishers
    Publishing,
    /// Publication years and decades
    Time,
    /// Active/inactive flags
    Status,
    /// Volumes and links
    Metadata,
    /// Missing and duplicated data
    Quality,
    /// Dashboard metrics and chart series
    Dashboard,
    /// Per-author drill-down
    AuthorOverview,
    /// Queries registered at runtime
    Custom,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Authors => "Author analysis",
            Section::Types => "Content types",
            Section::Publishing => "Publishers & magazines",
            Section::Time => "Time analysis",
            Section::Status => "Status",
            Section::Metadata => "Volumes & links",
            Section::Quality => "Data quality",
            Section::Dashboard => "Dashboard",
            Section::AuthorOverview => "Author overview",
            Section::Custom => "Custom",
        };
        write!(f, "{name}")
    }
}

inventory::collect!(QueryRegistration);

/// A built-in query, submitted with `inventory::submit!`
pub struct QueryRegistration {
    /// Stable key
    pub key: &'static str,
    /// Question shown to users
    pub question: &'static str,
    /// Catalog section
    pub section: Section,
    /// Position within the section
    pub rank: u16,
    /// Declared parameters with their defaults
    pub params: &'static [(&'static str, ParamDefault)],
    /// Implementation
    pub func: fn(&FilteredView<'_>, &QueryParams) -> Result<QueryResult>,
}

/// Presentation metadata of a registered query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryInfo {
    /// Stable key
    pub key: String,
    /// Question shown to users
    pub question: String,
    /// Catalog section
    pub section: Section,
    /// Current parameter values
    pub params: Vec<(String, Value)>,
}

struct QueryEntry {
    question: String,
    section: Section,
    rank: u16,
    params: QueryParams,
    func: QueryFn,
}

/// Registry of named aggregate queries
pub struct QueryRegistry {
    queries: IndexMap<String, QueryEntry>,
}

impl fmt::Debug for QueryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryRegistry {{ queries: {} queries }}", self.queries.len())
    }
}

impl Default for QueryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryRegistry {
    /// Create a registry holding every built-in query
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_queries();
        registry
    }

    /// Create a registry with no queries
    pub fn empty() -> Self {
        Self {
            queries: IndexMap::new(),
        }
    }

    fn register_builtin_queries(&mut self) {
        let mut builtins: Vec<&QueryRegistration> =
            inventory::iter::<QueryRegistration>.into_iter().collect();
        builtins.sort_by_key(|q| (q.section, q.rank, q.key));
        for q in builtins {
            self.queries.insert(
                q.key.to_string(),
                QueryEntry {
                    question: q.question.to_string(),
                    section: q.section,
                    rank: q.rank,
                    params: QueryParams::declared(q.key, q.params),
                    func: Arc::new(q.func),
                },
            );
        }
    }

    /// Add a query, replacing any query with the same key
    pub fn register<F>(&mut self, key: impl Into<String>, question: impl Into<String>, func: F)
    where
        F: Fn(&FilteredView<'_>, &QueryParams) -> Result<QueryResult> + Send + Sync + 'static,
    {
        let key = key.into();
        // listing sorts stably, so custom queries keep insertion order
        self.queries.shift_remove(&key);
        self.queries.insert(
            key.clone(),
            QueryEntry {
                question: question.into(),
                section: Section::Custom,
                rank: 0,
                params: QueryParams::declared(key, &[]),
                func: Arc::new(func),
            },
        );
    }

    /// Whether a key is registered
    pub fn contains(&self, key: &str) -> bool {
        self.queries.contains_key(key)
    }

    /// Number of registered queries
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Keys ordered by section and rank, custom queries last
    pub fn list(&self) -> Vec<&str> {
        self.ordered().map(|(key, _)| key.as_str()).collect()
    }

    /// Keys of one section, in catalog order
    pub fn section(&self, section: Section) -> Vec<&str> {
        self.ordered()
            .filter(|(_, entry)| entry.section == section)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Presentation metadata of every query, in catalog order
    pub fn describe(&self) -> Vec<QueryInfo> {
        self.ordered().map(|(key, entry)| Self::info_of(key, entry)).collect()
    }

    /// Presentation metadata of one query
    pub fn info(&self, key: &str) -> Result<QueryInfo> {
        self.queries
            .get(key)
            .map(|entry| Self::info_of(key, entry))
            .ok_or_else(|| Error::UnknownQuery(key.to_string()))
    }

    /// Override a declared parameter of a query
    pub fn set_param(&mut self, key: &str, name: &str, value: impl Into<Value>) -> Result<()> {
        let entry = self
            .queries
            .get_mut(key)
            .ok_or_else(|| Error::UnknownQuery(key.to_string()))?;
        entry.params.set(name, value.into())
    }

    /// Evaluate a query against a view
    pub fn evaluate(&self, key: &str, view: &FilteredView<'_>) -> Result<QueryResult> {
        let entry = self
            .queries
            .get(key)
            .ok_or_else(|| Error::UnknownQuery(key.to_string()))?;
        debug!("Evaluating query '{}' over {} records", key, view.len());
        (entry.func)(view, &entry.params)
    }

    fn ordered(&self) -> impl Iterator<Item = (&String, &QueryEntry)> {
        let mut entries: Vec<_> = self.queries.iter().collect();
        entries.sort_by_key(|(_, entry)| (entry.section, entry.rank));
        entries.into_iter()
    }

    fn info_of(key: &str, entry: &QueryEntry) -> QueryInfo {
        QueryInfo {
            key: key.to_string(),
            question: entry.question.clone(),
            section: entry.section,
            params: entry
                .params
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }
}
