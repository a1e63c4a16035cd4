//! Uniform query output
//!
//! Every query answers with a [`QueryResult`]: a single [`Scalar`] with a
//! rendering hint, or a [`Table`] of rows under a fixed list of column
//! labels. Row order is part of a table's meaning.

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use std::fmt;

use corpusq_shared::Value;

use crate::error::{Error, Result};

/// How a scalar should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatHint {
    /// A count, printed with thousands separators
    Integer,
    /// A ratio in percent, printed with one decimal
    Percentage,
    /// A name or other free text
    Label,
    /// A calendar year, printed as is
    Year,
}

impl FormatHint {
    /// Render a value for prose output
    #[must_use]
    pub fn render(self, value: &Value) -> String {
        if value.is_null() {
            return "-".to_string();
        }
        match self {
            FormatHint::Integer => match value.as_i64() {
                Some(n) => n.to_formatted_string(&Locale::en),
                None => value.to_string(),
            },
            FormatHint::Percentage => match value {
                Value::Float(f) => format!("{f:.1}%"),
                #[allow(clippy::cast_precision_loss)]
                Value::Int(i) => format!("{:.1}%", *i as f64),
                other => other.to_string(),
            },
            FormatHint::Label | FormatHint::Year => value.to_string(),
        }
    }
}

/// A single value answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scalar {
    /// The answer
    pub value: Value,
    /// Presentation hint
    pub hint: FormatHint,
}

impl Scalar {
    /// A count
    pub fn count(n: usize) -> Self {
        Self {
            value: Value::from(n),
            hint: FormatHint::Integer,
        }
    }

    /// A year
    pub fn year(year: i32) -> Self {
        Self {
            value: Value::from(year),
            hint: FormatHint::Year,
        }
    }

    /// A name or other text
    pub fn label(text: impl Into<String>) -> Self {
        Self {
            value: Value::String(text.into()),
            hint: FormatHint::Label,
        }
    }

    /// A percentage (0-100)
    pub fn percentage(pct: f64) -> Self {
        Self {
            value: Value::Float(pct),
            hint: FormatHint::Percentage,
        }
    }

    /// Render the value according to its hint
    #[must_use]
    pub fn render(&self) -> String {
        self.hint.render(&self.value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Ordered rows over a fixed list of column labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column labels
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; it must have one cell per column
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::operation(format!(
                "Row has {} cells but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Build a table from key/count pairs under two column labels
    pub fn from_counts<K, I>(key_label: &str, count_label: &str, counts: I) -> Self
    where
        K: Into<Value>,
        I: IntoIterator<Item = (K, usize)>,
    {
        Self {
            columns: vec![key_label.to_string(), count_label.to_string()],
            rows: counts
                .into_iter()
                .map(|(k, n)| vec![k.into(), Value::from(n)])
                .collect(),
        }
    }

    /// Column labels
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in order
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A row as label/value pairs
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<(&str, &Value)>> {
        let row = self.rows.get(index)?;
        Some(
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter())
                .collect(),
        )
    }

    /// Position of a column label
    #[must_use]
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// All cells of one column, top to bottom
    #[must_use]
    pub fn column(&self, label: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(label)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Keep at most `n` rows
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }
}

/// The answer to a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryResult {
    /// A single value
    Scalar(Scalar),
    /// Ordered rows
    Table(Table),
}

impl QueryResult {
    /// The scalar payload, if this is a scalar
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            QueryResult::Scalar(s) => Some(s),
            QueryResult::Table(_) => None,
        }
    }

    /// The table payload, if this is a table
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            QueryResult::Table(t) => Some(t),
            QueryResult::Scalar(_) => None,
        }
    }

    /// Scalar value, if this is a scalar
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.as_scalar().map(|s| &s.value)
    }
}

/// Conversion of raw query output into a [`QueryResult`]
pub trait Shape {
    /// Normalize into the uniform result shape
    fn into_result(self) -> QueryResult;
}

impl Shape for QueryResult {
    fn into_result(self) -> QueryResult {
        self
    }
}

impl Shape for Scalar {
    fn into_result(self) -> QueryResult {
        QueryResult::Scalar(self)
    }
}

impl Shape for Table {
    fn into_result(self) -> QueryResult {
        QueryResult::Table(self)
    }
}

impl Shape for usize {
    fn into_result(self) -> QueryResult {
        Scalar::count(self).into_result()
    }
}

impl Shape for i64 {
    fn into_result(self) -> QueryResult {
        Scalar {
            value: Value::Int(self),
            hint: FormatHint::Integer,
        }
        .into_result()
    }
}

impl Shape for String {
    fn into_result(self) -> QueryResult {
        Scalar::label(self).into_result()
    }
}

impl Shape for &str {
    fn into_result(self) -> QueryResult {
        Scalar::label(self).into_result()
    }
}
