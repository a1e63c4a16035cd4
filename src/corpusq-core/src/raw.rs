//! Raw tabular input as handed over by the ingestion layer

use corpusq_shared::Value;

/// Rows of cells under source column names, before schema resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RawTable {
    /// Create an empty table with the given column names
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

    /// Build a table from records of `(column, value)` pairs.
    ///
    /// Columns are ordered by first appearance; cells a record does not
    /// mention are null.
    pub fn from_records<R, K, V>(records: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut table = RawTable::default();
        for record in records {
            let mut row = vec![Value::Null; table.columns.len()];
            for (key, value) in record {
                let key = key.into();
                let idx = match table.columns.iter().position(|c| *c == key) {
                    Some(idx) => idx,
                    None => {
                        table.columns.push(key);
                        row.push(Value::Null);
                        table.columns.len() - 1
                    }
                };
                row[idx] = value.into();
            }
            table.rows.push(row);
        }
        let width = table.columns.len();
        for row in &mut table.rows {
            row.resize(width, Value::Null);
        }
        table
    }

    /// Append a row. Short rows are padded with nulls, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Source column names in file order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
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

    /// Cell at (row, column index), null when out of range
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &Value {
        static NULL: Value = Value::Null;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }
}
