//! CSV ingestion bridge and the load cache
//!
//! Files are read with polars into a `DataFrame` of text columns, then
//! copied cell by cell into a [`RawTable`] for the resolver. Type inference
//! is off by default so that dates, flags and volumes reach the resolver
//! exactly as written.

use chrono::NaiveDate;
use log::{debug, info};
use lru::LruCache;
use polars::prelude::{AnyValue, CsvParseOptions, CsvReadOptions, DataFrame, NullValues, SerReader};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use corpusq_shared::constants::DEFAULT_CACHE_SIZE;
use corpusq_shared::Value;

use crate::error::Result;
use crate::field::{CanonicalField, ColumnHints};
use crate::raw::RawTable;
use crate::schema::{resolve, Resolution};

/// Days from 0001-01-01 to the Unix epoch
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Options for reading CSV input
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field separator
    pub separator: u8,
    /// Whether the first row holds column names
    pub has_header: bool,
    /// Cell texts read as null
    pub null_values: Vec<String>,
    /// Rows used for type inference; `Some(0)` reads every column as text
    pub infer_schema_length: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            has_header: true,
            null_values: ["", "NA", "N/A", "NULL", "null", "NaN"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            infer_schema_length: Some(0),
        }
    }
}

/// Read a CSV file into a raw table
pub fn read_csv<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<RawTable> {
    let path_buf = path.as_ref().to_path_buf();
    debug!("Reading CSV from {}", path_buf.display());

    let mut parse_options = CsvParseOptions::default().with_separator(options.separator);
    if !options.null_values.is_empty() {
        let null_vals: Vec<_> = options
            .null_values
            .iter()
            .map(|s| s.as_str().into())
            .collect();
        parse_options = parse_options.with_null_values(Some(NullValues::AllColumns(null_vals)));
    }

    let reader = CsvReadOptions::default()
        .with_has_header(options.has_header)
        .with_infer_schema_length(options.infer_schema_length)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path_buf))?;
    let df = reader.finish()?;

    dataframe_to_raw(&df)
}

/// Copy a `DataFrame` into a raw table, row by row
pub fn dataframe_to_raw(df: &DataFrame) -> Result<RawTable> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    let mut table = RawTable::new(names);

    let columns = df.get_columns();
    for i in 0..df.height() {
        let mut row = Vec::with_capacity(columns.len());
        for column in columns {
            row.push(value_from_any_value(column.get(i)?));
        }
        table.push_row(row);
    }
    Ok(table)
}

/// Convert one polars cell into a [`Value`]
#[must_use]
pub fn value_from_any_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int8(i) => Value::Int(i64::from(i)),
        AnyValue::Int16(i) => Value::Int(i64::from(i)),
        AnyValue::Int32(i) => Value::Int(i64::from(i)),
        AnyValue::Int64(i) => Value::Int(i),
        AnyValue::UInt8(i) => Value::Int(i64::from(i)),
        AnyValue::UInt16(i) => Value::Int(i64::from(i)),
        AnyValue::UInt32(i) => Value::Int(i64::from(i)),
        AnyValue::UInt64(i) => i64::try_from(i).map_or(Value::Float(i as f64), Value::Int),
        AnyValue::Float32(f) => Value::Float(f64::from(f)),
        AnyValue::Float64(f) => Value::Float(f),
        AnyValue::Date(days) => days
            .checked_add(EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map_or(Value::Null, Value::Date),
        other => Value::String(other.to_string()),
    }
}

/// Read and resolve a CSV file in one step
pub fn load_dataset<P: AsRef<Path>>(
    path: P,
    options: &CsvOptions,
    hints: &ColumnHints,
) -> Result<Resolution> {
    let raw = read_csv(&path, options)?;
    info!(
        "Loaded {} rows with {} columns from {}",
        raw.len(),
        raw.columns().len(),
        path.as_ref().display()
    );
    resolve(&raw, hints)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
    settings: u64,
}

fn settings_fingerprint(options: &CsvOptions, hints: &ColumnHints) -> u64 {
    let mut hasher = DefaultHasher::new();
    options.hash(&mut hasher);
    for field in CanonicalField::SOURCE {
        field.hash(&mut hasher);
        hints.synonyms(field).hash(&mut hasher);
    }
    hints.mandatory().hash(&mut hasher);
    hasher.finish()
}

/// Resolved datasets memoized per source file
///
/// Entries are keyed by canonical path, file length and modification time,
/// so an edited file is read again. The cache is owned by the caller.
pub struct DatasetCache {
    entries: LruCache<CacheKey, Arc<Resolution>>,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl DatasetCache {
    /// Create a cache holding at most `capacity` datasets
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Load a dataset, reusing an earlier resolution of the same file
    pub fn load<P: AsRef<Path>>(
        &mut self,
        path: P,
        options: &CsvOptions,
        hints: &ColumnHints,
    ) -> Result<Arc<Resolution>> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        let key = CacheKey {
            path: fs::canonicalize(path)?,
            len: metadata.len(),
            modified: metadata.modified().ok(),
            settings: settings_fingerprint(options, hints),
        };

        if let Some(hit) = self.entries.get(&key) {
            debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(hit));
        }

        let resolution = Arc::new(load_dataset(path, options, hints)?);
        self.entries.put(key, Arc::clone(&resolution));
        Ok(resolution)
    }

    /// Number of cached datasets
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached dataset
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
