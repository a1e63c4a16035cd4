//! Schema resolution: raw columns to canonical fields
//!
//! The resolver binds each canonical field to at most one source column
//! using the synonym table, then normalizes every row into a [`Record`].
//! Bad cells never fail the load. They become nulls and are tallied in the
//! [`ResolutionReport`].

use chrono::Datelike;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use std::fmt;

use corpusq_shared::utils::is_blank;
use corpusq_shared::Value;

use crate::dataset::{Dataset, Record};
use crate::date::{is_missing, parse_date};
use crate::error::{Error, Result};
use crate::field::{CanonicalField, ColumnHints};
use crate::raw::RawTable;

/// Non-fatal findings of a resolution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum ResolutionWarning {
    /// No source column matched an optional field; it is absent everywhere
    UnmatchedField {
        /// The field left unbound
        field: CanonicalField,
    },
    /// Some date cells held text that is not a recognizable date
    UnparseableDates {
        /// Source column the dates were read from
        column: String,
        /// Number of records affected
        count: usize,
    },
    /// Some status cells were neither true/false nor 1/0
    UnrecognizedStatus {
        /// Source column the flags were read from
        column: String,
        /// Number of records affected
        count: usize,
    },
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::UnmatchedField { field } => {
                write!(f, "No column found for {field}; treating it as absent")
            }
            ResolutionWarning::UnparseableDates { column, count } => {
                write!(f, "{count} value(s) in '{column}' are not valid dates")
            }
            ResolutionWarning::UnrecognizedStatus { column, count } => {
                write!(f, "{count} value(s) in '{column}' are not valid status flags")
            }
        }
    }
}

/// Diagnostics gathered while resolving a raw table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    /// Canonical field to bound source column, in resolution order
    pub bindings: IndexMap<CanonicalField, String>,
    /// Source columns carried through without a canonical meaning
    pub extra_columns: Vec<String>,
    /// Non-fatal warnings
    pub warnings: Vec<ResolutionWarning>,
    /// Number of date cells that could not be parsed
    pub unparseable_dates: usize,
    /// Number of status cells that could not be read
    pub unrecognized_status: usize,
}

/// A resolved dataset together with its diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The canonical dataset
    pub dataset: Dataset,
    /// What the resolver did and what it found
    pub report: ResolutionReport,
}

/// Read a status cell. `True`/`False` and `1`/`0` are accepted in any case.
#[must_use]
pub fn parse_status(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int(_) | Value::Float(_) => match value.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Null | Value::Date(_) => None,
    }
}

fn clean_text(value: &Value) -> Option<String> {
    let text = value.to_text()?;
    if is_blank(&text) {
        None
    } else {
        Some(text.trim().to_string())
    }
}

/// Bind each source field to the first matching column not already taken
fn bind_columns(columns: &[String], hints: &ColumnHints) -> IndexMap<CanonicalField, usize> {
    let mut bound: IndexMap<CanonicalField, usize> = IndexMap::new();
    for field in CanonicalField::SOURCE {
        let found = columns
            .iter()
            .enumerate()
            .find(|(idx, name)| {
                !bound.values().any(|taken| taken == idx) && hints.matches(field, name)
            })
            .map(|(idx, _)| idx);
        if let Some(idx) = found {
            bound.insert(field, idx);
        }
    }
    bound
}

/// Map a raw table onto canonical fields.
///
/// Fails only when a mandatory field has no matching column. Row order is
/// preserved and no row is dropped.
pub fn resolve(raw: &RawTable, hints: &ColumnHints) -> Result<Resolution> {
    let columns = raw.columns();
    let bound = bind_columns(columns, hints);

    let missing: Vec<CanonicalField> = hints
        .mandatory()
        .iter()
        .copied()
        .filter(|f| !bound.contains_key(f))
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            missing,
            available: columns.to_vec(),
        });
    }

    let mut report = ResolutionReport::default();
    for field in CanonicalField::SOURCE {
        match bound.get(&field) {
            Some(&idx) => {
                debug!("Bound {} to column '{}'", field, columns[idx]);
                report.bindings.insert(field, columns[idx].clone());
            }
            None => {
                let warning = ResolutionWarning::UnmatchedField { field };
                warn!("{warning}");
                report.warnings.push(warning);
            }
        }
    }

    let extra_idx: Vec<usize> = (0..columns.len())
        .filter(|idx| !bound.values().any(|taken| taken == idx))
        .collect();
    report.extra_columns = extra_idx.iter().map(|&i| columns[i].clone()).collect();

    let column_of = |field: CanonicalField| bound.get(&field).copied();
    let text_at = |row_no: usize, field: CanonicalField| {
        column_of(field).and_then(|idx| clean_text(raw.cell(row_no, idx)))
    };

    let mut records = Vec::with_capacity(raw.len());
    for row_no in 0..raw.len() {
        let published = column_of(CanonicalField::PublishedDate).and_then(|idx| {
            let cell = raw.cell(row_no, idx);
            let date = parse_date(cell);
            if date.is_none() && !is_missing(cell) {
                debug!("Row {row_no}: unparseable date {cell:?}");
                report.unparseable_dates += 1;
            }
            date
        });

        let status = column_of(CanonicalField::Status).and_then(|idx| {
            let cell = raw.cell(row_no, idx);
            let status = parse_status(cell);
            if status.is_none() && !is_missing(cell) {
                debug!("Row {row_no}: unrecognized status {cell:?}");
                report.unrecognized_status += 1;
            }
            status
        });

        let year = published.map(|d| d.year());
        records.push(Record {
            title: text_at(row_no, CanonicalField::Title),
            author: text_at(row_no, CanonicalField::Author),
            kind: text_at(row_no, CanonicalField::Type),
            magazine: text_at(row_no, CanonicalField::Magazine),
            publisher: text_at(row_no, CanonicalField::Publisher),
            published,
            volume: text_at(row_no, CanonicalField::Volume),
            link: text_at(row_no, CanonicalField::Link),
            status,
            year,
            decade: year.map(|y| y.div_euclid(10) * 10),
            month: published.map(|d| d.month()),
            extras: extra_idx.iter().map(|&i| raw.cell(row_no, i).clone()).collect(),
        });
    }

    if report.unparseable_dates > 0 {
        let warning = ResolutionWarning::UnparseableDates {
            column: report.bindings[&CanonicalField::PublishedDate].clone(),
            count: report.unparseable_dates,
        };
        warn!("{warning}");
        report.warnings.push(warning);
    }
    if report.unrecognized_status > 0 {
        let warning = ResolutionWarning::UnrecognizedStatus {
            column: report.bindings[&CanonicalField::Status].clone(),
            count: report.unrecognized_status,
        };
        warn!("{warning}");
        report.warnings.push(warning);
    }

    let mut fields: Vec<CanonicalField> = report.bindings.keys().copied().collect();
    if bound.contains_key(&CanonicalField::PublishedDate) {
        fields.extend(CanonicalField::DERIVED);
    }

    debug!(
        "Resolved {} records over {} canonical fields ({} extra columns)",
        records.len(),
        fields.len(),
        report.extra_columns.len()
    );

    Ok(Resolution {
        dataset: Dataset::new(fields, report.extra_columns.clone(), records),
        report,
    })
}
