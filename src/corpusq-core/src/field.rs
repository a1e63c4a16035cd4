//! Canonical fields and the column-name synonym table

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use corpusq_shared::utils::normalize_name;

use crate::error::{Error, Result};

/// A normalized field name the engine operates on, whatever the source
/// column was called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    /// Title of the work
    Title,
    /// Author name
    Author,
    /// Free-form content category
    Type,
    /// Magazine the work appeared in
    Magazine,
    /// Publisher (present only in some dataset variants)
    Publisher,
    /// Publication date
    PublishedDate,
    /// Volume information
    Volume,
    /// Link to the document
    Link,
    /// Active/inactive flag
    Status,
    /// Derived: calendar year of `PublishedDate`
    Year,
    /// Derived: `Year` floored to the decade
    Decade,
    /// Derived: month of `PublishedDate`
    Month,
}

impl CanonicalField {
    /// Fields bound from source columns, in resolution order
    pub const SOURCE: [CanonicalField; 9] = [
        CanonicalField::Title,
        CanonicalField::Author,
        CanonicalField::Type,
        CanonicalField::Magazine,
        CanonicalField::Publisher,
        CanonicalField::PublishedDate,
        CanonicalField::Volume,
        CanonicalField::Link,
        CanonicalField::Status,
    ];

    /// Fields computed from `PublishedDate` at load time
    pub const DERIVED: [CanonicalField; 3] = [
        CanonicalField::Year,
        CanonicalField::Decade,
        CanonicalField::Month,
    ];

    /// Fields the free-text search looks at
    pub const SEARCHABLE: [CanonicalField; 5] = [
        CanonicalField::Title,
        CanonicalField::Author,
        CanonicalField::Type,
        CanonicalField::Publisher,
        CanonicalField::Magazine,
    ];

    /// Canonical identifier
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::Title => "Title",
            CanonicalField::Author => "Author",
            CanonicalField::Type => "Type",
            CanonicalField::Magazine => "Magazine",
            CanonicalField::Publisher => "Publisher",
            CanonicalField::PublishedDate => "PublishedDate",
            CanonicalField::Volume => "Volume",
            CanonicalField::Link => "Link",
            CanonicalField::Status => "Status",
            CanonicalField::Year => "Year",
            CanonicalField::Decade => "Decade",
            CanonicalField::Month => "Month",
        }
    }

    /// Column header used in result tables and previews
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CanonicalField::PublishedDate => "Published date",
            CanonicalField::Volume => "Vol",
            CanonicalField::Status => "STATUS",
            other => other.name(),
        }
    }

    /// Whether the field is computed rather than read from a column
    #[must_use]
    pub fn is_derived(self) -> bool {
        Self::DERIVED.contains(&self)
    }

    /// Whether the field holds free text
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(
            self,
            CanonicalField::Title
                | CanonicalField::Author
                | CanonicalField::Type
                | CanonicalField::Magazine
                | CanonicalField::Publisher
                | CanonicalField::Volume
                | CanonicalField::Link
        )
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CanonicalField {
    type Err = Error;

    /// Accepts the canonical name or the table label, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize_name(s);
        Self::SOURCE
            .iter()
            .chain(Self::DERIVED.iter())
            .copied()
            .find(|f| normalize_name(f.name()) == wanted || normalize_name(f.label()) == wanted)
            .ok_or_else(|| Error::config(format!("Unknown field: {s}")))
    }
}

/// Synonym table used by the schema resolver
///
/// For every source field an ordered list of acceptable column names;
/// matching trims and ignores case on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHints {
    synonyms: IndexMap<CanonicalField, Vec<String>>,
    mandatory: Vec<CanonicalField>,
}

impl Default for ColumnHints {
    fn default() -> Self {
        let table: [(CanonicalField, &[&str]); 9] = [
            (CanonicalField::Title, &["Title", "Book Title", "Work"]),
            (CanonicalField::Author, &["Author", "Writer"]),
            (CanonicalField::Type, &["Type", "Category", "Genre"]),
            (
                CanonicalField::Magazine,
                &["Magazine", "Journal", "Publication"],
            ),
            (CanonicalField::Publisher, &["Publisher", "Publishing House"]),
            (
                CanonicalField::PublishedDate,
                &["Published date", "Publish date", "Date Published"],
            ),
            (CanonicalField::Volume, &["Vol", "Volume"]),
            (CanonicalField::Link, &["Link", "URL"]),
            (CanonicalField::Status, &["STATUS", "Status"]),
        ];

        let synonyms = table
            .into_iter()
            .map(|(field, names)| (field, names.iter().map(|n| (*n).to_string()).collect()))
            .collect();

        Self {
            synonyms,
            mandatory: vec![CanonicalField::Title, CanonicalField::Author],
        }
    }
}

impl ColumnHints {
    /// Synonyms for a field, in preference order
    #[must_use]
    pub fn synonyms(&self, field: CanonicalField) -> &[String] {
        self.synonyms.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Replace the synonym list of a source field
    pub fn with_synonyms<I, S>(mut self, field: CanonicalField, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if field.is_derived() {
            return Err(Error::config(format!(
                "{field} is derived and cannot be bound to a column"
            )));
        }
        self.synonyms
            .insert(field, names.into_iter().map(Into::into).collect());
        Ok(self)
    }

    /// Replace the set of fields whose absence fails the load
    #[must_use]
    pub fn with_mandatory(mut self, fields: Vec<CanonicalField>) -> Self {
        self.mandatory = fields;
        self
    }

    /// Fields whose absence fails the load
    #[must_use]
    pub fn mandatory(&self) -> &[CanonicalField] {
        &self.mandatory
    }

    /// Whether a raw column name is an accepted synonym for the field
    #[must_use]
    pub fn matches(&self, field: CanonicalField, column: &str) -> bool {
        let column = normalize_name(column);
        self.synonyms(field)
            .iter()
            .any(|name| normalize_name(name) == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(CanonicalField::PublishedDate.label(), "Published date");
        assert_eq!(CanonicalField::Volume.label(), "Vol");
        assert_eq!(CanonicalField::Title.label(), "Title");
    }

    #[test]
    fn test_from_str_accepts_name_and_label() {
        assert_eq!(
            "publisheddate".parse::<CanonicalField>().unwrap(),
            CanonicalField::PublishedDate
        );
        assert_eq!(
            "Published date".parse::<CanonicalField>().unwrap(),
            CanonicalField::PublishedDate
        );
        assert_eq!("vol".parse::<CanonicalField>().unwrap(), CanonicalField::Volume);
        assert!("nope".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn test_default_hints_match_case_insensitively() {
        let hints = ColumnHints::default();
        assert!(hints.matches(CanonicalField::Title, " book title "));
        assert!(hints.matches(CanonicalField::PublishedDate, "DATE PUBLISHED"));
        assert!(hints.matches(CanonicalField::Status, "status"));
        assert!(!hints.matches(CanonicalField::Author, "Title"));
    }

    #[test]
    fn test_with_synonyms_rejects_derived() {
        let hints = ColumnHints::default();
        assert!(hints
            .clone()
            .with_synonyms(CanonicalField::Year, ["yr"])
            .is_err());
        let hints = hints
            .with_synonyms(CanonicalField::Author, ["Poet"])
            .unwrap();
        assert!(hints.matches(CanonicalField::Author, "poet"));
        assert!(!hints.matches(CanonicalField::Author, "Author"));
    }
}
