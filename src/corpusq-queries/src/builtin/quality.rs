//! Data quality audits: missing values and repeated titles

use corpusq_core::{CanonicalField, FilteredView, QueryResult, Result, Shape, Table};

use crate::aggregate::{count_by, count_where, distinct, texts, top_n};
use crate::params::QueryParams;
use crate::registry::{QueryRegistration, Section};

/// Fields reported by [`missing_values`], in display order
const AUDITED: [CanonicalField; 8] = [
    CanonicalField::Author,
    CanonicalField::Title,
    CanonicalField::Type,
    CanonicalField::PublishedDate,
    CanonicalField::Publisher,
    CanonicalField::Magazine,
    CanonicalField::Volume,
    CanonicalField::Link,
];

fn missing(view: &FilteredView<'_>, field: CanonicalField) -> usize {
    count_where(view, |r| r.is_null(field))
}

/// Null counts per audited field. A field the dataset lacks is null in
/// every record.
pub fn missing_values(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let rows = AUDITED.iter().map(|&field| (field.label(), missing(view, field)));
    Ok(Table::from_counts("Column", "Missing Values", rows).into_result())
}

/// Records without a publication date
pub fn missing_dates(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    Ok(missing(view, CanonicalField::PublishedDate).into_result())
}

pub fn missing_volumes(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    Ok(missing(view, CanonicalField::Volume).into_result())
}

pub fn missing_magazines(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    Ok(missing(view, CanonicalField::Magazine).into_result())
}

/// Non-null titles minus distinct titles
pub fn duplicate_title_count(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let total = texts(view, CanonicalField::Title).count();
    let unique = distinct(texts(view, CanonicalField::Title));
    Ok((total - unique).into_result())
}

/// Ten titles that occur more than once, most repeated first
pub fn top_duplicated_titles(view: &FilteredView<'_>, _params: &QueryParams) -> Result<QueryResult> {
    let mut counts = count_by(texts(view, CanonicalField::Title));
    counts.retain(|_, n| *n > 1);
    Ok(Table::from_counts("Title", "Count", top_n(counts, Some(10))).into_result())
}

inventory::submit! {
    QueryRegistration {
        key: "missing_values",
        question: "Any unknown data?",
        section: Section::Quality,
        rank: 1,
        params: &[],
        func: missing_values,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "missing_dates",
        question: "How many missing publication dates?",
        section: Section::Quality,
        rank: 2,
        params: &[],
        func: missing_dates,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "missing_volumes",
        question: "How many records are missing volume info?",
        section: Section::Quality,
        rank: 3,
        params: &[],
        func: missing_volumes,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "missing_magazines",
        question: "How many records are missing magazine info?",
        section: Section::Quality,
        rank: 4,
        params: &[],
        func: missing_magazines,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "duplicate_title_count",
        question: "Are there duplicate titles?",
        section: Section::Quality,
        rank: 5,
        params: &[],
        func: duplicate_title_count,
    }
}

inventory::submit! {
    QueryRegistration {
        key: "top_duplicated_titles",
        question: "Top 10 duplicated titles",
        section: Section::Quality,
        rank: 6,
        params: &[],
        func: top_duplicated_titles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpusq_core::{resolve, ColumnHints, Dataset, RawTable, Value};
    use pretty_assertions::assert_eq;

    fn dataset(rows: &[(&str, &str, &str)]) -> Dataset {
        let records = rows.iter().map(|(title, magazine, date)| {
            vec![
                ("Title", Value::from(*title)),
                ("Author", Value::from("A")),
                ("Magazine", Value::from(*magazine)),
                ("Published date", Value::from(*date)),
            ]
        });
        resolve(&RawTable::from_records(records), &ColumnHints::default())
            .unwrap()
            .dataset
    }

    #[test]
    fn test_missing_values_table() {
        let ds = dataset(&[
            ("X", "M", "2001-01-01"),
            ("", "M", "garbage"),
            ("Y", "", ""),
        ]);
        let result = missing_values(&ds.view(), &QueryParams::default()).unwrap();
        let table = result.as_table().unwrap();
        assert_eq!(table.columns(), ["Column", "Missing Values"]);
        assert_eq!(
            table.column("Column").unwrap(),
            vec![
                &Value::from("Author"),
                &Value::from("Title"),
                &Value::from("Type"),
                &Value::from("Published date"),
                &Value::from("Publisher"),
                &Value::from("Magazine"),
                &Value::from("Vol"),
                &Value::from("Link")
            ]
        );
        assert_eq!(
            table.column("Missing Values").unwrap(),
            vec![
                &Value::Int(0),
                &Value::Int(1),
                &Value::Int(3),
                &Value::Int(2),
                &Value::Int(3),
                &Value::Int(1),
                &Value::Int(3),
                &Value::Int(3)
            ]
        );
    }

    #[test]
    fn test_duplicates() {
        let ds = dataset(&[
            ("X", "", ""),
            ("X", "", ""),
            ("Y", "", ""),
            ("Z", "", ""),
            ("Z", "", ""),
            ("X", "", ""),
            ("", "", ""),
        ]);
        let view = ds.view();
        let p = QueryParams::default();
        assert_eq!(
            duplicate_title_count(&view, &p).unwrap().value(),
            Some(&Value::Int(3))
        );
        let top = top_duplicated_titles(&view, &p).unwrap();
        assert_eq!(
            top.as_table().unwrap().rows(),
            &[
                vec![Value::from("X"), Value::Int(3)],
                vec![Value::from("Z"), Value::Int(2)]
            ]
        );
    }

    #[test]
    fn test_missing_magazines_two_of_ten() {
        let magazines = ["M1", "", "M2", "M1", "M3", "", "M1", "M2", "M3", "M4"];
        let rows: Vec<(&str, &str, &str)> = magazines
            .iter()
            .map(|m| ("T", *m, "2000-01-01"))
            .collect();
        let ds = dataset(&rows);
        let result = missing_magazines(&ds.view(), &QueryParams::default()).unwrap();
        assert_eq!(result.value(), Some(&Value::Int(2)));
    }
}
