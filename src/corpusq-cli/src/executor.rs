//! Command execution for the corpusq CLI
//!
//! The [`Executor`] owns everything a command needs between invocations:
//! the effective configuration, the query registry with configured parameter
//! overrides, and the dataset load cache. Each command returns its rendered
//! output so it can be tested without capturing stdout.

use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::{create_default_config_file, Config};
use crate::output::OutputWriter;
use corpusq_core::{
    CanonicalField, ColumnHints, CsvOptions, DatasetCache, FilteredView, QueryResult, Resolution,
    ResolutionReport, Table, ViewSummary,
};
use corpusq_filter::{preview, Facets, FilterSpec};
use corpusq_queries::aggregate::{distinct, texts};
use corpusq_queries::{QueryInfo, QueryRegistry, Section};
use corpusq_shared::constants::DEFAULT_PREVIEW_ROWS;
use corpusq_shared::error::{config_error, operation_error};
use corpusq_shared::Result;

const TIMELINE_QUERY: &str = "publication_timeline";

/// Main executor for corpusq commands
pub struct Executor {
    config: Config,
    registry: QueryRegistry,
    cache: DatasetCache,
    csv: CsvOptions,
    hints: ColumnHints,
    writer: OutputWriter,
}

#[derive(Serialize)]
struct SummaryDoc<'a> {
    records: usize,
    resolution: &'a ResolutionReport,
    overview: QueryResult,
}

#[derive(Serialize)]
struct RowsDoc {
    summary: ViewSummary,
    rows: Table,
}

#[derive(Serialize)]
struct AnswerDoc<'a> {
    key: &'a str,
    question: &'a str,
    records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<QueryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize)]
struct AuthorDoc<'a> {
    author: &'a str,
    year: Option<i32>,
    records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    year_unique_titles: Option<usize>,
    sections: Vec<AnswerDoc<'a>>,
}

impl Executor {
    /// Create a new executor with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let mut registry = QueryRegistry::new();
        config.apply_query_params(&mut registry)?;
        let csv = config.csv_options()?;
        let hints = config.column_hints()?;
        let cache = DatasetCache::new(config.io.cache_size);
        let writer = OutputWriter::new(&config);
        Ok(Self {
            config,
            registry,
            cache,
            csv,
            hints,
            writer,
        })
    }

    /// Replace the output writer
    #[must_use]
    pub fn with_writer(mut self, writer: OutputWriter) -> Self {
        self.writer = writer;
        self
    }

    /// The effective configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The query registry in use
    pub fn registry(&self) -> &QueryRegistry {
        &self.registry
    }

    /// Load and resolve a CSV catalog, reusing a cached resolution
    pub fn load(&mut self, path: &Path) -> Result<Arc<Resolution>> {
        let resolution = self.cache.load(path, &self.csv, &self.hints)?;
        for warning in &resolution.report.warnings {
            warn!("{}: {}", path.display(), warning);
        }
        info!(
            "Loaded {} records from {}",
            resolution.dataset.len(),
            path.display()
        );
        Ok(resolution)
    }

    /// Resolution report and headline metrics
    pub fn summary(&mut self, path: &Path) -> Result<String> {
        let resolution = self.load(path)?;
        let dataset = &resolution.dataset;
        let report = &resolution.report;
        let overview = self.registry.evaluate("overview", &dataset.view())?;

        if self.writer.format() == OutputFormat::Json {
            return self.writer.json(&SummaryDoc {
                records: dataset.len(),
                resolution: report,
                overview,
            });
        }

        let mut out = String::new();
        let _ = writeln!(out, "Records: {}", dataset.len());
        let _ = writeln!(out, "Columns:");
        for (field, column) in &report.bindings {
            let _ = writeln!(out, "  {:<14} <- {}", field.label(), column);
        }
        if !report.extra_columns.is_empty() {
            let _ = writeln!(out, "Extra columns: {}", report.extra_columns.join(", "));
        }
        for warning in &report.warnings {
            let _ = writeln!(out, "Warning: {}", warning);
        }
        out.push('\n');
        out.push_str(&self.writer.render_result("Overview", &overview));
        Ok(out)
    }

    /// Values offered by each filter
    pub fn facets(&mut self, path: &Path) -> Result<String> {
        let resolution = self.load(path)?;
        let facets = Facets::collect(&resolution.dataset);

        if self.writer.format() == OutputFormat::Json {
            return self.writer.json(&facets);
        }

        let mut out = String::new();
        match facets.year_bounds {
            Some((min, max)) => {
                let _ = writeln!(out, "Years: {}..{} ({} distinct)", min, max, facets.years.len());
            }
            None => {
                let _ = writeln!(out, "Years: none");
            }
        }
        let _ = writeln!(out, "Types: {}", list_or_none(&facets.types));
        let _ = writeln!(out, "Magazines: {}", list_or_none(&facets.magazines));
        let statuses: Vec<String> = facets
            .statuses
            .iter()
            .map(|active| if *active { "active" } else { "inactive" }.to_string())
            .collect();
        let _ = writeln!(out, "Status: {}", list_or_none(&statuses));
        let _ = writeln!(out, "Publishers: {}", list_or_none(&facets.publishers));
        let _ = writeln!(out, "Authors: {}", list_or_none(&facets.authors));
        Ok(out)
    }

    /// Positional window of rows; `end` defaults to a full preview page
    pub fn preview(&mut self, path: &Path, start: usize, end: Option<usize>) -> Result<String> {
        let resolution = self.load(path)?;
        let end = end.unwrap_or_else(|| start.saturating_add(DEFAULT_PREVIEW_ROWS));
        let view = preview(&resolution.dataset, start..end);
        debug!("Preview window {}..{} holds {} rows", start, end, view.len());
        self.render_rows(&view, None)
    }

    /// Filtered row count and the matching rows
    pub fn filter(&mut self, path: &Path, spec: &FilterSpec) -> Result<String> {
        let resolution = self.load(path)?;
        let view = spec.apply(&resolution.dataset);
        let cap = self.writer.limit().unwrap_or(DEFAULT_PREVIEW_ROWS);
        self.render_rows(&view, Some(cap))
    }

    /// Available questions grouped by section
    pub fn queries(&self) -> Result<String> {
        let described = self.registry.describe();
        if self.writer.format() == OutputFormat::Json {
            return self.writer.json(&described);
        }

        let width = described.iter().map(|q| q.key.len()).max().unwrap_or(0);
        let mut out = String::new();
        let mut current: Option<Section> = None;
        for info in &described {
            if current != Some(info.section) {
                if current.is_some() {
                    out.push('\n');
                }
                let _ = writeln!(out, "{}", info.section);
                current = Some(info.section);
            }
            let _ = writeln!(out, "  {:<width$}  {}", info.key, info.question);
            for (name, value) in &info.params {
                let _ = writeln!(out, "  {:<width$}    {} = {}", "", name, value);
            }
        }
        Ok(out)
    }

    /// Answer one question on the filtered view
    pub fn ask(&mut self, path: &Path, key: &str, spec: &FilterSpec) -> Result<String> {
        let info = self.registry.info(key)?;
        let resolution = self.load(path)?;
        let view = spec.apply(&resolution.dataset);
        let answer = self.answer(&info, &view)?;

        if self.writer.format() == OutputFormat::Json {
            return self.writer.json(&answer);
        }
        Ok(self.render_answer(&answer))
    }

    /// Overview of a single author across all years.
    ///
    /// `year` adds the author's unique-title count for that year without
    /// narrowing the overview. `timeline` narrows only the publication
    /// timeline, on top of the author's records.
    pub fn author(
        &mut self,
        path: &Path,
        name: &str,
        year: Option<i32>,
        timeline: &FilterSpec,
    ) -> Result<String> {
        let resolution = self.load(path)?;
        let author_view = FilterSpec::default().author(name).apply(&resolution.dataset);
        let timeline_view = timeline.apply_to(&author_view);
        let year_titles = year.map(|year| {
            let year_view = FilterSpec::default().year(year).apply_to(&author_view);
            distinct(texts(&year_view, CanonicalField::Title))
        });

        let infos: Vec<QueryInfo> = self
            .registry
            .section(Section::AuthorOverview)
            .into_iter()
            .map(|key| self.registry.info(key))
            .collect::<std::result::Result<_, _>>()?;
        let sections = infos
            .iter()
            .map(|info| {
                if info.key == TIMELINE_QUERY {
                    self.answer(info, &timeline_view)
                } else {
                    self.answer(info, &author_view)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        if self.writer.format() == OutputFormat::Json {
            return self.writer.json(&AuthorDoc {
                author: name,
                year,
                records: author_view.len(),
                year_unique_titles: year_titles,
                sections,
            });
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}: {} records", name, author_view.len());
        if let (Some(year), Some(count)) = (year, year_titles) {
            let _ = writeln!(out, "Unique titles in {}: {}", year, count);
        }
        for section in &sections {
            out.push('\n');
            out.push_str(&self.render_answer(section));
        }
        Ok(out)
    }

    /// Effective configuration as YAML
    pub fn config_show(&self) -> Result<String> {
        serde_yaml::to_string(&self.config)
            .map_err(|e| config_error(format!("Failed to serialize config: {}", e)))
    }

    /// Write a default configuration file
    pub fn config_init(path: &Path, force: bool) -> Result<String> {
        if path.exists() && !force {
            return Err(config_error(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        create_default_config_file(path)?;
        Ok(format!("Created configuration file {}\n", path.display()))
    }

    fn answer<'a>(&self, info: &'a QueryInfo, view: &FilteredView<'_>) -> Result<AnswerDoc<'a>> {
        debug!("Evaluating '{}' over {} records", info.key, view.len());
        let (result, message) = match self.registry.evaluate(&info.key, view) {
            Ok(result) => (Some(result), None),
            Err(e) if e.is_no_data() => (None, Some(e.to_string())),
            Err(e) => return Err(e.into()),
        };
        Ok(AnswerDoc {
            key: &info.key,
            question: &info.question,
            records: view.len(),
            result,
            message,
        })
    }

    fn render_answer(&self, answer: &AnswerDoc<'_>) -> String {
        match (&answer.result, &answer.message) {
            (Some(result), _) => self.writer.render_result(answer.question, result),
            (None, Some(message)) => format!("{}: {}\n", answer.question, message),
            (None, None) => format!("{}\n", answer.question),
        }
    }

    fn render_rows(&self, view: &FilteredView<'_>, cap: Option<usize>) -> Result<String> {
        let mut table = view_table(view)?;
        if let Some(cap) = cap {
            table.truncate(cap);
        }

        if self.writer.format() == OutputFormat::Json {
            return self.writer.json(&RowsDoc {
                summary: ViewSummary::from(view),
                rows: table,
            });
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} of {} records",
            view.len(),
            view.dataset().len()
        );
        if table.len() < view.len() {
            let _ = writeln!(out, "(showing first {})", table.len());
        }
        out.push_str(&self.writer.render_table(&table));
        Ok(out)
    }
}

fn view_table(view: &FilteredView<'_>) -> Result<Table> {
    let dataset = view.dataset();
    let mut table = Table::new(dataset.headers());
    for record in view.iter() {
        table
            .push_row(dataset.row_cells(record))
            .map_err(|e| operation_error(e.to_string()))?;
    }
    Ok(table)
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CATALOG: &str = "\
Book Title,Writer,Category,Journal,Publisher,Published date,STATUS,Notes
Maro Prapancham,Sri Sri,కవిత,Bharati,Visalandhra,1950-01-01,True,first
Maro Prapancham,Sri Sri,కవిత,Bharati,Visalandhra,1950-03-01,True,
Khadga Srushti,Sri Sri,కవిత,Andhra Patrika,Visalandhra,1966-05-01,False,
Maidanam,Chalam,కథ,Bharati,Navodaya,1927-02-01,True,
Amaravati Kathalu,Satyam Sankaramanchi,కథ,,Navodaya,not a date,True,
";

    fn catalog() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.csv");
        fs::write(&path, CATALOG).unwrap();
        (dir, path)
    }

    fn executor(format: OutputFormat) -> Executor {
        Executor::new(Config::default())
            .unwrap()
            .with_writer(OutputWriter::with_settings(format, None, false))
    }

    #[test]
    fn test_summary_reports_bindings_and_warnings() {
        let (_dir, path) = catalog();
        let out = executor(OutputFormat::Text).summary(&path).unwrap();
        assert!(out.starts_with("Records: 5\n"));
        assert!(out.contains("<- Book Title"));
        assert!(out.contains("Extra columns: Notes"));
        assert!(out.contains("not valid dates"));
        assert!(out.contains("Unique Authors"));
    }

    #[test]
    fn test_filter_counts_and_rows() {
        let (_dir, path) = catalog();
        let spec = FilterSpec::default().types(["కథ"]);
        let out = executor(OutputFormat::Text).filter(&path, &spec).unwrap();
        assert!(out.starts_with("2 of 5 records\n"));
        assert!(out.contains("Maidanam"));
        assert!(!out.contains("Khadga Srushti"));
    }

    #[test]
    fn test_filter_respects_limit() {
        let (_dir, path) = catalog();
        let mut executor = Executor::new(Config::default())
            .unwrap()
            .with_writer(OutputWriter::with_settings(OutputFormat::Text, Some(1), false));
        let out = executor.filter(&path, &FilterSpec::default()).unwrap();
        assert!(out.contains("(showing first 1)"));
    }

    #[test]
    fn test_ask_scalar_and_json() {
        let (_dir, path) = catalog();
        let spec = FilterSpec::default();
        let out = executor(OutputFormat::Text)
            .ask(&path, "poem_count", &spec)
            .unwrap();
        assert!(out.ends_with(": 3\n"));

        let json = executor(OutputFormat::Json)
            .ask(&path, "top_authors", &spec)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["key"], "top_authors");
        assert_eq!(parsed["records"], 5);
        assert_eq!(parsed["result"]["kind"], "table");
    }

    #[test]
    fn test_ask_unknown_query_fails_before_loading() {
        let mut executor = executor(OutputFormat::Text);
        let err = executor
            .ask(Path::new("does-not-exist.csv"), "no_such_query", &FilterSpec::default())
            .unwrap_err();
        assert!(err.to_string().contains("Unknown query"));
    }

    #[test]
    fn test_ask_empty_selection_is_a_message() {
        let (_dir, path) = catalog();
        let spec = FilterSpec::default().year(1800);
        let out = executor(OutputFormat::Text)
            .ask(&path, "busiest_year", &spec)
            .unwrap();
        assert!(out.contains("No data available"));
    }

    #[test]
    fn test_author_overview() {
        let (_dir, path) = catalog();
        let out = executor(OutputFormat::Text)
            .author(&path, "Sri Sri", None, &FilterSpec::default())
            .unwrap();
        assert!(out.starts_with("Sri Sri: 3 records\n"));
        assert!(out.contains("Maro Prapancham"));
        assert!(!out.contains("Unique titles in"));
    }

    #[test]
    fn test_author_year_count_leaves_summary_unnarrowed() {
        let (_dir, path) = catalog();
        let json = executor(OutputFormat::Json)
            .author(&path, "Sri Sri", Some(1966), &FilterSpec::default())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["records"], 3);
        assert_eq!(parsed["year_unique_titles"], 1);

        let summary = &parsed["sections"][0];
        assert_eq!(summary["key"], "title_summary");
        assert_eq!(
            summary["result"]["rows"][0],
            serde_json::json!(["Sri Sri", 3, 2, 1])
        );

        let out = executor(OutputFormat::Text)
            .author(&path, "Sri Sri", Some(1966), &FilterSpec::default())
            .unwrap();
        assert!(out.starts_with("Sri Sri: 3 records\nUnique titles in 1966: 1\n"));
    }

    #[test]
    fn test_author_timeline_follows_sidebar_slots() {
        let (_dir, path) = catalog();
        let timeline = FilterSpec::default().magazines(["Andhra Patrika"]);
        let json = executor(OutputFormat::Json)
            .author(&path, "Sri Sri", None, &timeline)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let sections = parsed["sections"].as_array().unwrap();
        let section = |key: &str| {
            sections
                .iter()
                .find(|s| s["key"] == key)
                .unwrap()
                .clone()
        };

        let rows = section("publication_timeline")["result"]["rows"].clone();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0][1], "Khadga Srushti");

        let listing = section("titles_listing")["result"]["rows"].clone();
        assert_eq!(listing.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_preview_window() {
        let (_dir, path) = catalog();
        let out = executor(OutputFormat::Text)
            .preview(&path, 3, Some(4))
            .unwrap();
        assert!(out.starts_with("1 of 5 records\n"));
        assert!(out.contains("Maidanam"));
    }

    #[test]
    fn test_facets_text() {
        let (_dir, path) = catalog();
        let out = executor(OutputFormat::Text).facets(&path).unwrap();
        assert!(out.contains("Years: 1927..1966 (3 distinct)"));
        assert!(out.contains("Magazines: Bharati, Andhra Patrika"));
        assert!(out.contains("Status: active, inactive"));
    }

    #[test]
    fn test_queries_grouped_by_section() {
        let out = executor(OutputFormat::Text).queries().unwrap();
        assert!(out.starts_with("Author analysis\n"));
        assert!(out.contains("stories_after_1990"));
        assert!(out.contains("after_year = 1990"));
    }

    #[test]
    fn test_config_param_overrides_reach_queries() {
        let (_dir, path) = catalog();
        let mut config = Config::default();
        config
            .queries
            .entry("stories_after_1990".to_string())
            .or_default()
            .insert("after_year".to_string(), corpusq_shared::Value::Int(1900));
        let mut executor = Executor::new(config)
            .unwrap()
            .with_writer(OutputWriter::with_settings(OutputFormat::Text, None, false));
        let out = executor
            .ask(&path, "stories_after_1990", &FilterSpec::default())
            .unwrap();
        assert!(out.ends_with(": 1\n"));
    }

    #[test]
    fn test_config_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corpusq.toml");
        Executor::config_init(&path, false).unwrap();
        assert!(Executor::config_init(&path, false).is_err());
        assert!(Executor::config_init(&path, true).is_ok());

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_loads_are_cached() {
        let (_dir, path) = catalog();
        let mut executor = executor(OutputFormat::Text);
        let first = executor.load(&path).unwrap();
        let second = executor.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
