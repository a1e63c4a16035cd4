//! Command-line interface for corpusq
//!
//! This module defines the argument structure with clap and converts the
//! filter flags shared by several subcommands into a [`FilterSpec`].

use clap::{Args, Parser, Subcommand, ValueEnum};
use corpusq_filter::FilterSpec;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;

/// corpusq - filter and question a literary corpus catalog
///
/// corpusq loads a CSV catalog of literary works, maps its columns onto a
/// fixed set of fields whatever they are called, and answers a catalog of
/// aggregate questions over any filtered slice of it.
#[derive(Parser, Debug)]
#[command(name = "corpusq")]
#[command(author, version, about)]
#[command(after_help = "EXAMPLES:\n  \
    # Resolution report and headline numbers\n  \
    corpusq summary catalog.csv\n\n  \
    # Stories in two magazines during the nineties\n  \
    corpusq filter catalog.csv --type కథ --magazine Bharati --magazine Chandamama --year-range 1990..1999\n\n  \
    # Ask one question of a filtered view\n  \
    corpusq ask catalog.csv top_authors --status active\n\n  \
    # Drill down into one author\n  \
    corpusq author catalog.csv 'Sri Sri' --year 1950")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file to use
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Limit table output to N rows
    #[arg(long, value_name = "N", global = true)]
    pub limit: Option<usize>,

    /// CSV field separator (default: ,)
    #[arg(long = "csv-separator", value_name = "SEP", global = true)]
    pub csv_separator: Option<String>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show how columns were resolved and the headline metrics
    Summary {
        /// CSV catalog
        file: PathBuf,
    },

    /// List the values offered by each filter
    Facets {
        /// CSV catalog
        file: PathBuf,
    },

    /// Show a positional window of rows
    #[command(after_help = "EXAMPLES:\n  \
        corpusq preview catalog.csv --start 100 --end 150")]
    Preview {
        /// CSV catalog
        file: PathBuf,

        /// First row of the window
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// End of the window, exclusive
        #[arg(long)]
        end: Option<usize>,
    },

    /// Filter records and print the matching rows
    Filter {
        /// CSV catalog
        file: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List the available questions
    Queries,

    /// Answer one question on the filtered view
    #[command(after_help = "EXAMPLES:\n  \
        corpusq ask catalog.csv stories_after_1990\n  \
        corpusq ask catalog.csv top_magazines --year-range 1980..1989")]
    Ask {
        /// CSV catalog
        file: PathBuf,

        /// Query key, as listed by `corpusq queries`
        key: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Overview of a single author across all years
    #[command(after_help = "EXAMPLES:\n  \
        corpusq author catalog.csv 'Sri Sri' --year 1950\n  \
        corpusq author catalog.csv 'Sri Sri' --magazine Bharati --status active")]
    Author {
        /// CSV catalog
        file: PathBuf,

        /// Author name, exactly as in the catalog
        name: String,

        /// Also report the unique titles published in this year
        #[arg(long)]
        year: Option<i32>,

        #[command(flatten)]
        timeline: TimelineArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Create default configuration file
    Init {
        /// Path to create config file
        #[arg(default_value = "corpusq.toml")]
        path: PathBuf,

        /// Force overwrite if file exists
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain-text tables
    #[default]
    Text,
    /// JSON documents
    Json,
}

/// Status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Records flagged active
    Active,
    /// Records flagged inactive
    Inactive,
}

/// Inclusive year bounds, written `MIN..MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    /// Lower bound
    pub min: i32,
    /// Upper bound
    pub max: i32,
}

/// Filter flags shared by `filter` and `ask`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Publication year
    #[arg(long, conflicts_with = "year_range")]
    pub year: Option<i32>,

    /// Publication years, inclusive (MIN..MAX)
    #[arg(long, value_name = "MIN..MAX", value_parser = parse_year_range)]
    pub year_range: Option<YearRange>,

    /// Content type (can be used multiple times)
    #[arg(long = "type", value_name = "TYPE", action = clap::ArgAction::Append)]
    pub types: Vec<String>,

    /// Magazine (can be used multiple times)
    #[arg(long = "magazine", value_name = "NAME", action = clap::ArgAction::Append)]
    pub magazines: Vec<String>,

    /// Active or inactive records only
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Author, exact match
    #[arg(long)]
    pub author: Option<String>,

    /// Publisher, exact match
    #[arg(long)]
    pub publisher: Option<String>,

    /// Case-insensitive text search over title, author, type, publisher and magazine
    #[arg(long)]
    pub search: Option<String>,

    /// Dataset positions to keep (START..END, end exclusive)
    #[arg(long, value_name = "START..END", value_parser = parse_row_range)]
    pub rows: Option<Range<usize>>,
}

/// Slots that narrow the author timeline
#[derive(Args, Debug, Clone, Default)]
pub struct TimelineArgs {
    /// Timeline content type (can be used multiple times)
    #[arg(long = "type", value_name = "TYPE", action = clap::ArgAction::Append)]
    pub types: Vec<String>,

    /// Timeline magazine (can be used multiple times)
    #[arg(long = "magazine", value_name = "NAME", action = clap::ArgAction::Append)]
    pub magazines: Vec<String>,

    /// Active or inactive timeline records only
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

impl TimelineArgs {
    /// Filter specification applied on top of the author's records
    pub fn to_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::default();
        if !self.types.is_empty() {
            spec = spec.types(self.types.iter().cloned());
        }
        if !self.magazines.is_empty() {
            spec = spec.magazines(self.magazines.iter().cloned());
        }
        if let Some(status) = self.status {
            spec = spec.status(status == StatusArg::Active);
        }
        spec
    }
}

impl FilterArgs {
    /// Build the filter specification these flags describe
    pub fn to_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::default();
        if let Some(year) = self.year {
            spec = spec.year(year);
        }
        if let Some(range) = self.year_range {
            spec = spec.year_range(range.min, range.max);
        }
        if !self.types.is_empty() {
            spec = spec.types(self.types.iter().cloned());
        }
        if !self.magazines.is_empty() {
            spec = spec.magazines(self.magazines.iter().cloned());
        }
        if let Some(status) = self.status {
            spec = spec.status(status == StatusArg::Active);
        }
        if let Some(author) = &self.author {
            spec = spec.author(author.clone());
        }
        if let Some(publisher) = &self.publisher {
            spec = spec.publisher(publisher.clone());
        }
        if let Some(search) = &self.search {
            spec = spec.search(search.clone());
        }
        if let Some(rows) = &self.rows {
            spec = spec.rows(rows.clone());
        }
        spec
    }
}

fn split_range(s: &str) -> Result<(&str, &str), String> {
    s.split_once("..")
        .map(|(a, b)| (a.trim(), b.trim()))
        .ok_or_else(|| format!("expected a range like A..B, got '{s}'"))
}

fn parse_year_range(s: &str) -> Result<YearRange, String> {
    let (min, max) = split_range(s)?;
    let min: i32 = min.parse().map_err(|_| format!("invalid year '{min}'"))?;
    let max: i32 = max.parse().map_err(|_| format!("invalid year '{max}'"))?;
    if min > max {
        return Err(format!("year range {min}..{max} is empty"));
    }
    Ok(YearRange { min, max })
}

fn parse_row_range(s: &str) -> Result<Range<usize>, String> {
    let (start, end) = split_range(s)?;
    let start: usize = start.parse().map_err(|_| format!("invalid row '{start}'"))?;
    let end: usize = end.parse().map_err(|_| format!("invalid row '{end}'"))?;
    Ok(start..end)
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Parse command-line arguments from a vector (for testing)
pub fn parse_args_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpusq_filter::FilterSlot;

    #[test]
    fn test_ask_with_filters() {
        let cli = parse_args_from([
            "corpusq",
            "ask",
            "catalog.csv",
            "top_authors",
            "--type",
            "కథ",
            "--type",
            "కవిత",
            "--year-range",
            "1990..1999",
            "--status",
            "inactive",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        let Commands::Ask { file, key, filter } = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(file, PathBuf::from("catalog.csv"));
        assert_eq!(key, "top_authors");
        assert_eq!(filter.types, vec!["కథ", "కవిత"]);
        assert_eq!(filter.year_range, Some(YearRange { min: 1990, max: 1999 }));
        assert_eq!(
            filter.to_spec().constrained_slots(),
            vec![FilterSlot::Year, FilterSlot::Type, FilterSlot::Status]
        );
    }

    #[test]
    fn test_ranges_are_validated() {
        assert!(parse_year_range("2000..1990").is_err());
        assert!(parse_year_range("1990").is_err());
        assert_eq!(parse_row_range(" 10 .. 20 ").unwrap(), 10..20);
        assert!(parse_args_from(["corpusq", "filter", "f.csv", "--rows", "a..b"]).is_err());
    }

    #[test]
    fn test_year_conflicts_with_range() {
        let result = parse_args_from([
            "corpusq",
            "filter",
            "f.csv",
            "--year",
            "1990",
            "--year-range",
            "1990..1995",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse_args_from(["corpusq", "summary", "f.csv", "-vv", "--limit", "5"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.limit, Some(5));
        assert!(matches!(cli.command, Commands::Summary { .. }));
    }

    #[test]
    fn test_author_timeline_flags() {
        let cli = parse_args_from([
            "corpusq",
            "author",
            "catalog.csv",
            "Sri Sri",
            "--year",
            "1950",
            "--magazine",
            "Bharati",
            "--status",
            "active",
        ])
        .unwrap();
        let Commands::Author {
            name,
            year,
            timeline,
            ..
        } = cli.command
        else {
            panic!("expected author");
        };
        assert_eq!(name, "Sri Sri");
        assert_eq!(year, Some(1950));
        assert_eq!(
            timeline.to_spec().constrained_slots(),
            vec![FilterSlot::Magazine, FilterSlot::Status]
        );
    }

    #[test]
    fn test_empty_filter_is_unconstrained() {
        assert!(FilterArgs::default().to_spec().is_unconstrained());
    }
}
