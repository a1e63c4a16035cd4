//! Configuration management for corpusq
//!
//! Configuration is layered: built-in defaults, the first config file found
//! in the standard locations, `CORPUSQ_*` environment variables, an explicit
//! `--config FILE`, and finally command-line flags.

use crate::cli::{Cli, OutputFormat};
use corpusq_core::{CanonicalField, ColumnHints, CsvOptions};
use corpusq_queries::QueryRegistry;
use corpusq_shared::error::config_error;
use corpusq_shared::{Result, Value};
use indexmap::IndexMap;
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};

use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 4] = [
    "corpusq.toml",
    ".corpusq.toml",
    "corpusq.yaml",
    ".corpusq.yaml",
];

/// Main configuration structure for corpusq
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSV reading configuration
    pub io: IoConfig,
    /// Column synonym overrides
    pub columns: ColumnsConfig,
    /// Parameter overrides, keyed by query then parameter name
    pub queries: IndexMap<String, IndexMap<String, Value>>,
    /// Display and output configuration
    pub display: DisplayConfig,
    /// Debug and diagnostic configuration
    pub debug: DebugConfig,
}

/// CSV reading configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Field separator, a single character
    pub separator: String,
    /// Whether files have a header row
    pub has_header: bool,
    /// Values to treat as null
    pub null_values: Vec<String>,
    /// Number of resolved datasets kept in memory
    pub cache_size: usize,
}

/// Column synonym overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Replacement synonym lists, keyed by canonical field name
    pub synonyms: IndexMap<String, Vec<String>>,
    /// Fields whose absence fails the load
    pub mandatory: Option<Vec<String>>,
}

/// Display and output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Output format
    pub format: OutputFormat,
    /// Maximum number of table rows to print
    pub limit: Option<usize>,
    /// Whether to use colored output; detected from the terminal when unset
    pub color: Option<bool>,
}

/// Debug and diagnostic configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Verbosity level
    pub verbosity: u8,
}

impl Default for IoConfig {
    fn default() -> Self {
        let csv = CsvOptions::default();
        Self {
            separator: char::from(csv.separator).to_string(),
            has_header: csv.has_header,
            null_values: csv.null_values,
            cache_size: corpusq_shared::constants::DEFAULT_CACHE_SIZE,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            limit: None,
            color: None,
        }
    }
}

impl Config {
    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        Ok(config)
    }

    /// Load configuration from the standard file locations and environment
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file() {
            config.merge_file(&config_path)?;
        }

        config.merge_env()?;

        Ok(config)
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        let mut search = Vec::new();
        search.push(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        if let Some(home) = dirs::home_dir() {
            search.push(home.join(".config").join("corpusq"));
            search.push(home);
        }
        Self::find_config_file_in(&search)
    }

    /// First config file found in the given directories, in order
    pub(crate) fn find_config_file_in(dirs: &[PathBuf]) -> Option<PathBuf> {
        dirs.iter()
            .flat_map(|dir| CONFIG_NAMES.iter().map(move |name| dir.join(name)))
            .find(|path| path.is_file())
    }

    /// Merge configuration from file
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        let file_config: Config = match extension {
            "toml" => toml::from_str(&content)
                .map_err(|e| config_error(format!("Invalid TOML config: {}", e)))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| config_error(format!("Invalid YAML config: {}", e)))?,
            _ => return Err(config_error("Unsupported config file format")),
        };
        self.merge(file_config);

        Ok(())
    }

    /// Merge configuration from environment variables
    fn merge_env(&mut self) -> Result<()> {
        self.merge_env_with_reader(|key| std::env::var(key).ok())
    }

    /// Merge configuration from environment variables with custom reader
    pub(crate) fn merge_env_with_reader<F>(&mut self, env_reader: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // CORPUSQ_VERBOSITY
        if let Some(val) = env_reader("CORPUSQ_VERBOSITY") {
            if let Ok(level) = val.parse() {
                self.debug.verbosity = level;
            }
        }

        // CORPUSQ_SEPARATOR
        if let Some(val) = env_reader("CORPUSQ_SEPARATOR") {
            self.io.separator = val;
        }

        // CORPUSQ_FORMAT
        if let Some(val) = env_reader("CORPUSQ_FORMAT") {
            self.display.format = match val.to_lowercase().as_str() {
                "json" => OutputFormat::Json,
                "text" => OutputFormat::Text,
                other => return Err(config_error(format!("Unknown output format: {}", other))),
            };
        }

        // CORPUSQ_LIMIT
        if let Some(val) = env_reader("CORPUSQ_LIMIT") {
            if let Ok(limit) = val.parse() {
                self.display.limit = Some(limit);
            }
        }

        Ok(())
    }

    /// Merge another config into this one; settings left at their default
    /// in `other` do not override
    fn merge(&mut self, other: Config) {
        let io_defaults = IoConfig::default();
        if other.io.separator != io_defaults.separator {
            self.io.separator = other.io.separator;
        }
        if other.io.has_header != io_defaults.has_header {
            self.io.has_header = other.io.has_header;
        }
        if other.io.null_values != io_defaults.null_values {
            self.io.null_values = other.io.null_values;
        }
        if other.io.cache_size != io_defaults.cache_size {
            self.io.cache_size = other.io.cache_size;
        }

        self.columns.synonyms.extend(other.columns.synonyms);
        if other.columns.mandatory.is_some() {
            self.columns.mandatory = other.columns.mandatory;
        }

        for (query, params) in other.queries {
            self.queries.entry(query).or_default().extend(params);
        }

        if other.display.format != OutputFormat::default() {
            self.display.format = other.display.format;
        }
        if other.display.limit.is_some() {
            self.display.limit = other.display.limit;
        }
        if other.display.color.is_some() {
            self.display.color = other.display.color;
        }

        if other.debug.verbosity != 0 {
            self.debug.verbosity = other.debug.verbosity;
        }
    }

    /// Apply CLI configuration overrides
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(sep) = &cli.csv_separator {
            self.io.separator = sep.clone();
        }
        if let Some(format) = cli.format {
            self.display.format = format;
        }
        if let Some(limit) = cli.limit {
            self.display.limit = Some(limit);
        }
        if cli.verbose > 0 {
            self.debug.verbosity = cli.verbose;
        }
        validate_config(self)
    }

    /// CSV reader options
    pub fn csv_options(&self) -> Result<CsvOptions> {
        let separator = separator_byte(&self.io.separator)?;
        Ok(CsvOptions {
            separator,
            has_header: self.io.has_header,
            null_values: self.io.null_values.clone(),
            ..CsvOptions::default()
        })
    }

    /// Synonym table with the configured overrides applied
    pub fn column_hints(&self) -> Result<ColumnHints> {
        let mut hints = ColumnHints::default();
        for (name, synonyms) in &self.columns.synonyms {
            let field: CanonicalField = name.parse()?;
            hints = hints.with_synonyms(field, synonyms.iter().cloned())?;
        }
        if let Some(mandatory) = &self.columns.mandatory {
            let fields = mandatory
                .iter()
                .map(|name| name.parse::<CanonicalField>())
                .collect::<std::result::Result<Vec<_>, _>>()?;
            hints = hints.with_mandatory(fields);
        }
        Ok(hints)
    }

    /// Apply the configured parameter overrides to a registry
    pub fn apply_query_params(&self, registry: &mut QueryRegistry) -> Result<()> {
        for (query, params) in &self.queries {
            for (name, value) in params {
                registry.set_param(query, name, value.clone())?;
            }
        }
        Ok(())
    }

    /// Check if color output should be enabled
    pub fn should_use_color(&self) -> bool {
        match self.display.color {
            Some(enabled) => enabled,
            None => {
                std::io::stdout().is_terminal()
                    && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true)
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let content = match extension {
            "toml" => toml::to_string_pretty(self)
                .map_err(|e| config_error(format!("Failed to serialize config: {}", e)))?,
            "yaml" | "yml" => serde_yaml::to_string(self)
                .map_err(|e| config_error(format!("Failed to serialize config: {}", e)))?,
            _ => return Err(config_error("Unsupported config file format")),
        };

        fs::write(path, content)
            .map_err(|e| config_error(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

fn separator_byte(separator: &str) -> Result<u8> {
    match separator.as_bytes() {
        [b] => Ok(*b),
        _ if separator == "\\t" => Ok(b'\t'),
        _ => Err(config_error(format!(
            "CSV separator must be a single ASCII character, got '{}'",
            separator
        ))),
    }
}

/// Create a default config file template
pub fn create_default_config_file(path: &Path) -> Result<()> {
    let config = Config::default();
    config.save(path)?;
    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    separator_byte(&config.io.separator)?;

    if config.io.cache_size == 0 {
        return Err(config_error("Cache size must be greater than 0"));
    }

    config.column_hints()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_args_from;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.io.separator, ",");
        assert!(config.io.has_header);
        assert_eq!(config.display.format, OutputFormat::Text);
        assert_eq!(config.debug.verbosity, 0);
        assert_eq!(config.csv_options().unwrap(), CsvOptions::default());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_find_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("cwd");
        let second = temp_dir.path().join("home");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        let dirs = vec![first.clone(), second.clone()];

        assert!(Config::find_config_file_in(&dirs).is_none());

        fs::write(second.join("corpusq.yaml"), "").unwrap();
        assert_eq!(
            Config::find_config_file_in(&dirs).unwrap(),
            second.join("corpusq.yaml")
        );

        // earlier directories win
        fs::write(first.join(".corpusq.yaml"), "").unwrap();
        assert_eq!(
            Config::find_config_file_in(&dirs).unwrap(),
            first.join(".corpusq.yaml")
        );

        // toml before yaml within a directory
        fs::write(first.join(".corpusq.toml"), "").unwrap();
        assert_eq!(
            Config::find_config_file_in(&dirs).unwrap(),
            first.join(".corpusq.toml")
        );
    }

    #[test]
    fn test_merge_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("corpusq.toml");

        let toml_content = r#"
[io]
separator = ";"

[columns.synonyms]
Title = ["Rachana"]

[queries.stories_after_1990]
after_year = 1995

[display]
format = "json"
limit = 25
"#;

        fs::write(&config_path, toml_content).unwrap();

        let mut config = Config::default();
        config.merge_file(&config_path).unwrap();

        assert_eq!(config.io.separator, ";");
        assert!(config.io.has_header);
        assert_eq!(config.csv_options().unwrap().separator, b';');
        assert_eq!(config.display.format, OutputFormat::Json);
        assert_eq!(config.display.limit, Some(25));
        assert_eq!(
            config.queries["stories_after_1990"]["after_year"],
            Value::Int(1995)
        );
        let hints = config.column_hints().unwrap();
        assert!(hints.matches(CanonicalField::Title, "rachana"));
        assert!(!hints.matches(CanonicalField::Title, "Book Title"));
    }

    #[test]
    fn test_merge_file_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("corpusq.yaml");

        let yaml_content = r#"
io:
  null_values: ["-"]
columns:
  mandatory: [Title]
debug:
  verbosity: 2
"#;

        fs::write(&config_path, yaml_content).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.io.null_values, vec!["-"]);
        assert_eq!(config.debug.verbosity, 2);
        assert_eq!(
            config.column_hints().unwrap().mandatory(),
            &[CanonicalField::Title]
        );
    }

    #[test]
    fn test_merge_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");

        fs::write(&config_path, "invalid toml content [").unwrap();
        let mut config = Config::default();
        assert!(config.merge_file(&config_path).is_err());

        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "{}").unwrap();
        assert!(config.merge_file(&config_path).is_err());

        let config_path = temp_dir.path().join("nonexistent.toml");
        assert!(config.merge_file(&config_path).is_err());
    }

    #[test]
    fn test_merge_env() {
        let mut config = Config::default();

        let env_reader = |key: &str| match key {
            "CORPUSQ_VERBOSITY" => Some("3".to_string()),
            "CORPUSQ_SEPARATOR" => Some("|".to_string()),
            "CORPUSQ_FORMAT" => Some("JSON".to_string()),
            "CORPUSQ_LIMIT" => Some("10".to_string()),
            _ => None,
        };

        config.merge_env_with_reader(env_reader).unwrap();

        assert_eq!(config.debug.verbosity, 3);
        assert_eq!(config.io.separator, "|");
        assert_eq!(config.display.format, OutputFormat::Json);
        assert_eq!(config.display.limit, Some(10));
    }

    #[test]
    fn test_merge_env_invalid_values() {
        let mut config = Config::default();

        let env_reader = |key: &str| match key {
            "CORPUSQ_VERBOSITY" => Some("loud".to_string()),
            "CORPUSQ_LIMIT" => Some("many".to_string()),
            _ => None,
        };
        config.merge_env_with_reader(env_reader).unwrap();
        assert_eq!(config.debug.verbosity, 0);
        assert_eq!(config.display.limit, None);

        let bad_format = |key: &str| (key == "CORPUSQ_FORMAT").then(|| "xml".to_string());
        assert!(config.merge_env_with_reader(bad_format).is_err());
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        config.display.limit = Some(50);
        let cli = parse_args_from([
            "corpusq",
            "queries",
            "--format",
            "json",
            "--csv-separator",
            "\t",
            "-v",
        ])
        .unwrap();
        config.apply_cli(&cli).unwrap();
        assert_eq!(config.display.format, OutputFormat::Json);
        assert_eq!(config.display.limit, Some(50));
        assert_eq!(config.csv_options().unwrap().separator, b'\t');
        assert_eq!(config.debug.verbosity, 1);
    }

    #[test]
    fn test_validation_rejects_bad_settings() {
        let mut config = Config::default();
        config.io.separator = ";;".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config
            .columns
            .synonyms
            .insert("Year".to_string(), vec!["Yr".to_string()]);
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config
            .columns
            .synonyms
            .insert("Colour".to_string(), vec!["x".to_string()]);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_query_overrides_reach_registry() {
        let mut config = Config::default();
        config
            .queries
            .entry("working_links".to_string())
            .or_default()
            .insert("link_prefix".to_string(), Value::from("https"));
        let mut registry = QueryRegistry::new();
        config.apply_query_params(&mut registry).unwrap();
        let info = registry.info("working_links").unwrap();
        assert_eq!(
            info.params,
            vec![("link_prefix".to_string(), Value::from("https"))]
        );

        config
            .queries
            .entry("latest_year".to_string())
            .or_default()
            .insert("after_year".to_string(), Value::Int(1));
        assert!(config.apply_query_params(&mut registry).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["saved.toml", "saved.yaml"] {
            let path = temp_dir.path().join(name);
            let mut config = Config::default();
            config.display.limit = Some(7);
            config.save(&path).unwrap();
            assert_eq!(Config::load_from_file(&path).unwrap(), config);
        }
        assert!(Config::default()
            .save(&temp_dir.path().join("saved.ini"))
            .is_err());
    }
}
