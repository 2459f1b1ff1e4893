//! Runtime configuration read from environment variables.
//!
//! A `.env` file is loaded by `main` before [`Config::from_env`] runs, so
//! every setting can live there as well.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Merge overlapping ranges before decomposing (`true`/`false`).
pub const ENV_COMPACT: &str = "IP_RANGE_CIDR_COMPACT";
/// Output format: `plain`, `csv` or `json`.
pub const ENV_OUTPUT: &str = "IP_RANGE_CIDR_OUTPUT";
/// Path to the log4rs YAML file.
pub const ENV_LOG_CONFIG: &str = "IP_RANGE_CIDR_LOG_CONFIG";

const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

/// How the CIDR list is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One block per line.
    #[default]
    Plain,
    /// Quoted, aligned columns with first/last address and size.
    Csv,
    /// Pretty printed JSON report.
    Json,
}

impl FromStr for OutputFormat {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(OutputFormat::Plain),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => {
                Err(format!("Unknown output format '{other}' (expected plain, csv or json)").into())
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputFormat::Plain => f.write_str("plain"),
            OutputFormat::Csv => f.write_str("csv"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Settings for the command line tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Merge overlapping and adjacent ranges before decomposing.
    pub compact: bool,
    /// Output format.
    pub output: OutputFormat,
    /// Path to the log4rs configuration file.
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            compact: true,
            output: OutputFormat::default(),
            log_config: DEFAULT_LOG_CONFIG.to_string(),
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any variable lookup, unset variables keep their defaults.
    ///
    /// # Examples
    /// ```
    /// use ip_range_cidr::config::{Config, OutputFormat};
    /// let config = Config::from_lookup(|key| match key {
    ///     "IP_RANGE_CIDR_OUTPUT" => Some("json".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.output, OutputFormat::Json);
    /// assert!(config.compact);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup(ENV_COMPACT) {
            config.compact = parse_bool(&value)
                .ok_or_else(|| format!("Invalid {ENV_COMPACT}={value} (expected true or false)"))?;
        }
        if let Some(value) = lookup(ENV_OUTPUT) {
            config.output = value
                .parse::<OutputFormat>()
                .map_err(|e| format!("Invalid {ENV_OUTPUT}: {e}"))?;
        }
        if let Some(value) = lookup(ENV_LOG_CONFIG) {
            if value.trim().is_empty() {
                return Err(format!("{ENV_LOG_CONFIG} is set but empty").into());
            }
            config.log_config = value;
        }

        log::debug!("config: {:?}", config);
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
