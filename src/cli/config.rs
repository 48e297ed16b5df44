use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::dashboard::dataset::default_date_formats;
use crate::extract::DEFAULT_REPORT_MARKER;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "junit-dashboard",
    version,
    about = "Flatten JUnit XML test reports into CSV and render pass/fail dashboards"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: junit-dashboard.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse every JUnit report under a directory into one CSV file
    Extract {
        /// Directory to search for reports
        #[arg(short, long)]
        input: Option<String>,

        /// CSV file to write
        #[arg(short, long)]
        output: Option<String>,

        /// Substring a report file name must contain
        #[arg(long)]
        marker: Option<String>,

        /// Project name stamped on every row (adds the Project column)
        #[arg(long)]
        project: Option<String>,
    },

    /// Render KPIs, trend charts and the detail table for a CSV file
    Dashboard {
        /// CSV file produced by `extract`. Dates are read as DD-MM-YYYY,
        /// falling back to YYYY-MM-DD unless `dashboard.date_formats` is set
        #[arg(long)]
        data: Option<String>,

        /// Only include these projects (repeatable, default: all)
        #[arg(long = "project")]
        projects: Vec<String>,

        /// Only include these suites (repeatable, default: all)
        #[arg(long = "suite")]
        suites: Vec<String>,

        /// First date to include, YYYY-MM-DD (default: earliest in data)
        #[arg(long)]
        from: Option<String>,

        /// Last date to include, YYYY-MM-DD (default: latest in data)
        #[arg(long)]
        to: Option<String>,

        /// Output format: console, html, json
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

pub const DEFAULT_CONFIG_FILE: &str = "junit-dashboard.yaml";

/// Optional YAML config file: `junit-dashboard.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    #[serde(default = "default_data_path")]
    pub output: String,

    #[serde(default = "default_marker")]
    pub marker: String,

    pub project: Option<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output: default_data_path(),
            marker: default_marker(),
            project: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_data_path")]
    pub data: String,

    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,

    /// chrono formats tried in order for the Date column. The default
    /// accepts `%d-%m-%Y` and then ISO `%Y-%m-%d`; set `["%d-%m-%Y"]` for
    /// strict day-month-year parsing.
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: default_data_path(),
            format: default_console(),
            output: None,
            date_formats: default_date_formats(),
        }
    }
}

// Serde default helpers
fn default_input_dir() -> String { "data/raw_reports".to_string() }
fn default_data_path() -> String { "data/processed/katalon_results.csv".to_string() }
fn default_marker() -> String { DEFAULT_REPORT_MARKER.to_string() }
fn default_console() -> String { "console".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing or
/// malformed; a malformed file is reported as a warning.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = config_path, error = %e, "ignoring malformed config file");
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Default log filter for a `-v` count. `RUST_LOG` overrides it.
pub fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
