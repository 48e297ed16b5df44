use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dashboard::LoadError;
use crate::extract::record_model::TestStatus;

// ============================================================================
// Loaded dataset: the CSV hand-off file, normalized for filtering
// ============================================================================

/// Project assigned to rows of files written before the `Project` column
/// existed.
pub const DEFAULT_PROJECT: &str = "Unknown";

/// Date formats tried in order when loading the `Date` column: day-month-year
/// first, then the ISO dates `extract` writes.
pub fn default_date_formats() -> Vec<String> {
    vec!["%d-%m-%Y".to_string(), "%Y-%m-%d".to_string()]
}

/// One row of the hand-off file after column normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRecord {
    /// `None` when the stored value did not parse as a date
    pub date: Option<NaiveDate>,
    pub project: String,
    pub suite: String,
    pub test_case: String,
    pub status: TestStatus,
    /// `None` when the stored value was blank or not a number
    pub duration_seconds: Option<f64>,
    pub error_message: String,
    pub details: String,
    pub source_file: String,
}

/// Raw CSV row, addressed by header name.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Project", default)]
    project: Option<String>,
    #[serde(rename = "Suite")]
    suite: String,
    #[serde(rename = "Test Case")]
    test_case: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Duration (s)", deserialize_with = "csv::invalid_option")]
    duration: Option<f64>,
    #[serde(rename = "Error Message")]
    error_message: String,
    #[serde(rename = "Details")]
    details: String,
    #[serde(rename = "File")]
    source_file: String,
}

/// The full table, read-only once loaded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    pub source: String,
    pub records: Vec<DashboardRecord>,
}

impl Dataset {
    pub fn new(source: impl Into<String>, records: Vec<DashboardRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    /// Sorted distinct projects.
    pub fn projects(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.project.as_str()))
    }

    /// Sorted distinct suites.
    pub fn suites(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.suite.as_str()))
    }

    /// Earliest and latest valid dates, if any row has one.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|r| r.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Parse a stored date with the first matching format.
pub fn parse_date(raw: &str, formats: &[String]) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Load the hand-off file.
///
/// A missing file is [`LoadError::NotFound`]. A file without a `Project`
/// column gets [`DEFAULT_PROJECT`] on every row; any other missing column is
/// a CSV error.
pub fn load_dataset(path: &Path, date_formats: &[String]) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }

    let file = std::fs::File::open(path)?;
    let dataset = read_dataset(file, &path.display().to_string(), date_formats)?;
    tracing::info!(path = %path.display(), rows = dataset.len(), "loaded dataset");
    Ok(dataset)
}

/// Parse CSV content from any reader.
pub fn read_dataset<R: std::io::Read>(
    reader: R,
    source: &str,
    date_formats: &[String],
) -> Result<Dataset, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut unparsed_dates = 0usize;

    for row in csv_reader.deserialize::<CsvRow>() {
        let row = row?;
        let date = parse_date(&row.date, date_formats);
        if date.is_none() {
            unparsed_dates += 1;
        }
        records.push(DashboardRecord {
            date,
            project: row.project.unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
            suite: row.suite,
            test_case: row.test_case,
            status: TestStatus::from(row.status),
            duration_seconds: row.duration,
            error_message: row.error_message,
            details: row.details,
            source_file: row.source_file,
        });
    }

    if unparsed_dates > 0 {
        tracing::warn!(source, rows = unparsed_dates, "rows without a usable date are excluded from date filters");
    }

    Ok(Dataset::new(source, records))
}

// ============================================================================
// Per-session load cache
// ============================================================================

/// Keeps loaded datasets keyed by path so repeated views within one session
/// do not re-read the file.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
    loads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it on first use.
    pub fn get(&mut self, path: &Path, date_formats: &[String]) -> Result<Arc<Dataset>, LoadError> {
        if let Some(dataset) = self.entries.get(path) {
            tracing::debug!(path = %path.display(), "dataset cache hit");
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_dataset(path, date_formats)?);
        self.loads += 1;
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the cached entry so the next `get` re-reads the file.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Number of times a file was actually read.
    pub fn loads(&self) -> usize {
        self.loads
    }
}
