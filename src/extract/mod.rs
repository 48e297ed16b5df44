//! JUnit XML extraction: discover report files, flatten them into
//! [`TestRecord`]s and persist the result as CSV.

pub mod csv_writer;
pub mod discover;
pub mod junit_parser;
pub mod record_model;
pub mod xml_tree;

use std::path::Path;

use thiserror::Error;

pub use record_model::{TestRecord, TestStatus};

/// File name marker of the reports the runner writes.
pub const DEFAULT_REPORT_MARKER: &str = "JUnit_Report";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not read report: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed report: {0}")]
    Malformed(String),
}

/// Settings for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Substring a file name must contain to count as a report
    pub marker: String,
    /// Project stamped on every record, if any
    pub project: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_REPORT_MARKER.to_string(),
            project: None,
        }
    }
}

/// Parse every report under `root` and concatenate their records.
///
/// Files that cannot be read or parsed are logged and contribute nothing.
/// A tree without matching files yields an empty vector. Record order
/// follows the sorted traversal order of [`discover::discover_reports`].
pub fn extract_folder(root: &Path, options: &ExtractOptions) -> Vec<TestRecord> {
    let mut records = Vec::new();

    for path in discover::discover_reports(root, &options.marker) {
        tracing::info!(file = %path.display(), "parsing report");
        match junit_parser::parse_report_file(&path) {
            Ok(mut parsed) => {
                tracing::debug!(file = %path.display(), records = parsed.len(), "parsed report");
                if let Some(project) = &options.project {
                    for record in &mut parsed {
                        record.project = Some(project.clone());
                    }
                }
                records.extend(parsed);
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "could not parse report, skipping");
            }
        }
    }

    records
}
