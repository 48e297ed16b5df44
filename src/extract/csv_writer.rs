use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::extract::record_model::TestRecord;

// ============================================================================
// CSV hand-off file
// ============================================================================

pub const COL_DATE: &str = "Date";
pub const COL_PROJECT: &str = "Project";
pub const COL_SUITE: &str = "Suite";
pub const COL_TEST_CASE: &str = "Test Case";
pub const COL_STATUS: &str = "Status";
pub const COL_DURATION: &str = "Duration (s)";
pub const COL_ERROR_MESSAGE: &str = "Error Message";
pub const COL_DETAILS: &str = "Details";
pub const COL_FILE: &str = "File";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("could not write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("could not encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Header row for the hand-off file. `Project` is only present when the
/// extraction stamped a project on its records.
pub fn header(include_project: bool) -> Vec<&'static str> {
    let mut columns = vec![COL_DATE];
    if include_project {
        columns.push(COL_PROJECT);
    }
    columns.extend([
        COL_SUITE,
        COL_TEST_CASE,
        COL_STATUS,
        COL_DURATION,
        COL_ERROR_MESSAGE,
        COL_DETAILS,
        COL_FILE,
    ]);
    columns
}

/// Encode records as CSV text.
pub fn to_csv_bytes(records: &[TestRecord], include_project: bool) -> Result<Vec<u8>, WriteError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header(include_project))?;

    for record in records {
        let duration = record.duration_seconds.to_string();
        let mut row: Vec<&str> = vec![record.date.as_str()];
        if include_project {
            row.push(record.project.as_deref().unwrap_or_default());
        }
        row.extend([
            record.suite.as_str(),
            record.test_case.as_str(),
            record.status.as_str(),
            duration.as_str(),
            record.error_message.as_str(),
            record.details.as_str(),
            record.source_file.as_str(),
        ]);
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| WriteError::Csv(csv::Error::from(e.into_error())))
}

/// Write records to `path`, replacing any previous file.
///
/// Parent directories are created first. The content goes to a sibling
/// temp file that is then renamed over the target, so readers never see a
/// half-written table.
pub fn write_records(path: &Path, records: &[TestRecord], include_project: bool) -> Result<(), WriteError> {
    let io_err = |source: std::io::Error| WriteError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let bytes = to_csv_bytes(records, include_project)?;
    let tmp = temp_path(path);
    std::fs::write(&tmp, bytes).map_err(io_err)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(e));
    }

    tracing::debug!(path = %path.display(), rows = records.len(), "wrote records");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records.csv".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
