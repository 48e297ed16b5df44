use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dashboard::charts::{
    ProjectFailures, StatusCount, SuiteDuration, project_failures, status_trend, suite_durations,
};
use crate::dashboard::dataset::{DashboardRecord, Dataset};
use crate::dashboard::filter::{self, DashboardFilter, DateRange};
use crate::dashboard::metrics::Kpis;

// ============================================================================
// Dashboard view: everything a reporter needs for one filter selection
// ============================================================================

/// Values the user can choose from, taken from the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub projects: Vec<String>,
    pub suites: Vec<String>,
    pub date_span: Option<DateRange>,
}

/// Selections actually applied, with defaults expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilter {
    pub projects: Vec<String>,
    pub suites: Vec<String>,
    pub date_range: Option<DateRange>,
}

/// One line of the detail table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub date: Option<NaiveDate>,
    pub project: String,
    pub suite: String,
    pub test_case: String,
    pub status: String,
    pub duration_seconds: Option<f64>,
    pub error_message: String,
}

impl From<&DashboardRecord> for DetailRow {
    fn from(record: &DashboardRecord) -> Self {
        Self {
            date: record.date,
            project: record.project.clone(),
            suite: record.suite.clone(),
            test_case: record.test_case.clone(),
            status: record.status.to_string(),
            duration_seconds: record.duration_seconds,
            error_message: record.error_message.clone(),
        }
    }
}

/// Column titles of the detail table, in display order.
pub const DETAIL_COLUMNS: [&str; 7] = [
    "Date",
    "Project",
    "Suite",
    "Test Case",
    "Status",
    "Duration (s)",
    "Error Message",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub source: String,
    pub options: FilterOptions,
    pub applied: AppliedFilter,
    pub kpis: Kpis,
    pub status_trend: Vec<StatusCount>,
    pub project_failures: Vec<ProjectFailures>,
    pub suite_durations: Vec<SuiteDuration>,
    pub details: Vec<DetailRow>,
}

impl DashboardView {
    /// Filter the dataset and derive every panel from the filtered rows.
    pub fn build(dataset: &Dataset, selection: &DashboardFilter) -> Self {
        let options = FilterOptions {
            projects: dataset.projects(),
            suites: dataset.suites(),
            date_span: dataset
                .date_span()
                .map(|(from, to)| DateRange { from, to }),
        };

        let applied = AppliedFilter {
            projects: selection
                .projects
                .as_ref()
                .map(|p| p.iter().cloned().collect())
                .unwrap_or_else(|| options.projects.clone()),
            suites: selection
                .suites
                .as_ref()
                .map(|s| s.iter().cloned().collect())
                .unwrap_or_else(|| options.suites.clone()),
            date_range: selection.resolve_range(dataset),
        };

        let rows = filter::apply(dataset, selection);
        tracing::debug!(matched = rows.len(), total = dataset.len(), "applied filter");

        Self {
            source: dataset.source.clone(),
            options,
            applied,
            kpis: Kpis::compute(&rows),
            status_trend: status_trend(&rows),
            project_failures: project_failures(&rows),
            suite_durations: suite_durations(&rows),
            details: rows.iter().map(|r| DetailRow::from(*r)).collect(),
        }
    }

    /// True when no row matched; reporters show a "no data" notice instead
    /// of charts.
    pub fn is_empty(&self) -> bool {
        self.kpis.total == 0
    }
}
