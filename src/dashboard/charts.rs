use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dashboard::dataset::DashboardRecord;

// ============================================================================
// Chart series: grouped aggregations over the filtered set
// ============================================================================

/// Rows per date per status, for the pass/fail trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub date: NaiveDate,
    pub status: String,
    pub count: usize,
}

/// Failed rows per date per project. Groups without failures are kept
/// with a zero count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFailures {
    pub date: NaiveDate,
    pub project: String,
    pub failures: usize,
}

/// Mean duration per suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteDuration {
    pub suite: String,
    pub mean_duration_seconds: f64,
}

/// Sorted by date, then status.
pub fn status_trend(rows: &[&DashboardRecord]) -> Vec<StatusCount> {
    let mut groups: BTreeMap<(NaiveDate, String), usize> = BTreeMap::new();
    for row in rows {
        if let Some(date) = row.date {
            *groups.entry((date, row.status.to_string())).or_default() += 1;
        }
    }

    groups
        .into_iter()
        .map(|((date, status), count)| StatusCount { date, status, count })
        .collect()
}

/// Sorted by date, then project.
pub fn project_failures(rows: &[&DashboardRecord]) -> Vec<ProjectFailures> {
    let mut groups: BTreeMap<(NaiveDate, String), usize> = BTreeMap::new();
    for row in rows {
        if let Some(date) = row.date {
            let failures = groups.entry((date, row.project.clone())).or_default();
            if row.status.is_failed() {
                *failures += 1;
            }
        }
    }

    groups
        .into_iter()
        .map(|((date, project), failures)| ProjectFailures {
            date,
            project,
            failures,
        })
        .collect()
}

/// Sorted by suite name. Suites where no row has a duration report 0.
pub fn suite_durations(rows: &[&DashboardRecord]) -> Vec<SuiteDuration> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(row.suite.as_str()).or_default();
        if let Some(duration) = row.duration_seconds {
            entry.0 += duration;
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(suite, (sum, count))| SuiteDuration {
            suite: suite.to_string(),
            mean_duration_seconds: if count == 0 { 0.0 } else { sum / count as f64 },
        })
        .collect()
}
