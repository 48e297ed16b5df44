use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dashboard::dataset::DashboardRecord;

// ============================================================================
// KPI block
// ============================================================================

/// Headline numbers over the filtered set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage of failed rows, 0 for an empty set
    pub failure_rate: f64,
    /// Mean duration of rows with a known duration, 0 when there are none
    pub avg_duration_seconds: f64,
    /// Failure rate on the latest date minus the rate on the date before it
    pub failure_rate_change: f64,
}

impl Kpis {
    pub fn compute(rows: &[&DashboardRecord]) -> Self {
        let total = rows.len();
        let passed = rows.iter().filter(|r| r.status.is_passed()).count();
        let failed = rows.iter().filter(|r| r.status.is_failed()).count();

        Self {
            total,
            passed,
            failed,
            failure_rate: failure_rate(failed, total),
            avg_duration_seconds: mean_duration(rows.iter().copied()).unwrap_or(0.0),
            failure_rate_change: day_over_day_change(rows),
        }
    }
}

/// `failed / total * 100`, defined as 0 when `total` is 0.
pub fn failure_rate(failed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        failed as f64 / total as f64 * 100.0
    }
}

/// Mean of the known durations, `None` when no row has one.
pub fn mean_duration<'a>(rows: impl Iterator<Item = &'a DashboardRecord>) -> Option<f64> {
    let (sum, count) = rows
        .filter_map(|r| r.duration_seconds)
        .fold((0.0, 0usize), |(sum, count), d| (sum + d, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Failure rate of the most recent date minus that of the second most
/// recent, by calendar order. Exactly 0.0 with fewer than two dates.
pub fn day_over_day_change(rows: &[&DashboardRecord]) -> f64 {
    // date -> (failed, total)
    let mut per_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for row in rows {
        if let Some(date) = row.date {
            let entry = per_day.entry(date).or_default();
            if row.status.is_failed() {
                entry.0 += 1;
            }
            entry.1 += 1;
        }
    }

    let mut latest_first = per_day.values().rev();
    match (latest_first.next(), latest_first.next()) {
        (Some(&(latest_failed, latest_total)), Some(&(prev_failed, prev_total))) => {
            failure_rate(latest_failed, latest_total) - failure_rate(prev_failed, prev_total)
        }
        _ => 0.0,
    }
}
