use crate::dashboard::view::{DETAIL_COLUMNS, DashboardView, DetailRow};
use crate::report::{NO_DATA_MESSAGE, format_change, format_date, format_duration, format_rate};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a dashboard view for terminal output.
///
/// Produces output like:
/// ```text
/// === Test Results Dashboard: data/processed/katalon_results.csv ===
///
/// Projects: Alpha, Beta
/// Suites:   Smoke
/// Dates:    2024-01-14 .. 2024-01-15
///
/// Total Tests  Passed  Failed  Failure Rate  Change vs Prev Day
///           4       3       1         25.0%              +50.0%
/// Avg duration: 1.25s
///
/// --- Daily Test Trend (Pass vs Fail) ---
/// 2024-01-14  PASSED   2
/// ...
/// ```
pub fn format_console_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Test Results Dashboard: {} ===\n\n", view.source));

    out.push_str(&format!("Projects: {}\n", join_or_none(&view.applied.projects)));
    out.push_str(&format!("Suites:   {}\n", join_or_none(&view.applied.suites)));
    let dates = view
        .applied
        .date_range
        .map(|r| format!("{} .. {}", r.from, r.to))
        .unwrap_or_else(|| "(no dated rows)".to_string());
    out.push_str(&format!("Dates:    {}\n\n", dates));

    // KPI block
    let kpis = &view.kpis;
    out.push_str(&format!(
        "{:>11}  {:>6}  {:>6}  {:>12}  {:>18}\n",
        "Total Tests", "Passed", "Failed", "Failure Rate", "Change vs Prev Day"
    ));
    out.push_str(&format!(
        "{:>11}  {:>6}  {:>6}  {:>12}  {:>18}\n",
        kpis.total,
        kpis.passed,
        kpis.failed,
        format_rate(kpis.failure_rate),
        format_change(kpis.failure_rate_change)
    ));
    out.push_str(&format!("Avg duration: {:.2}s\n", kpis.avg_duration_seconds));

    if view.is_empty() {
        out.push_str(&format!("\n{}\n", NO_DATA_MESSAGE));
    } else {
        out.push_str("\n--- Daily Test Trend (Pass vs Fail) ---\n");
        for point in &view.status_trend {
            out.push_str(&format!("{}  {:<8} {:>5}\n", point.date, point.status, point.count));
        }

        out.push_str("\n--- Failures Over Time by Project ---\n");
        for point in &view.project_failures {
            out.push_str(&format!("{}  {:<20} {:>5}\n", point.date, point.project, point.failures));
        }

        out.push_str("\n--- Average Test Duration per Suite ---\n");
        for bar in &view.suite_durations {
            out.push_str(&format!("{:<30} {:>8.2}s\n", bar.suite, bar.mean_duration_seconds));
        }
    }

    out.push_str("\n--- Test Case Details ---\n");
    out.push_str(&DETAIL_COLUMNS.join(" | "));
    out.push('\n');
    for row in &view.details {
        out.push_str(&detail_line(row));
        out.push('\n');
    }

    out.push_str(&format!("\n=== {} matching rows ===\n", view.details.len()));

    out
}

fn detail_line(row: &DetailRow) -> String {
    [
        format_date(row.date),
        row.project.clone(),
        row.suite.clone(),
        row.test_case.clone(),
        row.status.clone(),
        format_duration(row.duration_seconds),
        // keep one row per line
        row.error_message.replace(['\n', '\r'], " "),
    ]
    .join(" | ")
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}
