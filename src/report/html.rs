use std::collections::BTreeSet;

use crate::dashboard::view::{DETAIL_COLUMNS, DashboardView};
use crate::report::svg::{Series, bar_chart, line_chart};
use crate::report::{
    NO_DATA_MESSAGE, escape_html, format_change, format_date, format_duration, format_rate,
};

// ============================================================================
// HTML reporter: self-contained dashboard page
// ============================================================================

/// Generate a self-contained HTML dashboard.
///
/// Features:
/// - Header colored by the filtered failure count (green when nothing failed)
/// - KPI cards: total, passed, failed, failure rate, change vs previous day
/// - Status trend and failures-by-project line charts, mean duration bars
/// - Detail table with one row per matching test case
/// - Inline CSS and SVG (no external dependencies)
pub fn generate_html_dashboard(view: &DashboardView) -> String {
    let kpis = &view.kpis;
    let header_color = if kpis.failed == 0 { "#4CAF50" } else { "#f44336" };

    let filters = format!(
        "Projects: {} &middot; Suites: {} &middot; Dates: {}",
        escape_html(&view.applied.projects.join(", ")),
        escape_html(&view.applied.suites.join(", ")),
        view.applied
            .date_range
            .map(|r| format!("{} to {}", r.from, r.to))
            .unwrap_or_else(|| "no dated rows".to_string()),
    );

    let charts = if view.is_empty() {
        format!("<p class=\"no-data\">{}</p>\n", NO_DATA_MESSAGE)
    } else {
        let mut charts = String::new();
        charts.push_str(&status_trend_chart(view));
        charts.push_str(&project_failures_chart(view));
        charts.push_str(&suite_duration_chart(view));
        charts
    };

    let mut rows = String::new();
    for row in &view.details {
        let status_class = match row.status.as_str() {
            "PASSED" => "pass",
            "FAILED" => "fail",
            _ => "other",
        };
        rows.push_str(&format!(
            "<tr><td>{date}</td><td>{project}</td><td>{suite}</td><td>{case}</td><td class=\"{class}\">{status}</td><td class=\"num\">{duration}</td><td>{error}</td></tr>\n",
            date = format_date(row.date),
            project = escape_html(&row.project),
            suite = escape_html(&row.suite),
            case = escape_html(&row.test_case),
            class = status_class,
            status = escape_html(&row.status),
            duration = format_duration(row.duration_seconds),
            error = escape_html(&row.error_message),
        ));
    }

    let header_cells: String = DETAIL_COLUMNS
        .iter()
        .map(|c| format!("<th>{}</th>", c))
        .collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Test Results Dashboard</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0; background: #f5f5f5; }}
.header {{ background: {header_color}; color: white; padding: 20px 30px; }}
.header h1 {{ margin: 0 0 8px 0; font-size: 24px; }}
.header p {{ margin: 0; font-size: 14px; opacity: 0.9; }}
.content {{ max-width: 1100px; margin: 20px auto; padding: 0 20px; }}
.kpis {{ display: flex; gap: 12px; margin-bottom: 20px; }}
.kpi {{ flex: 1; background: white; border-radius: 6px; padding: 14px 18px; }}
.kpi .label {{ color: #666; font-size: 13px; }}
.kpi .value {{ font-size: 26px; font-weight: bold; margin-top: 4px; }}
.chart {{ background: white; border-radius: 6px; margin-bottom: 16px; width: 100%; height: auto; }}
.chart .title {{ font-size: 15px; font-weight: bold; }}
.chart .tick, .chart .legend {{ font-size: 11px; fill: #555; }}
.chart .grid {{ stroke: #e0e0e0; }}
.no-data {{ background: #e3f2fd; color: #0d47a1; border-radius: 6px; padding: 14px 18px; }}
table {{ width: 100%; border-collapse: collapse; background: white; font-size: 13px; }}
th, td {{ text-align: left; padding: 6px 10px; border-bottom: 1px solid #eee; vertical-align: top; }}
th {{ background: #fafafa; }}
td.num {{ text-align: right; }}
td.pass {{ color: #2e7d32; font-weight: bold; }}
td.fail {{ color: #c62828; font-weight: bold; }}
</style>
</head>
<body>
<div class="header">
<h1>Test Results Dashboard</h1>
<p>{source}</p>
<p>{filters}</p>
</div>
<div class="content">
<div class="kpis">
<div class="kpi"><div class="label">Total Tests</div><div class="value">{total}</div></div>
<div class="kpi"><div class="label">Passed</div><div class="value">{passed}</div></div>
<div class="kpi"><div class="label">Failed</div><div class="value">{failed}</div></div>
<div class="kpi"><div class="label">Failure Rate</div><div class="value">{rate}</div></div>
<div class="kpi"><div class="label">Change vs Prev Day</div><div class="value">{change}</div></div>
<div class="kpi"><div class="label">Avg Duration</div><div class="value">{avg:.2}s</div></div>
</div>
{charts}<h2>Test Case Details</h2>
<table>
<thead><tr>{header_cells}</tr></thead>
<tbody>
{rows}</tbody>
</table>
</div>
</body>
</html>"##,
        header_color = header_color,
        source = escape_html(&view.source),
        filters = filters,
        total = kpis.total,
        passed = kpis.passed,
        failed = kpis.failed,
        rate = format_rate(kpis.failure_rate),
        change = format_change(kpis.failure_rate_change),
        avg = kpis.avg_duration_seconds,
        charts = charts,
        header_cells = header_cells,
        rows = rows,
    )
}

/// Distinct dates across a chart's points, as axis labels.
fn date_labels<I: Iterator<Item = chrono::NaiveDate>>(dates: I) -> Vec<chrono::NaiveDate> {
    dates.collect::<BTreeSet<_>>().into_iter().collect()
}

fn status_trend_chart(view: &DashboardView) -> String {
    let dates = date_labels(view.status_trend.iter().map(|p| p.date));
    let statuses: BTreeSet<&str> = view.status_trend.iter().map(|p| p.status.as_str()).collect();

    let series: Vec<Series> = statuses
        .into_iter()
        .map(|status| Series {
            name: status.to_string(),
            values: dates
                .iter()
                .map(|date| {
                    view.status_trend
                        .iter()
                        .find(|p| p.date == *date && p.status == status)
                        .map(|p| p.count as f64)
                })
                .collect(),
        })
        .collect();

    let labels: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
    line_chart("Daily Test Trend (Pass vs Fail)", "Count", &labels, &series)
}

fn project_failures_chart(view: &DashboardView) -> String {
    let dates = date_labels(view.project_failures.iter().map(|p| p.date));
    let projects: BTreeSet<&str> = view
        .project_failures
        .iter()
        .map(|p| p.project.as_str())
        .collect();

    let series: Vec<Series> = projects
        .into_iter()
        .map(|project| Series {
            name: project.to_string(),
            values: dates
                .iter()
                .map(|date| {
                    view.project_failures
                        .iter()
                        .find(|p| p.date == *date && p.project == project)
                        .map(|p| p.failures as f64)
                })
                .collect(),
        })
        .collect();

    let labels: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
    line_chart("Failures Over Time by Project", "Failures", &labels, &series)
}

fn suite_duration_chart(view: &DashboardView) -> String {
    let bars: Vec<(String, f64)> = view
        .suite_durations
        .iter()
        .map(|s| (s.suite.clone(), s.mean_duration_seconds))
        .collect();
    bar_chart("Average Test Duration per Suite", "Duration (s)", &bars)
}
