//! Renderers for a [`DashboardView`](crate::dashboard::DashboardView):
//! terminal text, a self-contained HTML page, and inline SVG charts.

pub mod console;
pub mod html;
pub mod svg;

use chrono::NaiveDate;

/// Shown instead of charts when no row matches the filters.
pub const NO_DATA_MESSAGE: &str = "No data available for selected filters.";

/// `25.0%`
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate)
}

/// `+5.0%` / `-12.5%`
pub fn format_change(change: f64) -> String {
    format!("{:+.1}%", change)
}

/// ISO date, or empty for rows without a usable date.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

pub fn format_duration(duration: Option<f64>) -> String {
    duration.map(|d| format!("{:.2}", d)).unwrap_or_default()
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
