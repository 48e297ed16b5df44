use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::dashboard::dataset::DatasetCache;
use crate::dashboard::filter::DashboardFilter;
use crate::dashboard::view::DashboardView;
use crate::dashboard::LoadError;
use crate::extract::csv_writer::write_records;
use crate::extract::{ExtractOptions, TestRecord, extract_folder};
use crate::report::console::format_console_dashboard;
use crate::report::html::generate_html_dashboard;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid date '{value}' for --{flag}: expected YYYY-MM-DD")]
    InvalidDate { flag: &'static str, value: String },

    #[error("--from {from} is after --to {to}")]
    EmptyRange { from: NaiveDate, to: NaiveDate },
}

// ============================================================================
// extract subcommand
// ============================================================================

/// Parse every report under `input` and write the CSV to `output`.
///
/// Returns the number of records written. An empty result is not an error:
/// nothing is written and 0 is returned.
pub fn cmd_extract(
    input: &str,
    output: &str,
    marker: &str,
    project: Option<&str>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let options = ExtractOptions {
        marker: marker.to_string(),
        project: project.map(str::to_string),
    };

    println!("Parsing XML reports from: {}", input);
    let records = extract_folder(Path::new(input), &options);

    if records.is_empty() {
        println!("No XML reports found or parsed.");
        return Ok(0);
    }

    write_records(Path::new(output), &records, options.project.is_some())?;
    println!("Saved {} parsed results to {}", records.len(), output);
    print!("{}", format_preview(&records, 5));

    Ok(records.len())
}

/// First `limit` records as a compact table.
pub fn format_preview(records: &[TestRecord], limit: usize) -> String {
    let mut out = String::new();
    for record in records.iter().take(limit) {
        out.push_str(&format!(
            "  {:<10}  {:<20}  {:<30}  {:<8}  {:>7.2}s\n",
            record.date,
            record.suite,
            record.test_case,
            record.status.as_str(),
            record.duration_seconds
        ));
    }
    if records.len() > limit {
        out.push_str(&format!("  ... {} more\n", records.len() - limit));
    }
    out
}

// ============================================================================
// dashboard subcommand
// ============================================================================

/// A dashboard session: loads the dataset once and renders any number of
/// filter selections against it.
pub struct DashboardSession {
    cache: DatasetCache,
    date_formats: Vec<String>,
}

impl DashboardSession {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self {
            cache: DatasetCache::new(),
            date_formats,
        }
    }

    /// Build the view for one filter selection.
    pub fn view(&mut self, data: &Path, filter: &DashboardFilter) -> Result<DashboardView, LoadError> {
        let dataset = self.cache.get(data, &self.date_formats)?;
        Ok(DashboardView::build(&dataset, filter))
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }
}

/// Render a view in the requested format. Unknown formats fall back to
/// console output.
pub fn render(view: &DashboardView, format: &str) -> Result<String, serde_json::Error> {
    Ok(match format {
        "html" => generate_html_dashboard(view),
        "json" => serde_json::to_string_pretty(view)? + "\n",
        _ => format_console_dashboard(view),
    })
}

/// Parse a `--from` / `--to` value.
pub fn parse_date_flag(flag: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, CliError> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| CliError::InvalidDate {
                flag,
                value: raw.to_string(),
            })
        })
        .transpose()
}

/// Assemble a filter from CLI selections. Empty lists mean "all".
pub fn build_filter(
    projects: &[String],
    suites: &[String],
    from: Option<&str>,
    to: Option<&str>,
) -> Result<DashboardFilter, CliError> {
    let from = parse_date_flag("from", from)?;
    let to = parse_date_flag("to", to)?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(CliError::EmptyRange { from, to });
        }
    }

    let mut filter = DashboardFilter::all().with_dates(from, to);
    if !projects.is_empty() {
        filter = filter.with_projects(projects.iter().cloned());
    }
    if !suites.is_empty() {
        filter = filter.with_suites(suites.iter().cloned());
    }
    Ok(filter)
}

/// Load the dataset, apply the filter and emit the report.
pub fn cmd_dashboard(
    data: &str,
    filter: &DashboardFilter,
    format: &str,
    output: Option<&str>,
    date_formats: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = DashboardSession::new(date_formats);
    let view = session.view(Path::new(data), filter)?;
    let output_content = render(&view, format)?;

    match output {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &output_content)?;
            tracing::info!(path = %path.display(), format, "wrote dashboard");
        }
        None => print!("{}", output_content),
    }

    Ok(())
}
