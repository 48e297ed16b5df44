use std::path::Path;

use crate::extract::ExtractError;
use crate::extract::record_model::{
    GENERIC_FAILURE_MESSAGE, MAX_DETAILS_CHARS, TestRecord, TestStatus,
};
use crate::extract::xml_tree::{XmlElement, parse_document, parse_document_bytes};

// ============================================================================
// JUnit report → TestRecord rows
// ============================================================================

/// Read and parse one report file, honouring the encoding its XML
/// declaration names.
pub fn parse_report_file(path: &Path) -> Result<Vec<TestRecord>, ExtractError> {
    let bytes = std::fs::read(path)?;
    let root = parse_document_bytes(&bytes)?;
    Ok(records_from_root(&root, &path.display().to_string()))
}

/// Parse the text of one report into one record per `<testcase>`.
///
/// Suites are the `<testsuite>` children of the root element. A root that is
/// itself a `<testsuite>` is treated as the only suite. Missing or malformed
/// attributes fall back to defaults instead of failing the file.
pub fn parse_report_str(xml: &str, source_file: &str) -> Result<Vec<TestRecord>, ExtractError> {
    let root = parse_document(xml)?;
    Ok(records_from_root(&root, source_file))
}

fn records_from_root(root: &XmlElement, source_file: &str) -> Vec<TestRecord> {
    let suites: Vec<&XmlElement> = if root.name == "testsuite" {
        vec![root]
    } else {
        root.children_named("testsuite").collect()
    };

    let mut records = Vec::new();
    for suite in suites {
        let suite_name = suite.attr("name").unwrap_or_default();
        let date = date_component(suite.attr("timestamp"));

        for case in suite.children_named("testcase") {
            records.push(record_from_case(case, suite_name, &date, source_file));
        }
    }

    records
}

fn record_from_case(case: &XmlElement, suite: &str, date: &str, source_file: &str) -> TestRecord {
    let status = case
        .attr("status")
        .map(TestStatus::from)
        .unwrap_or(TestStatus::Unknown);

    let system_err = child_text(case, "system-err");
    let system_out = child_text(case, "system-out");

    let error_message = if !system_err.is_empty() {
        system_err
    } else if let Some(message) = failure_message(case) {
        message
    } else if status.is_failed() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        String::new()
    };

    TestRecord {
        date: date.to_string(),
        project: None,
        suite: suite.to_string(),
        test_case: normalize_test_name(case.attr("name").unwrap_or_default()),
        status,
        duration_seconds: round2(parse_duration(case.attr("time"))),
        error_message,
        details: truncate_chars(&system_out, MAX_DETAILS_CHARS),
        source_file: source_file.to_string(),
    }
}

/// Trimmed text of the first child with the given name, or empty.
fn child_text(element: &XmlElement, name: &str) -> String {
    element
        .child(name)
        .map(|child| child.text.trim().to_string())
        .unwrap_or_default()
}

/// Message of a `<failure>` or `<error>` child: its `message` attribute,
/// else its text.
fn failure_message(case: &XmlElement) -> Option<String> {
    let failure = case.child("failure").or_else(|| case.child("error"))?;
    let message = failure
        .attr("message")
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| failure.text.trim());
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

// ============================================================================
// Field normalization helpers
// ============================================================================

/// Keep the last `/`-separated segment of a hierarchical test name.
pub fn normalize_test_name(raw: &str) -> String {
    raw.rsplit('/').next().unwrap_or_default().to_string()
}

/// Date part of an ISO-like timestamp (`2024-01-15T10:20:30` or
/// `2024-01-15 10:20:30`). Missing timestamps give an empty string.
pub fn date_component(timestamp: Option<&str>) -> String {
    match timestamp {
        Some(ts) => ts
            .trim()
            .split(['T', ' '])
            .next()
            .unwrap_or_default()
            .to_string(),
        None => String::new(),
    }
}

/// Parse a `time` attribute as seconds. Missing, unparseable, negative and
/// non-finite values all count as zero.
pub fn parse_duration(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .unwrap_or(0.0)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Keep at most `max` characters of `text`. No ellipsis is appended.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
