use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use junit_dashboard::dashboard::dataset::{DashboardRecord, Dataset};
use junit_dashboard::extract::TestStatus;

/// A Katalon-style report: two suites, four test cases.
pub const NIGHTLY_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites name="Nightly" time="12.5" tests="4" failures="2">
  <testsuite name="Smoke" time="5.0" timestamp="2024-01-15T02:00:00" tests="3">
    <testcase name="Test Cases/Auth/LoginTest" status="PASSED" time="1.234">
      <system-out>Login ok</system-out>
    </testcase>
    <testcase name="Test Cases/Auth/LogoutTest" status="FAILED" time="2.5">
      <system-out>   logout trace   </system-out>
    </testcase>
    <testcase name="Search" status="FAILED" time="0.5">
      <system-err>Element 'q' not found</system-err>
    </testcase>
  </testsuite>
  <testsuite name="Regression" time="3" timestamp="2024-01-16T02:00:00">
    <testcase name="Checkout" time="3"/>
  </testsuite>
</testsuites>
"#;

/// Write `content` at `root/relative`, creating directories as needed.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Single-suite report with one test case per `(name, status)` pair.
pub fn report_with_cases(suite: &str, timestamp: &str, cases: &[(&str, &str)]) -> String {
    let mut xml = format!(
        "<testsuites>\n  <testsuite name=\"{}\" timestamp=\"{}\">\n",
        suite, timestamp
    );
    for (name, status) in cases {
        xml.push_str(&format!(
            "    <testcase name=\"{}\" status=\"{}\" time=\"1\"/>\n",
            name, status
        ));
    }
    xml.push_str("  </testsuite>\n</testsuites>\n");
    xml
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(
    date: Option<NaiveDate>,
    project: &str,
    suite: &str,
    status: &str,
    duration: Option<f64>,
) -> DashboardRecord {
    DashboardRecord {
        date,
        project: project.to_string(),
        suite: suite.to_string(),
        test_case: format!("{}Case", suite),
        status: TestStatus::from(status),
        duration_seconds: duration,
        error_message: if status == "FAILED" { "Failed".to_string() } else { String::new() },
        details: String::new(),
        source_file: "fixture.xml".to_string(),
    }
}

/// Two days of results across two projects and two suites.
///
/// 2024-01-14: 1 passed, 1 failed  (50% failure rate)
/// 2024-01-15: 3 passed, 1 failed  (25% failure rate)
pub fn two_day_dataset() -> Dataset {
    let d14 = Some(date(2024, 1, 14));
    let d15 = Some(date(2024, 1, 15));
    Dataset::new(
        "fixture.csv",
        vec![
            record(d14, "Alpha", "Smoke", "PASSED", Some(1.0)),
            record(d14, "Alpha", "Smoke", "FAILED", Some(2.0)),
            record(d15, "Alpha", "Smoke", "PASSED", Some(1.0)),
            record(d15, "Beta", "Regression", "PASSED", None),
            record(d15, "Beta", "Regression", "FAILED", Some(3.0)),
            record(d15, "Alpha", "Smoke", "PASSED", Some(1.0)),
        ],
    )
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
