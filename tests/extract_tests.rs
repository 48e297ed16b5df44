use junit_dashboard::extract::csv_writer::{header, to_csv_bytes, write_records};
use junit_dashboard::extract::discover::discover_reports;
use junit_dashboard::extract::junit_parser::{parse_report_file, parse_report_str};
use junit_dashboard::extract::{ExtractOptions, TestStatus, extract_folder};

mod common;
use crate::common::fixtures::{NIGHTLY_REPORT, report_with_cases, write_file};

// ============================================================================
// 1. Record per test case
// ============================================================================

#[test]
fn one_record_per_testcase_across_suites() {
    let records = parse_report_str(NIGHTLY_REPORT, "nightly.xml").unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].suite, "Smoke");
    assert_eq!(records[3].suite, "Regression");
    assert!(records.iter().all(|r| r.source_file == "nightly.xml"));
}

#[test]
fn record_count_matches_generated_cases() {
    let cases: Vec<(String, &str)> = (0..25).map(|i| (format!("Case{}", i), "PASSED")).collect();
    let refs: Vec<(&str, &str)> = cases.iter().map(|(n, s)| (n.as_str(), *s)).collect();
    let xml = report_with_cases("Bulk", "2024-02-01T00:00:00", &refs);
    assert_eq!(parse_report_str(&xml, "bulk.xml").unwrap().len(), 25);
}

#[test]
fn suites_without_cases_yield_nothing() {
    let xml = r#"<testsuites><testsuite name="Empty" timestamp="2024-01-01T00:00:00"/></testsuites>"#;
    assert!(parse_report_str(xml, "empty.xml").unwrap().is_empty());

    let no_suites = "<testsuites></testsuites>";
    assert!(parse_report_str(no_suites, "none.xml").unwrap().is_empty());
}

#[test]
fn root_testsuite_is_treated_as_single_suite() {
    let xml = r#"<testsuite name="Solo" timestamp="2024-03-02T09:00:00">
        <testcase name="A" status="PASSED" time="0.1"/>
        <testcase name="B" status="PASSED" time="0.2"/>
    </testsuite>"#;
    let records = parse_report_str(xml, "solo.xml").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].suite, "Solo");
    assert_eq!(records[0].date, "2024-03-02");
}

#[test]
fn nested_suites_are_not_descended() {
    // Only direct <testsuite> children of the root count as suites
    let xml = r#"<testsuites>
        <testsuite name="Outer"><testsuite name="Inner"><testcase name="X"/></testsuite></testsuite>
    </testsuites>"#;
    assert!(parse_report_str(xml, "nested.xml").unwrap().is_empty());
}

// ============================================================================
// 2. Field normalization
// ============================================================================

#[test]
fn hierarchical_name_keeps_leaf() {
    let xml = report_with_cases("S", "2024-01-01T00:00:00", &[("GroupA/LoginTest", "PASSED")]);
    let records = parse_report_str(&xml, "f.xml").unwrap();
    assert_eq!(records[0].test_case, "LoginTest");
}

#[test]
fn date_is_truncated_timestamp() {
    let records = parse_report_str(NIGHTLY_REPORT, "f.xml").unwrap();
    assert_eq!(records[0].date, "2024-01-15");
    assert_eq!(records[3].date, "2024-01-16");
}

#[test]
fn missing_timestamp_gives_empty_date() {
    let xml = r#"<testsuites><testsuite name="S"><testcase name="A" status="PASSED"/></testsuite></testsuites>"#;
    let records = parse_report_str(xml, "f.xml").unwrap();
    assert_eq!(records[0].date, "");
}

#[test]
fn missing_status_is_unknown() {
    let records = parse_report_str(NIGHTLY_REPORT, "f.xml").unwrap();
    assert_eq!(records[3].status, TestStatus::Unknown);
    assert_eq!(records[3].error_message, "");
}

#[test]
fn unrecognized_status_is_preserved() {
    let xml = report_with_cases("S", "2024-01-01T00:00:00", &[("A", "ERROR")]);
    let records = parse_report_str(&xml, "f.xml").unwrap();
    assert_eq!(records[0].status, TestStatus::Other("ERROR".into()));
    assert_eq!(records[0].status.as_str(), "ERROR");
}

#[test]
fn duration_is_rounded_and_defaulted() {
    let records = parse_report_str(NIGHTLY_REPORT, "f.xml").unwrap();
    assert_eq!(records[0].duration_seconds, 1.23);
    assert_eq!(records[1].duration_seconds, 2.5);

    let xml = r#"<testsuites><testsuite name="S">
        <testcase name="NoTime" status="PASSED"/>
        <testcase name="BadTime" status="PASSED" time="n/a"/>
    </testsuite></testsuites>"#;
    let records = parse_report_str(xml, "f.xml").unwrap();
    assert_eq!(records[0].duration_seconds, 0.0);
    assert_eq!(records[1].duration_seconds, 0.0);
}

// ============================================================================
// 3. Error message precedence
// ============================================================================

#[test]
fn failed_without_error_text_is_generic() {
    let records = parse_report_str(NIGHTLY_REPORT, "f.xml").unwrap();
    assert_eq!(records[1].status, TestStatus::Failed);
    assert_eq!(records[1].error_message, "Failed");
}

#[test]
fn passed_has_empty_error_message() {
    let records = parse_report_str(NIGHTLY_REPORT, "f.xml").unwrap();
    assert_eq!(records[0].status, TestStatus::Passed);
    assert_eq!(records[0].error_message, "");
}

#[test]
fn system_err_wins() {
    let records = parse_report_str(NIGHTLY_REPORT, "f.xml").unwrap();
    assert_eq!(records[2].error_message, "Element 'q' not found");
}

#[test]
fn failure_element_used_when_no_system_err() {
    let xml = r#"<testsuites><testsuite name="S">
        <testcase name="A" status="FAILED"><failure message="expected 2 got 3">stack</failure></testcase>
        <testcase name="B" status="FAILED"><failure>  body only  </failure></testcase>
        <testcase name="C" status="FAILED"><system-err>  </system-err></testcase>
    </testsuite></testsuites>"#;
    let records = parse_report_str(xml, "f.xml").unwrap();
    assert_eq!(records[0].error_message, "expected 2 got 3");
    assert_eq!(records[1].error_message, "body only");
    assert_eq!(records[2].error_message, "Failed");
}

// ============================================================================
// 4. Details truncation
// ============================================================================

#[test]
fn long_details_truncated_to_300_chars() {
    let long = "x".repeat(450);
    let xml = format!(
        "<testsuites><testsuite name=\"S\"><testcase name=\"A\" status=\"PASSED\"><system-out>\n   {}   \n</system-out></testcase></testsuite></testsuites>",
        long
    );
    let records = parse_report_str(&xml, "f.xml").unwrap();
    assert_eq!(records[0].details.chars().count(), 300);
    assert!(records[0].details.chars().all(|c| c == 'x'));
}

#[test]
fn short_details_preserved_after_trim() {
    let records = parse_report_str(NIGHTLY_REPORT, "f.xml").unwrap();
    assert_eq!(records[0].details, "Login ok");
    assert_eq!(records[1].details, "logout trace");
}

#[test]
fn escaped_and_cdata_text_is_decoded() {
    let xml = r#"<testsuites><testsuite name="S"><testcase name="A" status="FAILED">
        <system-err><![CDATA[a < b && c]]></system-err>
        <system-out>5 &gt; 4</system-out>
    </testcase></testsuite></testsuites>"#;
    let records = parse_report_str(xml, "f.xml").unwrap();
    assert_eq!(records[0].error_message, "a < b && c");
    assert_eq!(records[0].details, "5 > 4");
}

// ============================================================================
// 5. Malformed input
// ============================================================================

#[test]
fn malformed_xml_is_an_error() {
    assert!(parse_report_str("<testsuites><testsuite name=\"S\">", "f.xml").is_err());
    assert!(parse_report_str("not xml at all", "f.xml").is_err());
}

#[test]
fn trailing_top_level_element_is_an_error() {
    let xml = "<testsuites><testsuite name=\"S\"><testcase name=\"a\"/></testsuite></testsuites><other/>";
    assert!(parse_report_str(xml, "f.xml").is_err());
}

#[test]
fn declared_latin1_report_is_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("JUnit_Report.xml");
    std::fs::write(
        &path,
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n\
          <testsuites><testsuite name=\"Men\xFA\" timestamp=\"2024-01-15T10:00:00\">\
          <testcase name=\"Caf\xE9\" time=\"1.5\" status=\"PASSED\"/>\
          </testsuite></testsuites>",
    )
    .unwrap();

    let records = extract_folder(dir.path(), &ExtractOptions::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].suite, "Men\u{fa}");
    assert_eq!(records[0].test_case, "Caf\u{e9}");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(parse_report_file(&dir.path().join("nope_JUnit_Report.xml")).is_err());
}

// ============================================================================
// 6. Folder walking
// ============================================================================

#[test]
fn folder_walk_finds_nested_reports_only() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(root, "run1/JUnit_Report.xml", NIGHTLY_REPORT);
    write_file(
        root,
        "run2/deep/20240116_JUnit_Report.xml",
        &report_with_cases("Deep", "2024-01-16T00:00:00", &[("A", "PASSED")]),
    );
    write_file(root, "run1/execution0.log", "noise");
    write_file(root, "run1/other.xml", NIGHTLY_REPORT);

    let found = discover_reports(root, "JUnit_Report");
    assert_eq!(found.len(), 2);

    let records = extract_folder(root, &ExtractOptions::default());
    assert_eq!(records.len(), 5);
}

#[cfg(unix)]
#[test]
fn symlinked_report_is_discovered() {
    let dir = tempfile::tempdir().unwrap();
    let target = write_file(dir.path(), "artifacts/nightly.xml", NIGHTLY_REPORT);
    let root = dir.path().join("reports");
    std::fs::create_dir_all(&root).unwrap();
    std::os::unix::fs::symlink(&target, root.join("JUnit_Report.xml")).unwrap();

    assert_eq!(discover_reports(&root, "JUnit_Report").len(), 1);
    let records = extract_folder(&root, &ExtractOptions::default());
    assert_eq!(records.len(), 4);
}

#[test]
fn malformed_file_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(root, "a/JUnit_Report.xml", NIGHTLY_REPORT);
    write_file(root, "b/JUnit_Report.xml", "<testsuites><testsuite>");

    let records = extract_folder(root, &ExtractOptions::default());
    assert_eq!(records.len(), 4);
}

#[test]
fn empty_tree_yields_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "notes.txt", "nothing here");
    assert!(extract_folder(dir.path(), &ExtractOptions::default()).is_empty());
}

#[test]
fn missing_root_yields_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    assert!(extract_folder(&missing, &ExtractOptions::default()).is_empty());
}

#[test]
fn traversal_order_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(root, "b/JUnit_Report.xml", &report_with_cases("B", "2024-01-02T00:00:00", &[("b1", "PASSED")]));
    write_file(root, "a/JUnit_Report.xml", &report_with_cases("A", "2024-01-01T00:00:00", &[("a1", "PASSED")]));
    write_file(root, "c/JUnit_Report.xml", &report_with_cases("C", "2024-01-03T00:00:00", &[("c1", "PASSED")]));

    let first = extract_folder(root, &ExtractOptions::default());
    let second = extract_folder(root, &ExtractOptions::default());
    assert_eq!(first, second);
    let suites: Vec<&str> = first.iter().map(|r| r.suite.as_str()).collect();
    assert_eq!(suites, vec!["A", "B", "C"]);
}

#[test]
fn repeated_tests_across_files_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(root, "day1/JUnit_Report.xml", NIGHTLY_REPORT);
    write_file(root, "day2/JUnit_Report.xml", NIGHTLY_REPORT);
    let records = extract_folder(root, &ExtractOptions::default());
    assert_eq!(records.len(), 8);
    assert_eq!(records.iter().filter(|r| r.test_case == "LoginTest").count(), 2);
}

#[test]
fn custom_marker_and_project() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(root, "results-junit.xml", NIGHTLY_REPORT);
    write_file(root, "JUnit_Report.xml", NIGHTLY_REPORT);

    let options = ExtractOptions {
        marker: "results-junit".to_string(),
        project: Some("Storefront".to_string()),
    };
    let records = extract_folder(root, &options);
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.project.as_deref() == Some("Storefront")));
}

// ============================================================================
// 7. CSV output
// ============================================================================

#[test]
fn csv_header_without_project() {
    assert_eq!(
        header(false),
        vec!["Date", "Suite", "Test Case", "Status", "Duration (s)", "Error Message", "Details", "File"]
    );
    assert_eq!(header(true)[1], "Project");
}

#[test]
fn csv_rows_quote_special_characters() {
    let mut records = parse_report_str(NIGHTLY_REPORT, "f.xml").unwrap();
    records[2].error_message = "line one, with comma\n\"quoted\"".to_string();
    let text = String::from_utf8(to_csv_bytes(&records, false).unwrap()).unwrap();

    let first_line = text.lines().next().unwrap();
    assert_eq!(first_line, "Date,Suite,Test Case,Status,Duration (s),Error Message,Details,File");
    assert!(text.contains("2024-01-15,Smoke,LoginTest,PASSED,1.23,,Login ok,f.xml"));
    assert!(text.contains("\"line one, with comma\n\"\"quoted\"\"\""));
}

#[test]
fn write_creates_directories_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("processed/nested/results.csv");
    let records = parse_report_str(NIGHTLY_REPORT, "f.xml").unwrap();

    write_records(&path, &records, false).unwrap();
    let first = std::fs::read_to_string(&path).unwrap();
    assert_eq!(first.lines().count(), 5);

    write_records(&path, &records[..1], false).unwrap();
    let second = std::fs::read_to_string(&path).unwrap();
    assert_eq!(second.lines().count(), 2);

    // No temp file left behind
    let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn failed_rename_removes_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    // A non-empty directory at the target path makes the final rename fail
    let path = dir.path().join("results.csv");
    write_file(&path, "keep.txt", "occupied");
    let records = parse_report_str(NIGHTLY_REPORT, "f.xml").unwrap();

    assert!(write_records(&path, &records, false).is_err());
    assert!(!dir.path().join(".results.csv.tmp").exists());
    assert!(path.join("keep.txt").exists());
}
