use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Test record: one row per executed test case
// ============================================================================

/// Outcome of a single test case as reported by the runner.
///
/// The runner writes the outcome as a free-form `status` attribute. The two
/// outcomes the dashboard counts get their own variants; anything else the
/// runner reports (e.g. `ERROR`, `SKIPPED`) is kept verbatim so it survives
/// the CSV round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestStatus {
    Passed,
    Failed,
    /// The report carried no status at all
    Unknown,
    Other(String),
}

impl TestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
            TestStatus::Unknown => "UNKNOWN",
            TestStatus::Other(raw) => raw,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TestStatus::Failed)
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, TestStatus::Passed)
    }
}

impl From<&str> for TestStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "PASSED" => TestStatus::Passed,
            "FAILED" => TestStatus::Failed,
            "UNKNOWN" | "" => TestStatus::Unknown,
            other => TestStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for TestStatus {
    fn from(raw: String) -> Self {
        TestStatus::from(raw.as_str())
    }
}

impl From<TestStatus> for String {
    fn from(status: TestStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single test case execution, flattened out of a JUnit report.
///
/// Records are produced only by the parser and never mutated afterwards.
/// Every record traces back to one `(source_file, suite, test_case)`
/// occurrence; the same test appearing in several reports yields several
/// records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Date part of the suite timestamp, empty when the suite had none
    pub date: String,

    /// Project the report belongs to, when the extraction was given one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    pub suite: String,

    /// Leaf name of the test case
    pub test_case: String,

    pub status: TestStatus,

    /// Non-negative, rounded to two decimals
    pub duration_seconds: f64,

    pub error_message: String,

    /// Captured stdout, trimmed and capped at [`MAX_DETAILS_CHARS`]
    pub details: String,

    pub source_file: String,
}

/// Upper bound on the captured output kept per record.
pub const MAX_DETAILS_CHARS: usize = 300;

/// Error message used for failed cases that captured no error output.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed";
