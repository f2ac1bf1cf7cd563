//! Summary extraction.
//!
//! Turns a raw report (or the absence of one) plus CI metadata into a
//! [`RunSummary`]. Extraction never fails: a missing or unparsable report
//! degrades to a zero-count summary with status `unknown`, so a broken
//! report never blocks publication of the dashboard.

use chrono::{DateTime, Utc};
use std::path::Path;

use crate::environment::EnvironmentMetadata;
use crate::models::{RunStatus, RunSummary, TestCounts};
use crate::report::{count_tests, parse_report};

/// Read the raw report text, or `None` if it is absent or unreadable.
pub fn read_report(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "test report not found");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read test report");
            None
        }
    }
}

pub fn extract(
    raw: Option<&str>,
    env: &EnvironmentMetadata,
    timestamp: DateTime<Utc>,
) -> RunSummary {
    let (counts, status) = match raw.map(parse_report) {
        Some(Ok(report)) => {
            let counts = count_tests(&report);
            if counts.unclassified() > 0 {
                tracing::warn!(
                    unclassified = counts.unclassified(),
                    "tests with unrecognized status counted in total only"
                );
            }
            (counts, RunStatus::from_counts(&counts))
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "error reading test results");
            (TestCounts::default(), RunStatus::Unknown)
        }
        None => (TestCounts::default(), RunStatus::Unknown),
    };

    RunSummary::new(env, counts, status, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn env() -> EnvironmentMetadata {
        EnvironmentMetadata {
            build_id: "42".to_string(),
            build_url: "http://ci/42".to_string(),
            commit_sha: "0123456789abcdef".to_string(),
            branch: "main".to_string(),
            pipeline_name: "Regression".to_string(),
        }
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_absent_report_is_unknown() {
        let summary = extract(None, &env(), ts());
        assert_eq!(summary.status, RunStatus::Unknown);
        assert_eq!(summary.counts(), TestCounts::default());
        assert_eq!(summary.build_id, "42");
    }

    #[test]
    fn test_malformed_report_is_unknown() {
        let summary = extract(Some("{\"suites\": ["), &env(), ts());
        assert_eq!(summary.status, RunStatus::Unknown);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_scenario_summary() {
        let raw = r#"{"suites": [
            {"tests": [{"status": "passed"}, {"status": "passed"}, {"status": "passed"}]},
            {"tests": [{"status": "failed"}, {"status": "skipped"}]}
        ]}"#;
        let summary = extract(Some(raw), &env(), ts());
        assert_eq!(summary.total, 5);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.status, RunStatus::Failed);
        assert_eq!(summary.timestamp.parse(), Some(ts()));
    }

    #[test]
    fn test_empty_report_passes() {
        let summary = extract(Some(r#"{"suites": []}"#), &env(), ts());
        assert_eq!(summary.status, RunStatus::Passed);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_metadata_passed_through() {
        let mut env = env();
        env.commit_sha = "not a sha at all".to_string();
        let summary = extract(None, &env, ts());
        assert_eq!(summary.commit_sha, "not a sha at all");
        assert_eq!(summary.pipeline_name, "Regression");
        assert_eq!(summary.branch, "main");
    }

    #[test]
    fn test_read_report_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(read_report(&tmp.path().join("index.json")).is_none());
    }
}
