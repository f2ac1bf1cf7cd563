//! Raw test-runner report parsing.
//!
//! The report is a tree: a root holding suites, each suite holding tests,
//! nested suites, and specs (which hold tests of their own). Only the
//! shape needed to count test outcomes is modelled; everything else in the
//! document is ignored.

use serde::Deserialize;
use thiserror::Error;

use crate::models::TestCounts;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("report is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
pub struct RawReport {
    #[serde(default)]
    pub suites: Vec<RawSuite>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSuite {
    #[serde(default)]
    pub tests: Vec<RawTest>,
    #[serde(default)]
    pub specs: Vec<RawSpec>,
    #[serde(default)]
    pub suites: Vec<RawSuite>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSpec {
    #[serde(default)]
    pub tests: Vec<RawTest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTest {
    /// Missing or unrecognized statuses are counted in `total` only.
    #[serde(default)]
    pub status: Option<String>,
}

pub fn parse_report(text: &str) -> Result<RawReport, ParseError> {
    Ok(serde_json::from_str(text)?)
}

/// Count every test leaf in the report exactly once.
pub fn count_tests(report: &RawReport) -> TestCounts {
    let mut counts = TestCounts::default();
    for suite in &report.suites {
        count_suite(suite, &mut counts);
    }
    counts
}

fn count_suite(suite: &RawSuite, counts: &mut TestCounts) {
    let spec_tests = suite.specs.iter().flat_map(|spec| spec.tests.iter());
    for test in suite.tests.iter().chain(spec_tests) {
        count_test(test, counts);
    }
    for child in &suite.suites {
        count_suite(child, counts);
    }
}

fn count_test(test: &RawTest, counts: &mut TestCounts) {
    counts.total += 1;
    match test.status.as_deref() {
        Some("passed") => counts.passed += 1,
        Some("failed") => counts.failed += 1,
        Some("skipped") => counts.skipped += 1,
        _ => {}
    }
}
