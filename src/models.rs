//! Core data models used throughout testboard.
//!
//! These types represent the run summaries and history entries that flow
//! from the summary extractor through the history aggregator into the
//! rendered views.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::environment::EnvironmentMetadata;

/// Overall outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Passed,
    Failed,
    /// No report could be read for the run.
    Unknown,
}

impl RunStatus {
    /// `Passed` when nothing failed, `Failed` otherwise.
    pub fn from_counts(counts: &TestCounts) -> Self {
        if counts.failed == 0 {
            RunStatus::Passed
        } else {
            RunStatus::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Passed => "passed",
            RunStatus::Failed => "failed",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Flattened test counts for one report.
///
/// `total` counts every test leaf, including those whose status is not
/// one of the three named buckets, so `total` can exceed the bucket sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestCounts {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl TestCounts {
    /// Number of tests counted in `total` but in none of the buckets.
    pub fn unclassified(&self) -> u64 {
        let bucketed = self
            .passed
            .saturating_add(self.failed)
            .saturating_add(self.skipped);
        self.total.saturating_sub(bucketed)
    }
}

/// Run time as it appears on the wire.
///
/// The original text is kept so entries written by other producers go back
/// to disk exactly as they were read. It is parsed only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The instant in UTC, or `None` when the text is not RFC 3339.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.0)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    /// Millisecond precision with a `Z` suffix, e.g. `2024-03-01T12:00:00.000Z`.
    fn from(ts: DateTime<Utc>) -> Self {
        Timestamp(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// One record per CI execution. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub timestamp: Timestamp,
    pub build_id: String,
    pub pipeline_name: String,
    pub branch: String,
    pub commit_sha: String,
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub status: RunStatus,
    /// Fields written by other producers, preserved on write-back.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RunSummary {
    pub fn new(
        env: &EnvironmentMetadata,
        counts: TestCounts,
        status: RunStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            build_id: env.build_id.clone(),
            pipeline_name: env.pipeline_name.clone(),
            branch: env.branch.clone(),
            commit_sha: env.commit_sha.clone(),
            total: counts.total,
            passed: counts.passed,
            failed: counts.failed,
            skipped: counts.skipped,
            status,
            extra: BTreeMap::new(),
        }
    }

    pub fn counts(&self) -> TestCounts {
        TestCounts {
            total: self.total,
            passed: self.passed,
            failed: self.failed,
            skipped: self.skipped,
        }
    }
}

/// One element of the persisted history log.
///
/// Entries that no longer match the [`RunSummary`] shape are kept as raw
/// JSON so they survive a rewrite of the log; they are skipped when
/// rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    Run(RunSummary),
    Malformed(Value),
}

impl HistoryEntry {
    /// The dedup key, if the entry carries one.
    pub fn build_id(&self) -> Option<&str> {
        match self {
            HistoryEntry::Run(run) => Some(run.build_id.as_str()),
            HistoryEntry::Malformed(value) => value.get("buildId").and_then(Value::as_str),
        }
    }

    pub fn as_run(&self) -> Option<&RunSummary> {
        match self {
            HistoryEntry::Run(run) => Some(run),
            HistoryEntry::Malformed(_) => None,
        }
    }
}

impl From<RunSummary> for HistoryEntry {
    fn from(run: RunSummary) -> Self {
        HistoryEntry::Run(run)
    }
}
