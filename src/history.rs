//! History aggregation.
//!
//! The [`HistoryLog`] is a most-recent-first list of entries, deduplicated
//! on `buildId` and bounded by a retention count. It is not re-sorted by
//! timestamp: order is insertion order.

use serde::{Deserialize, Serialize};

use crate::models::{HistoryEntry, RunSummary};

/// Number of runs kept when no retention is configured.
pub const DEFAULT_RETENTION: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

/// What [`aggregate`] did to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOutcome {
    /// The build was already present; the log is unchanged.
    Duplicate,
    /// The run was prepended and `dropped` old entries fell off the end.
    Appended { dropped: usize },
}

impl AggregateOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, AggregateOutcome::Appended { .. })
    }
}

impl HistoryLog {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_build(&self, build_id: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.build_id() == Some(build_id))
    }

    /// Well-formed runs in log order, skipping malformed entries.
    pub fn runs(&self) -> impl Iterator<Item = &RunSummary> {
        self.entries.iter().filter_map(HistoryEntry::as_run)
    }
}

/// Add `summary` to the front of `prior`, keeping at most `retention` entries.
///
/// Re-aggregating a build that is already present returns the log untouched,
/// which keeps re-run CI steps idempotent.
pub fn aggregate(
    prior: HistoryLog,
    summary: RunSummary,
    retention: usize,
) -> (HistoryLog, AggregateOutcome) {
    if prior.contains_build(&summary.build_id) {
        return (prior, AggregateOutcome::Duplicate);
    }

    let mut entries = Vec::with_capacity(prior.len() + 1);
    entries.push(HistoryEntry::Run(summary));
    entries.extend(prior.entries);

    let dropped = entries.len().saturating_sub(retention);
    entries.truncate(retention);

    (HistoryLog { entries }, AggregateOutcome::Appended { dropped })
}
