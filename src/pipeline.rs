//! The two pipeline stages.
//!
//! Each stage reads its inputs, absorbing read failures at the function
//! that reads the file, and then writes its outputs. Any write failure is
//! returned to the caller with the offending path attached.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::environment::EnvironmentMetadata;
use crate::extract::{extract, read_report};
use crate::history::{aggregate, AggregateOutcome, HistoryLog};
use crate::models::RunSummary;
use crate::render::{render_dashboard, render_history};
use crate::store::{FileHistoryStore, HistoryStore};

/// Files written by the dashboard stage.
#[derive(Debug)]
pub struct DashboardOutput {
    pub summary: RunSummary,
    pub dashboard_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Result of the history stage.
#[derive(Debug)]
pub struct HistoryOutput {
    pub log: HistoryLog,
    /// `None` when no current summary could be read.
    pub outcome: Option<AggregateOutcome>,
    pub history_path: PathBuf,
}

/// Write a file, creating its parent directory first.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Stage one: summarize the raw report and render the dashboard.
pub fn run_dashboard_stage(
    config: &Config,
    env: &EnvironmentMetadata,
    now: DateTime<Utc>,
) -> Result<DashboardOutput> {
    let raw = read_report(&config.paths.report);
    let summary = extract(raw.as_deref(), env, now);
    tracing::info!(
        build_id = %summary.build_id,
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        status = %summary.status,
        "run summarized"
    );

    let html = render_dashboard(&summary, env, now, &config.render);
    let json = serde_json::to_string_pretty(&summary)?;

    let dashboard_path = config.paths.dashboard_html();
    let summary_path = config.paths.summary_json();
    write_output(&dashboard_path, html.as_bytes())?;
    write_output(&summary_path, json.as_bytes())?;

    Ok(DashboardOutput {
        summary,
        dashboard_path,
        summary_path,
    })
}

/// Read the current-run summary written by stage one.
pub fn read_summary(path: &Path) -> Option<RunSummary> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "current summary unavailable");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "error reading summary");
            None
        }
    }
}

/// Stage two: fold the current summary into the history and render it.
///
/// The store is written only when the log actually changed, so re-running
/// the stage for the same build leaves the stored log untouched.
pub fn run_history_stage(config: &Config, store: &dyn HistoryStore) -> Result<HistoryOutput> {
    let prior = store.load();

    let (log, outcome) = match read_summary(&config.paths.summary_json()) {
        Some(summary) => {
            let build_id = summary.build_id.clone();
            let (log, outcome) = aggregate(prior, summary, config.history.retention);
            match outcome {
                AggregateOutcome::Duplicate => {
                    tracing::info!(%build_id, "build already recorded, history unchanged");
                }
                AggregateOutcome::Appended { dropped } => {
                    store.save(&log).context("Failed to persist history")?;
                    tracing::info!(%build_id, entries = log.len(), dropped, "history updated");
                }
            }
            (log, Some(outcome))
        }
        None => (prior, None),
    };

    let html = render_history(&log, &config.render);
    let history_path = config.paths.history_html();
    write_output(&history_path, html.as_bytes())?;

    Ok(HistoryOutput {
        log,
        outcome,
        history_path,
    })
}

/// Build the file store described by `config`.
pub fn open_history_store(config: &Config) -> FileHistoryStore {
    FileHistoryStore::new(config.paths.history_json())
        .with_revision_check(config.history.revision_check)
}
