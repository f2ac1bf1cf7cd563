//! History statistics for the terminal.
//!
//! Provides a quick summary of what the history log holds: one line per
//! recorded run plus overall totals. Used by `testboard stats` to check
//! what the published history page will show without opening it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::config::Config;
use crate::history::HistoryLog;
use crate::pipeline::open_history_store;
use crate::render::{percent, short_id};
use crate::store::HistoryStore;

/// Run the stats command: load the history log and print a summary.
pub fn run_stats(config: &Config) -> Result<()> {
    let store = open_history_store(config);
    let log = store.load();
    print!("{}", format_stats(&log, Utc::now()));
    Ok(())
}

/// Render the stats table as plain text.
pub fn format_stats(log: &HistoryLog, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    out.push_str("testboard — Run History\n");
    out.push_str("=======================\n\n");

    if log.runs().next().is_none() {
        out.push_str("  No test runs recorded.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<10} {:<12} {:<8} {:>6} {:>6} {:>7} {:>7}   {}",
        "BUILD", "PIPELINE", "STATUS", "PASS", "FAIL", "SKIP", "RATE", "WHEN"
    );
    let _ = writeln!(out, "  {}", "-".repeat(82));

    let mut runs = 0u64;
    let mut total = 0u64;
    let mut passed = 0u64;
    let mut failing_runs = 0u64;

    for run in log.runs() {
        let counts = run.counts();
        runs += 1;
        total = total.saturating_add(counts.total);
        passed = passed.saturating_add(counts.passed);
        if counts.failed > 0 {
            failing_runs += 1;
        }
        let when = match run.timestamp.parse() {
            Some(ts) => format_ts_relative(ts, now),
            None => run.timestamp.as_str().to_string(),
        };
        let _ = writeln!(
            out,
            "  {:<10} {:<12} {:<8} {:>6} {:>6} {:>7} {:>6.1}%   {}",
            short_id(&run.build_id),
            run.pipeline_name,
            run.status,
            counts.passed,
            counts.failed,
            counts.skipped,
            percent(counts.passed, counts.total),
            when
        );
    }

    let skipped_entries = log.len() - runs as usize;

    out.push('\n');
    let _ = writeln!(
        out,
        "  Runs: {}   Failing runs: {}   Overall pass rate: {:.1}%",
        runs,
        failing_runs,
        percent(passed, total)
    );
    if skipped_entries > 0 {
        let _ = writeln!(out, "  Unreadable entries: {}", skipped_entries);
    }
    out
}

/// Format a timestamp relative to `now` (e.g. "3 hours ago").
fn format_ts_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (now - ts).num_seconds();

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}

fn format_ts_iso(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}
