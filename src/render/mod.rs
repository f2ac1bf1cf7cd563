//! HTML rendering for the dashboard and history views.
//!
//! Both renderers are pure functions of their inputs: they never read the
//! clock, the environment, or the filesystem. Every interpolated value goes
//! through [`escape_html`].

pub mod dashboard;
pub mod history;

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::models::Timestamp;

pub use dashboard::render_dashboard;
pub use history::render_history;

/// Shared page chrome used by both documents.
const BASE_CSS: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            padding: 20px;
        }
        header {
            background: white;
            border-radius: 8px;
            padding: 30px;
            margin-bottom: 30px;
            box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2);
        }
        .progress-bar {
            width: 100%;
            height: 8px;
            background: #e9ecef;
            border-radius: 4px;
            overflow: hidden;
        }
        .progress-fill { height: 100%; background: linear-gradient(90deg, #28a745, #20c997); }
        .progress-fill.failed { background: linear-gradient(90deg, #dc3545, #ff6b6b); }
        .progress-fill.skipped { background: linear-gradient(90deg, #ffc107, #ffd75e); }
        footer {
            text-align: center;
            color: rgba(255, 255, 255, 0.8);
            padding: 20px;
            margin-top: 40px;
            font-size: 14px;
        }
"#;

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `count / total * 100`, or 0 when `total` is 0.
pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Percentage as a CSS-friendly number: at most two decimals, no trailing zeros.
pub fn format_percent(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}

/// First eight characters of an identifier.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Format a timestamp with a strftime pattern, falling back to RFC 3339
/// when the pattern is invalid.
pub fn format_timestamp(ts: &DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", ts.format(pattern)).is_err() {
        return ts.to_rfc3339();
    }
    out
}

/// Format a recorded run time. Text that does not parse is shown as stored.
pub fn format_run_time(ts: &Timestamp, pattern: &str) -> String {
    match ts.parse() {
        Some(parsed) => format_timestamp(&parsed, pattern),
        None => ts.as_str().to_string(),
    }
}
