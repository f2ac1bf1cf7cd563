//! Run history view (`history.html`).

use crate::config::RenderConfig;
use crate::history::HistoryLog;
use crate::models::RunSummary;

use super::{escape_html, format_percent, format_run_time, percent, short_id, BASE_CSS};

const HISTORY_CSS: &str = r#"
        .container { max-width: 1200px; margin: 0 auto; }
        h1 { color: #333; font-size: 28px; margin-bottom: 10px; }
        .subtitle { color: #666; font-size: 14px; }
        .nav-buttons { margin-top: 20px; display: flex; gap: 10px; flex-wrap: wrap; }
        .nav-button { display: inline-block; padding: 10px 20px; background: #6c757d; color: white; text-decoration: none; border-radius: 4px; font-size: 14px; }
        .nav-button:hover { background: #5a6268; }
        .table-container { background: white; border-radius: 8px; padding: 20px; box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2); overflow-x: auto; }
        table { width: 100%; border-collapse: collapse; }
        thead { background: #f8f9fa; border-bottom: 2px solid #dee2e6; }
        th { padding: 15px; text-align: left; font-weight: 600; color: #333; font-size: 14px; }
        td { padding: 15px; border-bottom: 1px solid #dee2e6; font-size: 14px; }
        tr:hover { background: #f8f9fa; }
        code { background: #f5f5f5; padding: 4px 8px; border-radius: 4px; font-size: 12px; }
        .status { display: inline-block; padding: 6px 12px; border-radius: 20px; font-weight: 600; font-size: 12px; }
        .status.passed { background: #d4edda; color: #155724; }
        .status.failed { background: #f8d7da; color: #721c24; }
        .status.unknown { background: #fff3cd; color: #856404; }
        .badge { display: inline-block; padding: 4px 8px; border-radius: 4px; font-size: 12px; font-weight: 600; background: #e9ecef; color: #495057; }
        .badge.smoke { background: #cfe2ff; color: #084298; }
        .badge.regression { background: #d3f9d8; color: #2b8a3e; }
        td .progress-bar { max-width: 150px; height: 6px; }
        .link { color: #667eea; text-decoration: none; }
        .link:hover { text-decoration: underline; }
        .empty-state { text-align: center; padding: 40px; color: #666; }
        .empty-state h3 { margin-bottom: 10px; }
"#;

const EMPTY_STATE: &str = r#"<div class="empty-state">
                <h3>No test runs yet</h3>
                <p>Test history will appear here as workflows run</p>
            </div>"#;

fn render_row(run: &RunSummary, options: &RenderConfig) -> String {
    let counts = run.counts();
    let pass_rate = format_percent(percent(counts.passed, counts.total));
    let fill_class = if counts.failed > 0 { " failed" } else { "" };
    let status = run.status.as_str();
    let report_link = escape_html(&options.report_link);

    format!(
        r#"
                    <tr>
                        <td><code>{build_id}</code></td>
                        <td><span class="badge {badge_class}">{pipeline}</span></td>
                        <td><span class="status {status}">{status_label}</span></td>
                        <td>
                            <strong>{passed}</strong> ✅ /
                            <strong>{failed}</strong> ❌ /
                            <strong>{skipped}</strong> ⏭️
                        </td>
                        <td>
                            <div class="progress-bar">
                                <div class="progress-fill{fill_class}" style="width: {pass_rate}%"></div>
                            </div>
                        </td>
                        <td>{branch}</td>
                        <td><small>{when}</small></td>
                        <td><a href="{report_link}" class="link">Details →</a></td>
                    </tr>"#,
        build_id = escape_html(short_id(&run.build_id)),
        badge_class = escape_html(&run.pipeline_name.to_lowercase()),
        pipeline = escape_html(&run.pipeline_name),
        status_label = status.to_uppercase(),
        passed = counts.passed,
        failed = counts.failed,
        skipped = counts.skipped,
        branch = escape_html(&run.branch),
        when = escape_html(&format_run_time(&run.timestamp, &options.history_date_format)),
    )
}

fn render_table(rows: &str) -> String {
    format!(
        r#"<table>
                <thead>
                    <tr>
                        <th>Build ID</th>
                        <th>Pipeline</th>
                        <th>Status</th>
                        <th>Results</th>
                        <th>Progress</th>
                        <th>Branch</th>
                        <th>Timestamp</th>
                        <th>Action</th>
                    </tr>
                </thead>
                <tbody>{rows}
                </tbody>
            </table>"#
    )
}

/// Render the history view, one row per well-formed entry in log order.
///
/// A log with nothing renderable produces the empty state rather than an
/// empty table.
pub fn render_history(log: &HistoryLog, options: &RenderConfig) -> String {
    let rows: Vec<String> = log.runs().map(|run| render_row(run, options)).collect();

    let body = if rows.is_empty() {
        EMPTY_STATE.to_string()
    } else {
        render_table(&rows.concat())
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Test History - testboard</title>
    <style>{base_css}{history_css}    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>📊 Test Run History</h1>
            <p class="subtitle">Complete history of all test executions</p>
            <div class="nav-buttons">
                <a href="./index.html" class="nav-button">← Back to Latest</a>
                <a href="{report_link}" class="nav-button">View Latest Report</a>
            </div>
        </header>

        <div class="table-container">
            {body}
        </div>

        <footer>
            <p>Generated by testboard | Showing last {shown} runs</p>
        </footer>
    </div>
</body>
</html>
"#,
        lang = escape_html(&options.lang),
        base_css = BASE_CSS,
        history_css = HISTORY_CSS,
        report_link = escape_html(&options.report_link),
        shown = log.len(),
    )
}
