//! Current-run dashboard (`index.html`).

use chrono::{DateTime, Utc};

use crate::config::RenderConfig;
use crate::environment::EnvironmentMetadata;
use crate::models::{RunStatus, RunSummary};

use super::{
    escape_html, format_percent, format_run_time, format_timestamp, percent, short_id, BASE_CSS,
};

const DASHBOARD_CSS: &str = r#"
        .container { max-width: 1400px; margin: 0 auto; }
        h1 { color: #333; font-size: 32px; margin-bottom: 10px; display: flex; align-items: center; gap: 15px; }
        .status-icon { font-size: 28px; }
        .status-badge { display: inline-block; padding: 8px 16px; border-radius: 20px; font-weight: 600; font-size: 14px; }
        .status-badge.passed { background: #d4edda; color: #155724; }
        .status-badge.failed { background: #f8d7da; color: #721c24; }
        .status-badge.unknown { background: #fff3cd; color: #856404; }
        .breadcrumb { color: #666; font-size: 14px; margin-top: 10px; }
        .section-title { color: white; font-size: 24px; margin: 40px 0 20px; font-weight: 600; }
        .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 20px; margin-bottom: 30px; }
        .card, .meta-card, .alert { background: white; border-radius: 8px; padding: 20px; box-shadow: 0 5px 15px rgba(0, 0, 0, 0.1); }
        .card h3, .meta-card h3 { color: #333; font-size: 16px; margin-bottom: 15px; }
        .stat { display: flex; align-items: baseline; margin-bottom: 15px; }
        .stat-value { font-size: 36px; font-weight: bold; color: #667eea; min-width: 60px; }
        .stat-value.passed { color: #28a745; }
        .stat-value.failed { color: #dc3545; }
        .stat-value.skipped { color: #ffc107; }
        .stat-label { color: #666; font-size: 14px; margin-left: 10px; }
        .alert { margin-bottom: 20px; }
        .alert.success { border-left: 4px solid #28a745; background: #f0fdf4; }
        .alert.warning { border-left: 4px solid #ffc107; background: #fffbf0; }
        .alert.error { border-left: 4px solid #dc3545; background: #fdf6f6; }
        .alert-title { font-weight: 600; color: #333; margin-bottom: 5px; }
        .alert-message { color: #666; font-size: 14px; }
        .meta-item { display: flex; justify-content: space-between; padding: 10px 0; border-bottom: 1px solid #eee; }
        .meta-item:last-child { border-bottom: none; }
        .meta-label { color: #666; font-size: 14px; }
        .meta-value { color: #333; font-weight: 500; word-break: break-all; }
        .meta-value.code { font-family: 'Courier New', monospace; font-size: 12px; background: #f5f5f5; padding: 4px 8px; border-radius: 4px; }
        .link-button { display: inline-block; padding: 10px 20px; background: #667eea; color: white; text-decoration: none; border-radius: 4px; }
        .link-button:hover { background: #5568d3; }
"#;

fn status_icon(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Passed => "✅",
        RunStatus::Failed => "❌",
        RunStatus::Unknown => "⚠️",
    }
}

fn alert(summary: &RunSummary) -> String {
    match summary.status {
        RunStatus::Passed => format!(
            r#"<div class="alert success">
            <div class="alert-title">✅ All Tests Passed!</div>
            <div class="alert-message">All {} tests executed successfully.</div>
        </div>"#,
            summary.total
        ),
        RunStatus::Failed => format!(
            r#"<div class="alert error">
            <div class="alert-title">❌ Some Tests Failed</div>
            <div class="alert-message">{} out of {} tests failed. Please review the details below.</div>
        </div>"#,
            summary.failed, summary.total
        ),
        RunStatus::Unknown => r#"<div class="alert warning">
            <div class="alert-title">⚠️ No Test Results</div>
            <div class="alert-message">The test report was missing or could not be read.</div>
        </div>"#
            .to_string(),
    }
}

fn count_card(title: &str, class: &str, label: &str, count: u64, total: u64) -> String {
    format!(
        r#"<div class="card">
                <h3>{title}</h3>
                <div class="stat">
                    <div class="stat-value {class}">{count}</div>
                    <div class="stat-label">{label}</div>
                </div>
                <div class="progress-bar">
                    <div class="progress-fill {class}" style="width: {width}%"></div>
                </div>
            </div>"#,
        width = format_percent(percent(count, total)),
    )
}

fn meta_item(label: &str, value: &str, code: bool) -> String {
    format!(
        r#"<div class="meta-item">
                    <span class="meta-label">{}</span>
                    <span class="meta-value{}">{}</span>
                </div>"#,
        label,
        if code { " code" } else { "" },
        value
    )
}

/// Render the dashboard for one run.
///
/// `generated_at` is shown as the generation time; the renderer never reads
/// the clock itself.
pub fn render_dashboard(
    summary: &RunSummary,
    env: &EnvironmentMetadata,
    generated_at: DateTime<Utc>,
    options: &RenderConfig,
) -> String {
    let pipeline = escape_html(&summary.pipeline_name);
    let build_id = escape_html(&summary.build_id);
    let branch = escape_html(&summary.branch);
    let sha = escape_html(&summary.commit_sha);
    let short_sha = escape_html(short_id(&summary.commit_sha));
    let build_url = escape_html(&env.build_url);
    let report_link = escape_html(&options.report_link);
    let generated = escape_html(&format_timestamp(&generated_at, &options.date_format));
    let run_time = escape_html(&format_run_time(&summary.timestamp, &options.date_format));
    let status = summary.status;
    let counts = summary.counts();

    let cards = [
        format!(
            r#"<div class="card">
                <h3>📈 Total Tests</h3>
                <div class="stat">
                    <div class="stat-value">{}</div>
                    <div class="stat-label">tests executed</div>
                </div>
            </div>"#,
            counts.total
        ),
        count_card("✅ Passed", "passed", "tests passed", counts.passed, counts.total),
        count_card("❌ Failed", "failed", "tests failed", counts.failed, counts.total),
        count_card("⏭️ Skipped", "skipped", "tests skipped", counts.skipped, counts.total),
    ]
    .join("\n            ");

    let build_details = [
        meta_item("Pipeline Name", &pipeline, false),
        meta_item("Build ID", &build_id, true),
        meta_item("Branch", &branch, false),
        meta_item("Timestamp", &run_time, false),
    ]
    .join("\n                ");

    let git_info = [
        meta_item("Commit SHA", &short_sha, true),
        meta_item("Full SHA", &sha, true),
    ]
    .join("\n                ");

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Test Dashboard - {pipeline}</title>
    <style>{base_css}{dashboard_css}    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>
                <span class="status-icon">{icon}</span>
                Test Dashboard - {pipeline}
                <span class="status-badge {status_class}">{status_label}</span>
            </h1>
            <div class="breadcrumb">
                Branch: <strong>{branch}</strong> |
                Build: <strong>#{build_id}</strong> |
                Time: <strong>{run_time}</strong>
            </div>
        </header>

        {alert}

        <div class="section-title">📊 Test Summary</div>
        <div class="grid">
            {cards}
        </div>

        <div class="section-title">ℹ️ Pipeline Information</div>
        <div class="grid">
            <div class="meta-card">
                <h3>Build Details</h3>
                {build_details}
            </div>

            <div class="meta-card">
                <h3>Git Information</h3>
                {git_info}
            </div>

            <div class="meta-card">
                <h3>Quick Links</h3>
                <div class="meta-item">
                    <span class="meta-label">Test Report</span>
                    <span class="meta-value"><a href="{report_link}" class="link-button">View Report</a></span>
                </div>
                <div class="meta-item">
                    <span class="meta-label">Run History</span>
                    <span class="meta-value"><a href="./history.html" class="link-button">View History</a></span>
                </div>
                <div class="meta-item">
                    <span class="meta-label">CI/CD Pipeline</span>
                    <span class="meta-value"><a href="{build_url}" class="link-button" target="_blank">Open Build</a></span>
                </div>
            </div>
        </div>

        <footer>
            <p>Generated by testboard | {generated}</p>
        </footer>
    </div>
</body>
</html>
"#,
        lang = escape_html(&options.lang),
        base_css = BASE_CSS,
        dashboard_css = DASHBOARD_CSS,
        icon = status_icon(status),
        status_class = status.as_str(),
        status_label = status.as_str().to_uppercase(),
        alert = alert(summary),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestCounts;
    use chrono::TimeZone;

    fn env() -> EnvironmentMetadata {
        EnvironmentMetadata {
            build_id: "1234567890".to_string(),
            build_url: "https://ci.example.com/build?id=1&x=2".to_string(),
            commit_sha: "0123456789abcdef".to_string(),
            branch: "main".to_string(),
            pipeline_name: "Regression".to_string(),
        }
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    fn summary(counts: TestCounts, status: RunStatus) -> RunSummary {
        RunSummary::new(&env(), counts, status, ts())
    }

    #[test]
    fn test_zero_total_renders_zero_widths() {
        let html = render_dashboard(
            &summary(TestCounts::default(), RunStatus::Passed),
            &env(),
            ts(),
            &RenderConfig::default(),
        );
        assert_eq!(html.matches("width: 0%").count(), 3);
        assert!(!html.contains("NaN"));
        assert!(!html.contains("width: inf"));
    }

    #[test]
    fn test_widths_follow_counts() {
        let counts = TestCounts {
            total: 5,
            passed: 3,
            failed: 1,
            skipped: 1,
        };
        let html = render_dashboard(
            &summary(counts, RunStatus::Failed),
            &env(),
            ts(),
            &RenderConfig::default(),
        );
        assert!(html.contains("width: 60%"));
        assert_eq!(html.matches("width: 20%").count(), 2);
        assert!(html.contains("1 out of 5 tests failed"));
        assert!(html.contains(r#"status-badge failed">FAILED"#));
    }

    #[test]
    fn test_passed_and_unknown_badges() {
        let passed = render_dashboard(
            &summary(TestCounts::default(), RunStatus::Passed),
            &env(),
            ts(),
            &RenderConfig::default(),
        );
        assert!(passed.contains(r#"status-badge passed">PASSED"#));
        assert!(passed.contains("All Tests Passed"));

        let unknown = render_dashboard(
            &summary(TestCounts::default(), RunStatus::Unknown),
            &env(),
            ts(),
            &RenderConfig::default(),
        );
        assert!(unknown.contains(r#"status-badge unknown">UNKNOWN"#));
        assert!(unknown.contains("alert warning"));
    }

    #[test]
    fn test_metadata_and_escaping() {
        let html = render_dashboard(
            &summary(TestCounts::default(), RunStatus::Passed),
            &env(),
            ts(),
            &RenderConfig::default(),
        );
        assert!(html.contains(">01234567<"));
        assert!(html.contains("0123456789abcdef"));
        assert!(html.contains("https://ci.example.com/build?id=1&amp;x=2"));
        assert!(html.contains("01/03/2024, 12:30:00"));
        assert!(html.contains(r#"<html lang="pt-BR">"#));
    }

    #[test]
    fn test_deterministic() {
        let s = summary(TestCounts::default(), RunStatus::Passed);
        let a = render_dashboard(&s, &env(), ts(), &RenderConfig::default());
        let b = render_dashboard(&s, &env(), ts(), &RenderConfig::default());
        assert_eq!(a, b);
    }
}
