use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn testboard_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("testboard");
    path
}

const REPORT: &str = r#"{
  "config": {},
  "suites": [
    {"title": "login", "tests": [{"status": "passed"}, {"status": "passed"}, {"status": "passed"}]},
    {"title": "checkout", "tests": [{"status": "failed"}, {"status": "skipped"}]}
  ]
}"#;

fn setup_test_env(with_report: bool) -> TempDir {
    let tmp = TempDir::new().unwrap();
    if with_report {
        let report_dir = tmp.path().join("playwright-report");
        fs::create_dir_all(&report_dir).unwrap();
        fs::write(report_dir.join("index.json"), REPORT).unwrap();
    }
    tmp
}

fn run_testboard(root: &Path, build_id: Option<&str>, args: &[&str]) -> (String, String, bool) {
    let binary = testboard_binary();
    let mut cmd = Command::new(&binary);
    cmd.current_dir(root)
        .args(args)
        .env_remove("CI_BUILD_ID")
        .env_remove("CI_BUILD_URL")
        .env_remove("CI_COMMIT_SHA")
        .env("CI_COMMIT_REF", "refs/heads/main")
        .env("CI_PIPELINE_NAME", "Regression");
    if let Some(id) = build_id {
        cmd.env("CI_BUILD_ID", id);
    }
    let output = cmd
        .output()
        .unwrap_or_else(|e| panic!("Failed to run testboard binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_dashboard_summarizes_report() {
    let tmp = setup_test_env(true);

    let (stdout, stderr, success) = run_testboard(tmp.path(), Some("1001"), &["dashboard"]);
    assert!(success, "dashboard failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("index.html"));
    assert!(stdout.contains("test-summary.json"));

    let summary = read_json(&tmp.path().join("public/test-summary.json"));
    assert_eq!(summary["buildId"], "1001");
    assert_eq!(summary["branch"], "main");
    assert_eq!(summary["pipelineName"], "Regression");
    assert_eq!(summary["total"], 5);
    assert_eq!(summary["passed"], 3);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["skipped"], 1);
    assert_eq!(summary["status"], "failed");

    let html = fs::read_to_string(tmp.path().join("public/index.html")).unwrap();
    assert!(html.contains("Test Dashboard - Regression"));
    assert!(html.contains("width: 60%"));
}

#[test]
fn test_dashboard_without_report_degrades() {
    let tmp = setup_test_env(false);

    let (stdout, stderr, success) = run_testboard(tmp.path(), None, &["dashboard"]);
    assert!(success, "dashboard failed: stdout={}, stderr={}", stdout, stderr);

    let summary = read_json(&tmp.path().join("public/test-summary.json"));
    assert_eq!(summary["status"], "unknown");
    assert_eq!(summary["total"], 0);
    assert!(summary["buildId"].as_str().unwrap().starts_with("local-"));
    assert_eq!(summary["commitSha"], "unknown");
}

#[test]
fn test_dashboard_with_corrupt_report_degrades() {
    let tmp = setup_test_env(false);
    let report_dir = tmp.path().join("playwright-report");
    fs::create_dir_all(&report_dir).unwrap();
    fs::write(report_dir.join("index.json"), "{ truncated").unwrap();

    let (_, _, success) = run_testboard(tmp.path(), Some("7"), &["dashboard"]);
    assert!(success);
    let summary = read_json(&tmp.path().join("public/test-summary.json"));
    assert_eq!(summary["status"], "unknown");
}

#[test]
fn test_history_idempotent_for_same_build() {
    let tmp = setup_test_env(true);

    run_testboard(tmp.path(), Some("42"), &["dashboard"]);
    let (stdout, stderr, success) = run_testboard(tmp.path(), Some("42"), &["history"]);
    assert!(success, "history failed: stdout={}, stderr={}", stdout, stderr);

    let history_path = tmp.path().join("public/history.json");
    let before = fs::read(&history_path).unwrap();

    let (_, _, success) = run_testboard(tmp.path(), Some("42"), &["history"]);
    assert!(success);
    let after = fs::read(&history_path).unwrap();
    assert_eq!(before, after);

    let history = read_json(&history_path);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[test]
fn test_history_retention_drops_oldest() {
    let tmp = setup_test_env(true);

    for i in 1..=31 {
        let id = format!("build-{:02}", i);
        let (_, stderr, success) = run_testboard(tmp.path(), Some(id.as_str()), &["run"]);
        assert!(success, "run {} failed: {}", id, stderr);
    }

    let history = read_json(&tmp.path().join("public/history.json"));
    let ids: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["buildId"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 30);
    assert_eq!(ids[0], "build-31");
    assert_eq!(ids[29], "build-02");
    assert!(!ids.contains(&"build-01"));
}

#[test]
fn test_history_recovers_from_corrupt_log() {
    let tmp = setup_test_env(true);
    let public = tmp.path().join("public");
    fs::create_dir_all(&public).unwrap();
    fs::write(public.join("history.json"), "[{ broken").unwrap();

    let (stdout, stderr, success) = run_testboard(tmp.path(), Some("5"), &["run"]);
    assert!(success, "run failed: stdout={}, stderr={}", stdout, stderr);

    let history = read_json(&public.join("history.json"));
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["buildId"], "5");

    let html = fs::read_to_string(public.join("history.html")).unwrap();
    assert!(html.contains("<code>5</code>"));
}

#[test]
fn test_history_without_anything_renders_empty_state() {
    let tmp = setup_test_env(false);

    let (_, _, success) = run_testboard(tmp.path(), None, &["history"]);
    assert!(success);

    let html = fs::read_to_string(tmp.path().join("public/history.html")).unwrap();
    assert!(html.contains("No test runs yet"));
    assert!(!tmp.path().join("public/history.json").exists());
}

#[test]
fn test_write_failure_exits_nonzero() {
    let tmp = setup_test_env(true);
    fs::write(tmp.path().join("public"), "not a directory").unwrap();

    let (_, _, success) = run_testboard(tmp.path(), Some("1"), &["dashboard"]);
    assert!(!success, "dashboard should fail when output cannot be written");
}

#[test]
fn test_history_write_failure_exits_nonzero() {
    let tmp = setup_test_env(true);
    let (_, stderr, success) = run_testboard(tmp.path(), Some("2"), &["dashboard"]);
    assert!(success, "dashboard failed: {}", stderr);

    // A directory where the history file should be makes the rename fail.
    let blocked = tmp.path().join("public/history.json");
    fs::create_dir_all(&blocked).unwrap();
    fs::write(blocked.join("keep"), "x").unwrap();

    let (_, stderr, success) = run_testboard(tmp.path(), Some("2"), &["history"]);
    assert!(!success, "history should fail when history.json cannot be written");
    assert!(stderr.contains("Failed to persist history"));
}

#[test]
fn test_custom_config_retention() {
    let tmp = setup_test_env(true);
    let config_dir = tmp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("testboard.toml"),
        r#"[paths]
public_dir = "site"

[history]
retention = 2
"#,
    )
    .unwrap();

    for id in ["a", "b", "c"] {
        let (_, stderr, success) = run_testboard(tmp.path(), Some(id), &["run"]);
        assert!(success, "run failed: {}", stderr);
    }

    let history = read_json(&tmp.path().join("site/history.json"));
    let ids: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["buildId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c", "b"]);
}

#[test]
fn test_missing_explicit_config_fails() {
    let tmp = setup_test_env(true);
    let (_, _, success) = run_testboard(tmp.path(), None, &["--config", "nope.toml", "dashboard"]);
    assert!(!success);
}

#[test]
fn test_stats_lists_runs() {
    let tmp = setup_test_env(true);

    let (stdout, _, _) = run_testboard(tmp.path(), None, &["stats"]);
    assert!(stdout.contains("No test runs recorded."));

    run_testboard(tmp.path(), Some("stats-build-1"), &["run"]);
    let (stdout, stderr, success) = run_testboard(tmp.path(), None, &["stats"]);
    assert!(success, "stats failed: {}", stderr);
    assert!(stdout.contains("stats-bu"));
    assert!(stdout.contains("Regression"));
    assert!(stdout.contains("Runs: 1"));
}
