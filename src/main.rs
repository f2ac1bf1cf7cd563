//! # testboard CLI
//!
//! The `testboard` binary runs the reporting stages of a CI test pipeline.
//! No stage takes arguments; paths and rendering options come from an
//! optional TOML config file.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `testboard dashboard` | Summarize the raw report, write `index.html` and `test-summary.json` |
//! | `testboard history` | Fold the current summary into `history.json`, write `history.html` |
//! | `testboard run` | Run `dashboard` then `history` |
//! | `testboard stats` | Print the stored history as a table |
//!
//! ## Examples
//!
//! ```bash
//! # After the test runner has written playwright-report/index.json
//! testboard dashboard
//! testboard history
//!
//! # With a custom config
//! testboard --config ./ci/testboard.toml run
//! ```

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use testboard::config;
use testboard::environment::EnvironmentMetadata;
use testboard::pipeline;
use testboard::stats;

/// testboard: test-run summaries, run history, and static dashboards for CI.
#[derive(Parser)]
#[command(
    name = "testboard",
    about = "testboard: test-run summaries, run history, and static dashboards for CI",
    version,
    long_about = "testboard reads the JSON report of a browser test run, writes a summary and \
    an HTML dashboard, and keeps a bounded, deduplicated history of runs rendered as a \
    second HTML page."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/testboard.toml` when that file exists, and to
    /// built-in defaults otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Summarize the test report and render the dashboard.
    ///
    /// A missing or unreadable report produces an `unknown` summary with
    /// zero counts; the dashboard is still written.
    Dashboard,

    /// Add the current summary to the history and render the history page.
    ///
    /// Re-running for a build already in the history leaves it unchanged.
    History,

    /// Run the dashboard and history stages in order.
    Run,

    /// Print the stored history.
    Stats,
}

fn run_dashboard(cfg: &config::Config) -> anyhow::Result<()> {
    let now = Utc::now();
    let env = EnvironmentMetadata::from_env(now);
    let out = pipeline::run_dashboard_stage(cfg, &env, now)?;

    println!("✅ Dashboard generated ({})", out.summary.status);
    println!("📊 Dashboard saved to: {}", out.dashboard_path.display());
    println!("📄 Summary saved to: {}", out.summary_path.display());
    Ok(())
}

fn run_history(cfg: &config::Config) -> anyhow::Result<()> {
    let store = pipeline::open_history_store(cfg);
    let out = pipeline::run_history_stage(cfg, &store)?;

    println!("✅ History dashboard generated!");
    println!("📊 History saved: last {} runs", out.log.len());
    println!("📄 File: {}", out.history_path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Dashboard => run_dashboard(&cfg)?,
        Commands::History => run_history(&cfg)?,
        Commands::Run => {
            run_dashboard(&cfg)?;
            run_history(&cfg)?;
        }
        Commands::Stats => stats::run_stats(&cfg)?,
    }

    Ok(())
}
