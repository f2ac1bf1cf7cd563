use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "./config/testboard.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// Raw JSON report written by the test runner.
    #[serde(default = "default_report_path")]
    pub report: PathBuf,
    /// Directory receiving every generated document.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            report: default_report_path(),
            public_dir: default_public_dir(),
        }
    }
}

fn default_report_path() -> PathBuf {
    PathBuf::from("playwright-report/index.json")
}
fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_retention")]
    pub retention: usize,
    #[serde(default)]
    pub revision_check: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention: default_retention(),
            revision_check: false,
        }
    }
}

fn default_retention() -> usize {
    crate::history::DEFAULT_RETENTION
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_history_date_format")]
    pub history_date_format: String,
    #[serde(default = "default_report_link")]
    pub report_link: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            date_format: default_date_format(),
            history_date_format: default_history_date_format(),
            report_link: default_report_link(),
        }
    }
}

fn default_lang() -> String {
    "pt-BR".to_string()
}
fn default_date_format() -> String {
    "%d/%m/%Y, %H:%M:%S".to_string()
}
fn default_history_date_format() -> String {
    "%d/%m/%Y, %H:%M".to_string()
}
fn default_report_link() -> String {
    "./report/index.html".to_string()
}

impl PathsConfig {
    pub fn dashboard_html(&self) -> PathBuf {
        self.public_dir.join("index.html")
    }

    pub fn summary_json(&self) -> PathBuf {
        self.public_dir.join("test-summary.json")
    }

    pub fn history_html(&self) -> PathBuf {
        self.public_dir.join("history.html")
    }

    pub fn history_json(&self) -> PathBuf {
        self.public_dir.join("history.json")
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Resolve the configuration for a CLI invocation.
///
/// An explicitly requested file must exist. Without one, the default path is
/// used when present and built-in defaults otherwise, so every stage runs
/// with zero flags.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_config(default_path)
            } else {
                tracing::debug!("no config file found, using defaults");
                Ok(Config::default())
            }
        }
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.history.retention == 0 {
        anyhow::bail!("history.retention must be >= 1");
    }

    if config.render.date_format.trim().is_empty() {
        anyhow::bail!("render.date_format must not be empty");
    }

    if config.render.history_date_format.trim().is_empty() {
        anyhow::bail!("render.history_date_format must not be empty");
    }

    if config.paths.public_dir.as_os_str().is_empty() {
        anyhow::bail!("paths.public_dir must not be empty");
    }

    Ok(())
}
