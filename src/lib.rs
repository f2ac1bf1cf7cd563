//! # testboard
//!
//! Test-run summaries, bounded run history, and static HTML dashboards for
//! CI pipelines.
//!
//! testboard sits behind a browser end-to-end test suite. It reads the JSON
//! report produced by the test runner, flattens it into a run summary,
//! folds that summary into a deduplicated, most-recent-first history, and
//! renders both as static pages ready to publish.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌───────────────────┐
//! │ Raw report  │──▶│   Extract    │──▶│ test-summary.json │
//! │ + CI env    │   │ (dashboard)  │   │ index.html        │
//! └─────────────┘   └──────────────┘   └─────────┬─────────┘
//!                                                │
//!                   ┌──────────────┐             ▼
//!                   │ HistoryStore │◀──▶┌──────────────────┐
//!                   │ history.json │    │    Aggregate     │──▶ history.html
//!                   └──────────────┘    │    (history)     │
//!                                       └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! testboard dashboard     # summarize the report, write index.html
//! testboard history       # append to history.json, write history.html
//! testboard run           # both stages
//! testboard stats         # print the stored history
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`environment`] | CI environment metadata |
//! | [`models`] | Run summaries and history entries |
//! | [`report`] | Raw report parsing and counting |
//! | [`extract`] | Summary extraction |
//! | [`history`] | Dedup, prepend, and retention |
//! | [`store`] | History storage backends |
//! | [`render`] | Dashboard and history pages |
//! | [`pipeline`] | The two pipeline stages |
//! | [`stats`] | Terminal history summary |

pub mod config;
pub mod environment;
pub mod extract;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod stats;
pub mod store;
