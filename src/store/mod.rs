//! Storage abstraction for the history log.
//!
//! The [`HistoryStore`] trait is the only way the aggregator reaches
//! durable storage. [`FileHistoryStore`] persists the log as a JSON array
//! on disk; [`InMemoryHistoryStore`] keeps it in memory for tests and
//! embedding.
//!
//! # Concurrency
//!
//! Stores do not lock. Two aggregators writing the same file race and the
//! last writer wins. [`FileHistoryStore::with_revision_check`] turns that
//! silent lost update into a [`HistoryError::Conflict`] on save.

pub mod file;
pub mod memory;

use thiserror::Error;

use crate::history::HistoryLog;

pub use file::FileHistoryStore;
pub use memory::InMemoryHistoryStore;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("history file {path} is not a valid log: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("history file {path} changed since it was loaded (expected revision {expected}, found {found})")]
    Conflict {
        path: String,
        expected: String,
        found: String,
    },
}

/// Durable home of the history log.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`try_load`](HistoryStore::try_load) | Read the log, reporting why it could not be read |
/// | [`load`](HistoryStore::load) | Read the log, treating any failure as an empty log |
/// | [`save`](HistoryStore::save) | Overwrite the stored log in full |
pub trait HistoryStore: Send + Sync {
    /// Read the stored log. A store that holds nothing yet returns an empty log.
    fn try_load(&self) -> Result<HistoryLog, HistoryError>;

    /// Replace the stored log with `log`.
    fn save(&self, log: &HistoryLog) -> Result<(), HistoryError>;

    /// Read the stored log, absorbing read failures as an empty log.
    fn load(&self) -> HistoryLog {
        match self.try_load() {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(error = %e, "history unreadable, starting from an empty log");
                HistoryLog::default()
            }
        }
    }
}
