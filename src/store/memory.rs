//! In-memory [`HistoryStore`] implementation for testing and embedding.

use std::sync::RwLock;

use crate::history::HistoryLog;

use super::{HistoryError, HistoryStore};

/// In-memory store. Counts saves so callers can assert on write behavior.
pub struct InMemoryHistoryStore {
    log: RwLock<HistoryLog>,
    saves: RwLock<usize>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::with_log(HistoryLog::default())
    }

    pub fn with_log(log: HistoryLog) -> Self {
        Self {
            log: RwLock::new(log),
            saves: RwLock::new(0),
        }
    }

    pub fn snapshot(&self) -> HistoryLog {
        self.log.read().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap()
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn try_load(&self) -> Result<HistoryLog, HistoryError> {
        Ok(self.snapshot())
    }

    fn save(&self, log: &HistoryLog) -> Result<(), HistoryError> {
        *self.log.write().unwrap() = log.clone();
        *self.saves.write().unwrap() += 1;
        Ok(())
    }
}
