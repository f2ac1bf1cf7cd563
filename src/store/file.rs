//! JSON-file [`HistoryStore`].
//!
//! The log lives in a single pretty-printed JSON array. Saves write a
//! sibling temp file and rename it over the target, so a failed write never
//! leaves half a document behind.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::history::HistoryLog;

use super::{HistoryError, HistoryStore};

/// Content identity of the history file as last seen by this store.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Revision {
    Absent,
    Digest(String),
}

impl Revision {
    fn of(bytes: &[u8]) -> Self {
        Revision::Digest(hex::encode(Sha256::digest(bytes)))
    }

    fn label(&self) -> String {
        match self {
            Revision::Absent => "absent".to_string(),
            Revision::Digest(d) => d[..12.min(d.len())].to_string(),
        }
    }
}

pub struct FileHistoryStore {
    path: PathBuf,
    revision_check: bool,
    seen: RwLock<Option<Revision>>,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            revision_check: false,
            seen: RwLock::new(None),
        }
    }

    /// Refuse to save when the file changed after this store loaded it.
    pub fn with_revision_check(mut self, enabled: bool) -> Self {
        self.revision_check = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn read_bytes(&self) -> Result<Option<Vec<u8>>, HistoryError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_err(e)),
        }
    }

    fn current_revision(&self) -> Result<Revision, HistoryError> {
        Ok(match self.read_bytes()? {
            Some(bytes) => Revision::of(&bytes),
            None => Revision::Absent,
        })
    }

    fn check_revision(&self) -> Result<(), HistoryError> {
        let expected = match self.seen.read().unwrap().clone() {
            Some(rev) => rev,
            None => return Ok(()),
        };
        let found = self.current_revision()?;
        if found != expected {
            return Err(HistoryError::Conflict {
                path: self.path.display().to_string(),
                expected: expected.label(),
                found: found.label(),
            });
        }
        Ok(())
    }

    fn write_atomic(&self, content: &[u8]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content).map_err(|e| self.io_err(e))?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(self.io_err(e));
        }
        Ok(())
    }
}

impl HistoryStore for FileHistoryStore {
    fn try_load(&self) -> Result<HistoryLog, HistoryError> {
        let bytes = match self.read_bytes()? {
            Some(bytes) => bytes,
            None => {
                *self.seen.write().unwrap() = Some(Revision::Absent);
                return Ok(HistoryLog::default());
            }
        };
        *self.seen.write().unwrap() = Some(Revision::of(&bytes));

        serde_json::from_slice(&bytes).map_err(|source| HistoryError::Json {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn save(&self, log: &HistoryLog) -> Result<(), HistoryError> {
        if self.revision_check {
            self.check_revision()?;
        }

        let json = serde_json::to_vec_pretty(log).map_err(|source| HistoryError::Json {
            path: self.path.display().to_string(),
            source,
        })?;
        self.write_atomic(&json)?;

        *self.seen.write().unwrap() = Some(Revision::of(&json));
        tracing::debug!(path = %self.path.display(), entries = log.len(), "history saved");
        Ok(())
    }
}
