//! Recent-searches history
//!
//! Submitted query text lands here, newest first, deduplicated and capped.
//! The browse UI feeds it into the suggestion popup when the search box is
//! still empty, and `shelfr history` prints it.
//!
//! The file is versioned JSON under the user's data directory. Loading is
//! deliberately tolerant: a missing, corrupt or older-versioned file just
//! means an empty history, never a startup failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Bump when the on-disk layout changes; older files are discarded
const HISTORY_VERSION: u32 = 1;

/// Fallback cap when the config does not say otherwise
pub const DEFAULT_LIMIT: usize = 50;

pub type Result<T> = std::result::Result<T, HistoryError>;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write history: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One remembered search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    version: u32,
    entries: Vec<HistoryEntry>,
}

/// Recent searches, newest first
#[derive(Debug)]
pub struct SearchHistory {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl SearchHistory {
    /// Load from `path`, falling back to empty on any read problem
    #[must_use]
    pub fn load(path: impl Into<PathBuf>, limit: usize) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        let mut history = Self {
            path,
            entries,
            limit: limit.max(1),
        };
        history.entries.truncate(history.limit);
        history
    }

    /// Where history lives by default
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("shelfr").join("history.json"))
    }

    /// Remember a submitted query
    ///
    /// Blank text is ignored. An earlier entry for the same text (ignoring
    /// case) moves to the front with the new timestamp and casing.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let folded = query.to_lowercase();
        self.entries.retain(|entry| entry.query.to_lowercase() != folded);
        self.entries.insert(
            0,
            HistoryEntry {
                query: query.to_string(),
                at: Utc::now(),
            },
        );
        self.entries.truncate(self.limit);
    }

    /// All entries, newest first
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The newest `n` query strings, for the empty-prefix popup
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<&str> {
        self.entries
            .iter()
            .take(n)
            .map(|entry| entry.query.as_str())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Persist to disk, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Io`] when the file or its directory cannot
    /// be written.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = HistoryFile {
            version: HISTORY_VERSION,
            entries: self.entries.clone(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_entries(path: &Path) -> Vec<HistoryEntry> {
    let Ok(raw) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str::<HistoryFile>(&raw) {
        Ok(file) if file.version == HISTORY_VERSION => file.entries,
        _ => Vec::new(),
    }
}
