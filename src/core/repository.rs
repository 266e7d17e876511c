//! History persistence
//!
//! The history store is held in memory by the engine and flushed through a
//! [`HistoryRepository`]. The file-backed implementation keeps one pretty
//! printed JSON document per profile under the platform data directory.

use crate::core::history::HistoryStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage backend for a profile's grade history.
pub trait HistoryRepository {
    /// Load the stored history, or `None` when nothing was saved yet.
    ///
    /// # Errors
    /// Returns an error message when the backing store exists but cannot be
    /// read or parsed.
    fn load(&self) -> Result<Option<HistoryStore>, String>;

    /// Persist the full store, replacing any previous contents.
    ///
    /// # Errors
    /// Returns an error message when the store cannot be written.
    fn save(&self, store: &HistoryStore) -> Result<(), String>;

    /// Delete the persisted history entirely.
    ///
    /// # Errors
    /// Returns an error message when the backing store exists but cannot be
    /// removed.
    fn clear(&self) -> Result<(), String>;
}

/// JSON-file-backed history storage.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Use an explicit file path (tests, `history_dir` config override).
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default per-profile location:
    /// - Linux: `~/.local/share/gradelens/<profile>-history.json`
    /// - macOS: `~/Library/Application Support/gradelens/<profile>-history.json`
    /// - Windows: `%APPDATA%\gradelens\<profile>-history.json`
    #[must_use]
    pub fn for_profile(profile: &str) -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradelens");
        Self::new(dir.join(format!("{profile}-history.json")))
    }

    /// The file this repository reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<HistoryStore>, String> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {}: {e}", self.path.display()))?;
        let store = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse {}: {e}", self.path.display()))?;
        Ok(Some(store))
    }

    fn save(&self, store: &HistoryStore) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(store)
            .map_err(|e| format!("Failed to serialize history: {e}"))?;
        fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write {}: {e}", self.path.display()))
    }

    fn clear(&self) -> Result<(), String> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| format!("Failed to remove {}: {e}", self.path.display()))?;
        }
        Ok(())
    }
}
