//! Persistence of run artifacts.
//!
//! Four files are maintained: the dated history file and rolling snapshot
//! under the data directory, and the "latest" pointer plus date index under
//! the docs directory. Everything is pretty-printed UTF-8 JSON with
//! non-ASCII characters preserved literally. All files are overwritten
//! wholesale each run; only the date index has append-like semantics.
//! Concurrent runs against the same directories are unsupported.

use crate::snapshot::{DiscoveryRecord, Snapshot};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Rolling full-state snapshot, input to the next run's diff.
const SNAPSHOT_FILE: &str = "latest_snapshot.json";

/// Most recent run's discoveries, consumed by the viewer.
const LATEST_FILE: &str = "latest.json";

/// Dates for which a history file exists.
const DATES_FILE: &str = "dates.json";

/// Errors raised while reading or writing run artifacts.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file or create a directory.
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize JSON.
    #[error("Failed to process JSON for '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and writes the run artifacts under a data and a docs directory.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
    docs_dir: PathBuf,
}

impl Store {
    /// Creates a store over the two output directories. Nothing is touched
    /// on disk until a load or persist call.
    #[must_use]
    pub fn new(data_dir: PathBuf, docs_dir: PathBuf) -> Self {
        Self { data_dir, docs_dir }
    }

    /// Loads the previous run's snapshot, or an empty one if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_previous_snapshot(&self) -> Result<Snapshot, StoreError> {
        read_json_or_default(&self.data_dir.join(SNAPSHOT_FILE))
    }

    /// Writes all artifacts for a completed run.
    ///
    /// In order: the dated history file (overwriting an earlier same-day
    /// run's file), the rolling snapshot, the "latest" pointer, and the date
    /// index (date appended unless present, then re-sorted descending). The
    /// history and latest files are written even when `discoveries` is
    /// empty. Output directories are created if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on the first failed write; earlier writes are
    /// not rolled back.
    pub fn persist_run(
        &self,
        current: &Snapshot,
        discoveries: &[DiscoveryRecord],
        date: &str,
    ) -> Result<(), StoreError> {
        create_dir(&self.data_dir)?;
        create_dir(&self.docs_dir)?;

        let history_path = self.data_dir.join(format!("{date}.json"));
        write_json(&history_path, &discoveries)?;
        write_json(&self.data_dir.join(SNAPSHOT_FILE), current)?;
        write_json(&self.docs_dir.join(LATEST_FILE), &discoveries)?;

        let dates_path = self.docs_dir.join(DATES_FILE);
        let mut index: DateIndex = read_json_or_default(&dates_path)?;
        index.record(date);
        write_json(&dates_path, &index)?;

        info!(
            history = %history_path.display(),
            discoveries = discoveries.len(),
            snapshot_size = current.len(),
            "Persisted run artifacts"
        );
        Ok(())
    }
}

/// Descending-sorted, deduplicated list of dates with a history file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateIndex {
    dates: Vec<String>,
}

impl DateIndex {
    /// Adds a date unless it is already present, keeping the list sorted
    /// newest-first. Returns whether the date was inserted.
    pub fn record(&mut self, date: &str) -> bool {
        if self.dates.iter().any(|existing| existing == date) {
            return false;
        }
        self.dates.push(date.to_string());
        // ISO dates sort lexicographically, newest last; reverse for display.
        self.dates.sort_unstable_by(|a, b| b.cmp(a));
        true
    }

    /// The indexed dates, newest first.
    #[must_use]
    pub fn dates(&self) -> &[String] {
        &self.dates
    }
}

fn create_dir(path: &Path) -> Result<(), StoreError> {
    std::fs::create_dir_all(path).map_err(|e| StoreError::WriteError {
        path: path.display().to_string(),
        source: e,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let body = serde_json::to_string_pretty(value).map_err(|e| StoreError::JsonError {
        path: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, body).map_err(|e| StoreError::WriteError {
        path: path.display().to_string(),
        source: e,
    })
}

fn read_json_or_default<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let body = std::fs::read_to_string(path).map_err(|e| StoreError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&body).map_err(|e| StoreError::JsonError {
        path: path.display().to_string(),
        source: e,
    })
}
