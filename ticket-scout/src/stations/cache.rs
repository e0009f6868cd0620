//! Disk snapshot of the station list.
//!
//! The station list is one bulk download that changes a few times a
//! year, so each fetch is written to disk and reused until it ages out.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::StationDto;
use super::error::StationError;

/// Snapshots are reused for a week.
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// On-disk form: the raw wire records plus the instant they were fetched.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    /// RFC 3339 timestamp of the fetch that produced this snapshot.
    fetched_at: String,
    stations: Vec<StationDto>,
}

/// Disk snapshot of previously fetched station records.
///
/// `load` answers `None` for a missing, unreadable, or aged-out
/// snapshot; the caller then refetches and writes a new one with `save`.
#[derive(Debug, Clone)]
pub struct StationCache {
    path: PathBuf,
    max_age: Duration,
}

impl Default for StationCache {
    /// Snapshot file in the working directory, kept for a week.
    fn default() -> Self {
        Self::new("stations_cache.json")
    }
}

impl StationCache {
    /// Snapshot at `path` with the default week-long lifetime.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// Override how long a snapshot stays usable.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// The snapshot contents, if present and younger than `max_age`.
    pub fn load(&self) -> Option<Vec<StationDto>> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let snapshot: Snapshot = serde_json::from_str(&raw).ok()?;
        let fetched_at = DateTime::parse_from_rfc3339(&snapshot.fetched_at).ok()?;

        let age = Utc::now().signed_duration_since(fetched_at);
        if age >= chrono::Duration::from_std(self.max_age).ok()? {
            return None;
        }
        Some(snapshot.stations)
    }

    /// Write a fresh snapshot, creating missing parent directories.
    pub fn save(&self, stations: &[StationDto]) -> Result<(), StationError> {
        let body = serde_json::to_string(&Snapshot {
            fetched_at: Utc::now().to_rfc3339(),
            stations: stations.to_vec(),
        })
        .map_err(|e| StationError::Snapshot(format!("encode: {e}")))?;

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .map_err(|e| StationError::Snapshot(format!("create {}: {e}", dir.display())))?;
        }

        std::fs::write(&self.path, body)
            .map_err(|e| StationError::Snapshot(format!("write {}: {e}", self.path.display())))?;
        Ok(())
    }
}
