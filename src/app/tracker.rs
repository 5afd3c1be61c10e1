//! Sync state tracking and manifest persistence
//!
//! The tracker is the record of every dataset that has ever been downloaded
//! successfully: its title, the remote `modified` string at download time,
//! when the download finished, and the table dimensions. It is loaded from
//! the manifest file at startup, consulted by every fetch task to decide
//! whether a re-download is needed, and written back wholesale at the end of
//! the run.
//!
//! All mutation goes through `&self` methods over a `tokio::sync::RwLock`,
//! so concurrent fetch workers never touch the map directly and no recorded
//! entry can be lost to a racing write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::constants::files;
use crate::errors::{TrackerError, TrackerResult};

/// Persisted record of one successful dataset download
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingEntry {
    /// Dataset title at download time
    pub title: String,

    /// Remote `modified` string at download time; compared byte-for-byte
    /// against the catalog on subsequent runs
    pub modified_date: Option<String>,

    /// Wall-clock completion time of the download (RFC 3339)
    pub downloaded_at: DateTime<Utc>,

    /// Data rows written (header excluded)
    pub rows: usize,

    /// Columns written
    pub columns: usize,
}

/// In-memory sync state, backed by a JSON manifest file
#[derive(Debug)]
pub struct SyncTracker {
    /// Manifest file path
    path: PathBuf,
    /// Entries keyed by dataset identifier
    entries: RwLock<HashMap<String, TrackingEntry>>,
}

impl SyncTracker {
    /// Load sync state from the manifest file.
    ///
    /// A missing file starts the tracker empty. A file that exists but does
    /// not parse is fatal ([`TrackerError::Corrupted`]): the manifest is the
    /// only record of sync state, and silently discarding it would
    /// re-download every dataset while masking the corruption.
    pub async fn load(path: impl Into<PathBuf>) -> TrackerResult<Self> {
        let path = path.into();

        let entries = match fs::read_to_string(&path).await {
            Ok(contents) => {
                let entries: HashMap<String, TrackingEntry> = serde_json::from_str(&contents)
                    .map_err(|source| TrackerError::Corrupted {
                        path: path.clone(),
                        source,
                    })?;
                info!(
                    "Loaded {} tracking entries from {}",
                    entries.len(),
                    path.display()
                );
                entries
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No tracking manifest at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(source) => {
                return Err(TrackerError::Io {
                    path: path.clone(),
                    source,
                });
            }
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Whether the dataset is already up to date.
    ///
    /// True iff an entry exists for `identifier` and its stored
    /// `modified_date` equals `remote_modified` exactly. String equality
    /// only; no date semantics.
    pub async fn should_skip(&self, identifier: &str, remote_modified: Option<&str>) -> bool {
        let entries = self.entries.read().await;
        entries
            .get(identifier)
            .map(|entry| entry.modified_date.as_deref() == remote_modified)
            .unwrap_or(false)
    }

    /// Insert or overwrite the entry for a dataset.
    pub async fn record(&self, identifier: impl Into<String>, entry: TrackingEntry) {
        let mut entries = self.entries.write().await;
        entries.insert(identifier.into(), entry);
    }

    /// Number of tracked datasets.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the tracker has no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Snapshot of all entries, sorted by identifier.
    pub async fn entries(&self) -> Vec<(String, TrackingEntry)> {
        let entries = self.entries.read().await;
        let mut snapshot: Vec<_> = entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));
        snapshot
    }

    /// Manifest file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full current state to the manifest file.
    ///
    /// Serialized as pretty JSON to a temp file next to the manifest, then
    /// renamed into place, so a crash mid-write cannot leave a truncated
    /// manifest behind. Failure is surfaced to the caller; it is the only
    /// record of sync state.
    pub async fn persist(&self) -> TrackerResult<()> {
        let entries = self.entries.read().await;
        let json = serde_json::to_string_pretty(&*entries)?;
        drop(entries);

        let temp_path = temp_sibling(&self.path);
        fs::write(&temp_path, json.as_bytes())
            .await
            .map_err(|source| TrackerError::Io {
                path: temp_path.clone(),
                source,
            })?;

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|source| TrackerError::Io {
                path: self.path.clone(),
                source,
            })?;

        debug!("Persisted tracking manifest to {}", self.path.display());
        Ok(())
    }
}

/// Temp-file path next to the target, so the final rename stays on one
/// filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(files::TEMP_FILE_SUFFIX);
    path.with_file_name(name)
}
