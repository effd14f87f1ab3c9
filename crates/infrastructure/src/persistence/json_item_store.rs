//! JSON backup file store
//!
//! Implements the `ItemStorePort` on top of a single JSON file. Writes go to
//! a temporary sibling that is then renamed over the backup, so a crash never
//! leaves a half-written file behind.

use std::path::{Path, PathBuf};

use application::{
    error::ApplicationError,
    ports::ItemStorePort,
    state::PlannerSnapshot,
};
use async_trait::async_trait;
use domain::{Course, PlannerItem, Term};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, info, instrument, warn};

use super::error::StoreError;

/// Backup file as read from disk, before each item is checked
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    items: Vec<serde_json::Value>,
    #[serde(default)]
    terms: Vec<serde_json::Value>,
    #[serde(default)]
    courses: Vec<serde_json::Value>,
    #[serde(default)]
    next_series_id: Option<u64>,
}

/// File-based planner store
#[derive(Debug, Clone)]
pub struct JsonFileItemStore {
    path: PathBuf,
}

impl JsonFileItemStore {
    /// Create a store for the backup file at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read the backup file, `None` if it does not exist
    async fn read(&self) -> Result<Option<PlannerSnapshot>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        decode_snapshot(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    async fn write(&self, snapshot: &PlannerSnapshot) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|e| StoreError::io(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

/// Decode a backup, skipping entries that do not decode
///
/// Only a file that is not a JSON object is an error.
pub fn decode_snapshot(bytes: &[u8]) -> Result<PlannerSnapshot, serde_json::Error> {
    let raw: RawSnapshot = serde_json::from_slice(bytes)?;

    let mut snapshot = PlannerSnapshot {
        items: decode_each::<PlannerItem>(raw.items, "planner item"),
        terms: decode_each::<Term>(raw.terms, "term"),
        courses: decode_each::<Course>(raw.courses, "course"),
        ..PlannerSnapshot::default()
    };
    if let Some(next) = raw.next_series_id {
        snapshot.next_series_id = next;
    }
    Ok(snapshot)
}

fn decode_each<T: DeserializeOwned>(values: Vec<serde_json::Value>, kind: &str) -> Vec<T> {
    let total = values.len();
    let decoded: Vec<T> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(kind, index, error = %e, "Skipping undecodable entry");
                None
            },
        })
        .collect();

    if decoded.len() < total {
        warn!(kind, skipped = total - decoded.len(), total, "Some entries were skipped");
    }
    decoded
}

#[async_trait]
impl ItemStorePort for JsonFileItemStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<PlannerSnapshot>, ApplicationError> {
        let snapshot = self.read().await?;
        match &snapshot {
            Some(s) => info!(
                items = s.items.len(),
                courses = s.courses.len(),
                "Loaded backup"
            ),
            None => debug!("No backup file yet"),
        }
        Ok(snapshot)
    }

    #[instrument(skip(self, snapshot), fields(path = %self.path.display(), items = snapshot.items.len()))]
    async fn save(&self, snapshot: &PlannerSnapshot) -> Result<(), ApplicationError> {
        self.write(snapshot).await?;
        debug!("Saved backup");
        Ok(())
    }
}
