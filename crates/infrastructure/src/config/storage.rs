//! Backup file configuration.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Where the planner is saved and how often
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON backup file
    #[serde(default = "default_backup_path")]
    pub backup_path: PathBuf,

    /// Quiet period before a burst of changes is written (default: 500ms)
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
}

fn default_backup_path() -> PathBuf {
    PathBuf::from("planner-backup.json")
}

const fn default_save_debounce_ms() -> u64 {
    500
}

impl StorageConfig {
    #[must_use]
    pub const fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backup_path: default_backup_path(),
            save_debounce_ms: default_save_debounce_ms(),
        }
    }
}
