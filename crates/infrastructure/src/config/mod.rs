//! Planner configuration
//!
//! Split into focused sub-modules:
//! - `calendar`: month grid layout and filtering
//! - `storage`: backup file location and save debounce
//! - `logging`: log filter and output format
//!
//! Values are layered: built-in defaults, then an optional `planner.toml`,
//! then `PLANNER_*` environment variables (e.g. `PLANNER_STORAGE__BACKUP_PATH`).

mod calendar;
mod logging;
mod storage;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use calendar::CalendarConfig;
pub use logging::LoggingConfig;
pub use storage::StorageConfig;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "planner";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PLANNER";

/// Main planner configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Month view configuration
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Backup file configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PlannerConfig {
    /// Load configuration from `planner.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source exists but cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file instead of `planner.toml`
    ///
    /// An explicit file must exist; the default one is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or a source cannot be parsed.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("calendar.week_starts_on", "sunday")?
            .set_default("storage.backup_path", "planner-backup.json")?
            .set_default("storage.save_debounce_ms", 500)?
            .set_default("logging.log_filter", "info")?
            // Load from file if exists
            .add_source(file)
            // Override with environment variables (e.g., PLANNER_CALENDAR__HIDE_COMPLETED)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(?config, "Loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use domain::{ViewFilter, WeekStart};

    use super::*;

    #[test]
    fn defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.calendar.week_starts_on, WeekStart::Sunday);
        assert_eq!(config.calendar.filter, ViewFilter::All);
        assert!(!config.calendar.hide_completed);
        assert_eq!(
            config.storage.backup_path,
            std::path::PathBuf::from("planner-backup.json")
        );
        assert_eq!(config.storage.save_debounce_ms, 500);
        assert_eq!(config.logging.log_filter, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: PlannerConfig = toml::from_str(
            r#"
            [calendar]
            week_starts_on = "monday"
            filter = "events_only"
            "#,
        )
        .unwrap();
        assert_eq!(config.calendar.week_starts_on, WeekStart::Monday);
        assert_eq!(config.calendar.filter, ViewFilter::EventsOnly);
        assert_eq!(config.storage.save_debounce_ms, 500);
    }

    #[test]
    fn grid_filter_follows_calendar_section() {
        let calendar = CalendarConfig {
            filter: ViewFilter::AssignmentsOnly,
            hide_completed: true,
            ..CalendarConfig::default()
        };
        let filter = calendar.grid_filter();
        assert_eq!(filter.kinds, ViewFilter::AssignmentsOnly);
        assert!(filter.hide_completed);
    }

    #[test]
    fn load_from_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[storage]\nbackup_path = \"/tmp/term.json\"\nsave_debounce_ms = 50\n\n[logging]\njson = true"
        )
        .unwrap();

        let config = PlannerConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(
            config.storage.backup_path,
            std::path::PathBuf::from("/tmp/term.json")
        );
        assert_eq!(config.storage.save_debounce_ms, 50);
        assert!(config.logging.json);
        assert_eq!(config.calendar.week_starts_on, WeekStart::Sunday);
    }

    #[test]
    fn load_from_missing_file_fails() {
        let result = PlannerConfig::load_from(Some(Path::new("/nonexistent/planner.toml")));
        assert!(result.is_err());
    }
}
