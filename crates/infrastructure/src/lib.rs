//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the JSON backup store,
//! the debounced save worker, configuration loading and logging setup.

pub mod config;
pub mod persistence;
pub mod telemetry;

pub use config::{CalendarConfig, LoggingConfig, PlannerConfig, StorageConfig};
pub use persistence::{JsonFileItemStore, SaveNotifier, SaveWorker, StoreError};
pub use telemetry::{LoggingError, init_logging};
