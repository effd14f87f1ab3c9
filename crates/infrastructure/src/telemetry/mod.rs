//! Logging infrastructure
//!
//! Sets up the global `tracing` subscriber from [`LoggingConfig`](crate::config::LoggingConfig).

mod logging;

pub use logging::{LoggingError, build_env_filter, init_logging};
