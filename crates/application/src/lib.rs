//! Application layer - Use cases and orchestration
//!
//! Owns the planner state, executes planner commands against it and defines
//! the ports through which it is persisted. Orchestrates domain objects and
//! infrastructure adapters.

pub mod date_parser;
pub mod error;
pub mod ports;
pub mod services;
pub mod state;

pub use date_parser::{parse_date, parse_time};
pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
pub use state::{PlannerSnapshot, PlannerState, SharedPlannerState};
