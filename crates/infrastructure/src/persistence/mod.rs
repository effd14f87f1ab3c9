//! Persistence module
//!
//! JSON backup file storage for the planner and the debounced worker that
//! keeps it up to date.

pub mod error;
pub mod json_item_store;
pub mod save_worker;

pub use error::StoreError;
pub use json_item_store::{JsonFileItemStore, decode_snapshot};
pub use save_worker::{SaveNotifier, SaveWorker};
