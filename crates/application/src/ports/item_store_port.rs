//! Item store port
//!
//! Defines where the planner snapshot is loaded from and saved to.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{error::ApplicationError, state::PlannerSnapshot};

/// Port for persisting the planner
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ItemStorePort: Send + Sync {
    /// Load the last saved snapshot, or `None` if nothing was saved yet
    async fn load(&self) -> Result<Option<PlannerSnapshot>, ApplicationError>;

    /// Replace the saved snapshot
    async fn save(&self, snapshot: &PlannerSnapshot) -> Result<(), ApplicationError>;
}
