//! Application-level errors

use domain::{DomainError, ItemId};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Item is not in the planner
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// The operation does not apply to this kind of item
    #[error("Wrong item kind: {0}")]
    WrongItemKind(String),

    /// Loading or saving the planner failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
