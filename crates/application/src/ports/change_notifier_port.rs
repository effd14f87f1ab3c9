//! Change notifier port
//!
//! Signals that the planner changed and should eventually be saved.

#[cfg(test)]
use mockall::automock;

/// Port notified after every successful mutation
#[cfg_attr(test, automock)]
pub trait ChangeNotifierPort: Send + Sync {
    /// Record that the item collection changed
    ///
    /// Must not block; implementations coalesce bursts of calls.
    fn data_changed(&self);
}

