//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod change_notifier_port;
mod item_store_port;

#[cfg(test)]
pub use change_notifier_port::MockChangeNotifierPort;
pub use change_notifier_port::ChangeNotifierPort;
#[cfg(test)]
pub use item_store_port::MockItemStorePort;
pub use item_store_port::ItemStorePort;
