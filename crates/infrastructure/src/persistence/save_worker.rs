//! Debounced background saving
//!
//! A tokio task that waits for "data changed" signals, lets a burst of
//! changes settle, then writes one snapshot through the item store.

use std::{fmt, sync::Arc, time::Duration};

use application::{
    error::ApplicationError,
    ports::{ChangeNotifierPort, ItemStorePort},
    state::SharedPlannerState,
};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

/// Change notifier handed to the planner service
///
/// Never blocks: a signal that finds one already queued is dropped, since
/// the pending save will include its change.
#[derive(Debug, Clone)]
pub struct SaveNotifier {
    sender: mpsc::Sender<()>,
}

impl ChangeNotifierPort for SaveNotifier {
    fn data_changed(&self) {
        match self.sender.try_send(()) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {},
            Err(mpsc::error::TrySendError::Closed(())) => {
                warn!("Save worker has stopped, change will not be saved");
            },
        }
    }
}

/// Handle to the background save task
pub struct SaveWorker {
    notifier: SaveNotifier,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), ApplicationError>>,
}

impl fmt::Debug for SaveWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveWorker")
            .field("running", &!self.handle.is_finished())
            .finish_non_exhaustive()
    }
}

impl SaveWorker {
    /// Start the worker on the current tokio runtime
    pub fn spawn(
        store: Arc<dyn ItemStorePort>,
        state: SharedPlannerState,
        debounce: Duration,
    ) -> Self {
        let (sender, changes) = mpsc::channel(1);
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run(store, state, changes, shutdown_rx, debounce));
        info!(debounce_ms = debounce.as_millis(), "Save worker started");

        Self {
            notifier: SaveNotifier { sender },
            shutdown: Some(shutdown),
            handle,
        }
    }

    /// Notifier that schedules a save on this worker
    pub fn notifier(&self) -> Arc<dyn ChangeNotifierPort> {
        Arc::new(self.notifier.clone())
    }

    /// Stop the worker, writing any change that is still pending
    ///
    /// # Errors
    ///
    /// Returns the error of the final save, or an internal error if the task
    /// panicked.
    pub async fn shutdown(mut self) -> Result<(), ApplicationError> {
        if let Some(shutdown) = self.shutdown.take() {
            // The task may already have exited on its own
            let _ = shutdown.send(());
        }
        let result = (&mut self.handle)
            .await
            .map_err(|e| ApplicationError::Internal(format!("Save worker failed: {e}")))?;
        info!("Save worker stopped");
        result
    }
}

async fn run(
    store: Arc<dyn ItemStorePort>,
    state: SharedPlannerState,
    mut changes: mpsc::Receiver<()>,
    mut shutdown: oneshot::Receiver<()>,
    debounce: Duration,
) -> Result<(), ApplicationError> {
    loop {
        tokio::select! {
            signal = changes.recv() => {
                if signal.is_none() {
                    return Ok(());
                }
                tokio::select! {
                    () = tokio::time::sleep(debounce) => {},
                    _ = &mut shutdown => return save_now(store.as_ref(), &state).await,
                }
                while changes.try_recv().is_ok() {}
                if let Err(e) = save_now(store.as_ref(), &state).await {
                    warn!(
                        error = %e,
                        retryable = e.is_retryable(),
                        "Background save failed"
                    );
                }
            }
            _ = &mut shutdown => {
                if changes.try_recv().is_ok() {
                    return save_now(store.as_ref(), &state).await;
                }
                return Ok(());
            }
        }
    }
}

async fn save_now(
    store: &dyn ItemStorePort,
    state: &SharedPlannerState,
) -> Result<(), ApplicationError> {
    let snapshot = state.lock().snapshot();
    debug!(items = snapshot.items.len(), "Saving planner");
    store.save(&snapshot).await
}
