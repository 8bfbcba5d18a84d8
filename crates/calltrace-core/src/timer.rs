//! One-shot cancellable timer used for debounced flushes

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle to a scheduled callback.
///
/// Cancelling aborts the sleeping task; a callback that already started
/// runs to completion, so callers still guard their own state.
#[derive(Debug)]
pub struct DebounceHandle {
    task: JoinHandle<()>,
}

impl DebounceHandle {
    /// Run `f` once after `delay` on the current tokio runtime.
    ///
    /// Returns `None` outside a runtime.
    pub fn schedule<F, Fut>(delay: Duration, f: F) -> Option<Self>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::runtime::Handle::try_current().ok()?;
        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            f().await;
        });
        Some(Self { task })
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
