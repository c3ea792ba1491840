//! Cancellable delayed tasks.
//!
//! A [`Debouncer`] holds at most one scheduled task. Scheduling again aborts
//! the previous task and restarts the quiet period.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Handle to a task that sleeps, then runs its payload
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Spawn `task` to run after `delay`. Requires a tokio runtime.
    pub fn spawn<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Runs the most recently scheduled task once `delay` passes without a newer one
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<ScheduledTask>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending task with `task`
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.cancel() {
            tracing::trace!("superseded pending task");
        }
        self.pending = Some(ScheduledTask::spawn(self.delay, task));
    }

    /// Abort the pending task. Returns true if one was still outstanding.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(task) => {
                let outstanding = !task.is_finished();
                task.cancel();
                outstanding
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|t| !t.is_finished())
    }
}
