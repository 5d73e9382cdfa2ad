//! Cancellable debounce timer.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Owns at most one pending timer.
///
/// [`schedule`](Self::schedule) aborts the pending timer before arming the
/// next, and both happen under `&mut self`, so two timers are never live at
/// once. Only the wait is cancellable: once the delay elapses the task is
/// handed to the runtime and runs to completion.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the quiet period unless rescheduled or cancelled first.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        }));
    }

    /// Abort the pending timer, if any. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
