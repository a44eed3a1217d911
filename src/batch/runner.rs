use super::controller::{BatchController, BatchRun};
use super::events::{BatchEvent, RunOutcome};
use crate::errors::{LyricsFinderError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Starts batch runs on a dedicated task, at most one at a time
#[derive(Default)]
pub struct BatchRunner {
    active: Arc<AtomicBool>,
}

/// Clears the runner's active flag when the run's task ends, however it ends
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BatchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Spawn `run` on its own task. A second start while one is active is
    /// rejected with `BatchAlreadyRunning`, not queued.
    pub fn start(&self, controller: Arc<BatchController>, run: BatchRun) -> Result<BatchHandle> {
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LyricsFinderError::BatchAlreadyRunning);
        }
        let guard = ActiveGuard(self.active.clone());

        let (sender, events) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let join = tokio::spawn(async move {
            let _guard = guard;
            controller.run(&run, &task_cancel, &sender).await
        });

        Ok(BatchHandle {
            cancel,
            events,
            join,
        })
    }
}

/// Control and observation side of a running batch
pub struct BatchHandle {
    cancel: CancellationToken,
    events: UnboundedReceiver<BatchEvent>,
    join: JoinHandle<RunOutcome>,
}

impl BatchHandle {
    /// Request a cooperative stop; the current track still completes
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// A token that stops this run when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Next event in emission order; `None` once the run has ended and
    /// every event has been drained
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Wait for the run's task and return its terminal state
    pub async fn wait(self) -> Result<RunOutcome> {
        self.join
            .await
            .map_err(|e| LyricsFinderError::Unknown(format!("Batch task failed: {}", e)))
    }
}
