use tokio::sync::mpsc::UnboundedSender;

/// Per-run tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub resolved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.resolved + self.skipped + self.failed
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files: {} resolved, {} skipped, {} failed",
            self.total, self.resolved, self.skipped, self.failed
        )
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(BatchSummary),
    Stopped(BatchSummary),
}

impl RunOutcome {
    pub fn summary(&self) -> BatchSummary {
        match self {
            RunOutcome::Completed(summary) | RunOutcome::Stopped(summary) => *summary,
        }
    }
}

/// Messages a run sends to its observer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Human-readable progress line
    Status(String),
    /// Always the last event of a run
    Finished(RunOutcome),
}

/// Receives progress events; must not block the worker
pub trait EventSink: Send + Sync {
    fn emit(&self, event: BatchEvent);

    fn status(&self, message: &str) {
        self.emit(BatchEvent::Status(message.to_string()));
    }
}

impl EventSink for UnboundedSender<BatchEvent> {
    fn emit(&self, event: BatchEvent) {
        // The observer may have gone away; the run carries on regardless
        let _ = self.send(event);
    }
}

/// Sink that writes status lines to the log, for one-off lookups
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: BatchEvent) {
        match event {
            BatchEvent::Status(message) => tracing::info!("{}", message),
            BatchEvent::Finished(outcome) => tracing::info!("Finished: {:?}", outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        tx.status("still running");
    }

    #[test]
    fn summary_counts_processed_tracks() {
        let summary = BatchSummary {
            total: 5,
            resolved: 2,
            skipped: 1,
            failed: 1,
        };
        assert_eq!(summary.processed(), 4);
        assert_eq!(RunOutcome::Stopped(summary).summary(), summary);
        assert_eq!(summary.to_string(), "5 files: 2 resolved, 1 skipped, 1 failed");
    }
}
