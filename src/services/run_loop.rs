//! Run Loop
//!
//! Repeats sync cycles on a fixed interval until shutdown. A second cycle
//! never starts before the previous one has fully drained.

use std::fmt;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::sync_orchestrator::SyncOrchestrator;
use crate::domain::errors::CycleError;

/// Lifecycle state of the run loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Sleeping until the next poll
    Idle,
    /// A cycle is in progress
    Syncing,
    /// Terminal: the loop is about to return
    ShuttingDown,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Syncing => "syncing",
            Self::ShuttingDown => "shutting_down",
        };
        f.write_str(s)
    }
}

/// Totals reported when the loop stops gracefully
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles that ran to completion, including ones whose listing failed
    pub cycles: u64,
    /// Cycles whose listing failed
    pub failed_cycles: u64,
}

/// Drives the orchestrator until cancellation or a fatal cycle error
pub struct RunLoop {
    orchestrator: SyncOrchestrator,
    poll_interval: Duration,
    cancel: CancellationToken,
    state: watch::Sender<RunState>,
}

impl RunLoop {
    /// Create a loop polling every `poll_interval`
    pub fn new(
        orchestrator: SyncOrchestrator,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let (state, _) = watch::channel(RunState::Idle);
        Self {
            orchestrator,
            poll_interval,
            cancel,
            state,
        }
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    fn transition(&self, next: RunState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            info!(from = %previous, to = %next, "Run loop state changed");
        }
    }

    /// Run until shutdown.
    ///
    /// Returns `Ok` once cancellation is observed (after the in-flight
    /// cycle drained) and `Err` on a fatal cycle error.
    pub async fn run(self) -> Result<RunSummary, CycleError> {
        let mut summary = RunSummary::default();

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            self.transition(RunState::Syncing);
            match self.orchestrator.run_cycle(&self.cancel).await {
                Ok(_) => {
                    summary.cycles += 1;
                    info!("Syncing repos finished");
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Error during sync");
                    self.transition(RunState::ShuttingDown);
                    return Err(e);
                }
                Err(e) => {
                    summary.cycles += 1;
                    summary.failed_cycles += 1;
                    error!(error = %e, "Sync cycle failed; retrying at next poll");
                }
            }

            if self.cancel.is_cancelled() {
                break;
            }

            self.transition(RunState::Idle);
            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        self.transition(RunState::ShuttingDown);
        info!(cycles = summary.cycles, "Service stopped");
        Ok(summary)
    }
}
