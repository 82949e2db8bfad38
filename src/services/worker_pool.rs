//! Bounded worker pool for sync tasks.
//!
//! A fixed number of workers share one bounded queue. Each worker pulls a
//! task, waits for its own rate-limiter tick, runs the updater and records
//! the outcome. Task failures are logged and counted, never propagated.
//!
//! Workers exit only once the queue is closed and drained. Cancellation
//! stops the producer, which then closes the queue; a task that made it
//! into the queue is always processed, and an update that has started
//! always runs to completion.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::outstanding::InFlight;
use super::rate_limiter::WorkerRateLimiter;
use crate::domain::errors::UpdateError;
use crate::domain::models::{CycleReport, RepositoryDescriptor, SyncSettings, UpdateOutcome};
use crate::domain::ports::RepoUpdater;

/// A repository paired with its mirror path, consumed by exactly one worker
#[derive(Debug)]
pub struct SyncTask {
    /// Repository to sync
    pub descriptor: RepositoryDescriptor,
    /// Resolved mirror directory
    pub path: PathBuf,
    _in_flight: InFlight,
}

impl SyncTask {
    /// Create a task; `in_flight` is released when the task is dropped
    pub fn new(descriptor: RepositoryDescriptor, path: PathBuf, in_flight: InFlight) -> Self {
        Self {
            descriptor,
            path,
            _in_flight: in_flight,
        }
    }
}

/// Per-outcome counters shared by the workers of one cycle
#[derive(Debug, Default)]
pub struct CycleTally {
    cloned: AtomicUsize,
    up_to_date: AtomicUsize,
    fast_forwarded: AtomicUsize,
    diverged: AtomicUsize,
    failed: AtomicUsize,
}

impl CycleTally {
    /// Count one finished task
    pub fn record(&self, result: &Result<UpdateOutcome, UpdateError>) {
        let counter = match result {
            Ok(UpdateOutcome::Cloned) => &self.cloned,
            Ok(UpdateOutcome::UpToDate) => &self.up_to_date,
            Ok(UpdateOutcome::FastForwarded) => &self.fast_forwarded,
            Ok(UpdateOutcome::Diverged) => &self.diverged,
            Err(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the counters into `report`
    pub fn fill(&self, report: &mut CycleReport) {
        report.cloned = self.cloned.load(Ordering::Relaxed);
        report.up_to_date = self.up_to_date.load(Ordering::Relaxed);
        report.fast_forwarded = self.fast_forwarded.load(Ordering::Relaxed);
        report.diverged = self.diverged.load(Ordering::Relaxed);
        report.failed = self.failed.load(Ordering::Relaxed);
    }
}

type SharedQueue = Arc<Mutex<mpsc::Receiver<SyncTask>>>;

/// Handle to the workers started for one cycle
pub struct WorkerPool {
    workers: JoinSet<()>,
}

impl WorkerPool {
    /// Start `settings.worker_count` workers consuming `queue`
    pub fn spawn(
        settings: &SyncSettings,
        updater: Arc<dyn RepoUpdater>,
        queue: mpsc::Receiver<SyncTask>,
        tally: Arc<CycleTally>,
        cancel: CancellationToken,
    ) -> Self {
        let queue: SharedQueue = Arc::new(Mutex::new(queue));
        let mut workers = JoinSet::new();

        for id in 0..settings.worker_count {
            let worker = Worker {
                id,
                updater: Arc::clone(&updater),
                queue: Arc::clone(&queue),
                limiter: WorkerRateLimiter::new(settings.worker_rate),
                tally: Arc::clone(&tally),
                cancel: cancel.clone(),
            };
            workers.spawn(worker.run());
        }

        Self { workers }
    }

    /// Number of workers still running
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether every worker has exited
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Wait for every worker to exit
    ///
    /// Workers exit once the queue is closed and drained, or once
    /// cancellation fired and the queue is empty.
    pub async fn join(mut self) {
        while let Some(result) = self.workers.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Worker terminated abnormally");
            }
        }
    }
}

struct Worker {
    id: usize,
    updater: Arc<dyn RepoUpdater>,
    queue: SharedQueue,
    limiter: WorkerRateLimiter,
    tally: Arc<CycleTally>,
    cancel: CancellationToken,
}

impl Worker {
    async fn run(self) {
        debug!(worker = self.id, "Worker started");

        while let Some(task) = self.next_task().await {
            self.limiter.tick().await;

            let result = self.updater.update(&task.path, &task.descriptor).await;
            match result {
                Ok(outcome) => info!(
                    worker = self.id,
                    repository = %task.descriptor.name,
                    %outcome,
                    "Repository synced"
                ),
                Err(ref e) => error!(
                    worker = self.id,
                    repository = %task.descriptor.name,
                    error = %e,
                    "Error processing repository"
                ),
            }
            self.tally.record(&result);

            // Releases the outstanding-task slot after the outcome is recorded
            drop(task);
        }

        debug!(worker = self.id, "Worker stopped");
    }

    /// Next queued task, or `None` once the queue is closed and empty
    async fn next_task(&self) -> Option<SyncTask> {
        let mut queue = self.queue.lock().await;
        tokio::select! {
            biased;
            task = queue.recv() => task,
            () = self.cancel.cancelled() => {
                debug!(worker = self.id, "Shutdown requested, draining queue");
                // The producer may still be finishing a send; wait for it to close
                queue.recv().await
            }
        }
    }
}
