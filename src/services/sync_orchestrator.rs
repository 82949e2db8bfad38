//! Sync Orchestrator
//!
//! Owns one full sync cycle: prepares the root directory, starts the worker
//! pool, walks the repository listing page by page, enqueues one task per
//! repository (blocking when the queue is full) and waits until every
//! enqueued task has finished.

use chrono::Utc;
use futures::TryStreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::outstanding::OutstandingTasks;
use super::pagination::pages;
use super::target_resolver::SyncTargetResolver;
use super::worker_pool::{CycleTally, SyncTask, WorkerPool};
use crate::domain::errors::{CycleError, ListError};
use crate::domain::models::{CycleReport, SyncSettings};
use crate::domain::ports::{RepoUpdater, RepositoryLister};

/// How task production ended
enum ProduceStop {
    Completed,
    Cancelled,
    QueueClosed,
}

/// Runs sync cycles against a lister and an updater
pub struct SyncOrchestrator {
    settings: Arc<SyncSettings>,
    lister: Arc<dyn RepositoryLister>,
    updater: Arc<dyn RepoUpdater>,
}

impl SyncOrchestrator {
    /// Create an orchestrator from its collaborators
    pub fn new(
        settings: Arc<SyncSettings>,
        lister: Arc<dyn RepositoryLister>,
        updater: Arc<dyn RepoUpdater>,
    ) -> Self {
        Self {
            settings,
            lister,
            updater,
        }
    }

    /// Settings this orchestrator runs with
    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Run one cycle.
    ///
    /// Task failures only show up in the returned report. A listing error
    /// stops pagination, lets already-queued tasks finish and is then
    /// returned. Cancellation stops pagination the same way and returns the
    /// partial report.
    #[instrument(skip_all, fields(account = %self.settings.account))]
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> Result<CycleReport, CycleError> {
        let root = &self.settings.root_dir;
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|source| CycleError::Directory {
                path: root.clone(),
                source,
            })?;

        let mut report = CycleReport {
            started_at: Some(Utc::now()),
            ..Default::default()
        };

        let (queue_tx, queue_rx) = mpsc::channel(self.settings.queue_capacity);
        let outstanding = OutstandingTasks::new();
        let tally = Arc::new(CycleTally::default());
        let pool = WorkerPool::spawn(
            &self.settings,
            Arc::clone(&self.updater),
            queue_rx,
            Arc::clone(&tally),
            cancel.clone(),
        );
        debug!(
            workers = pool.len(),
            capacity = self.settings.queue_capacity,
            "Worker pool started"
        );

        let resolver = SyncTargetResolver::new(root.clone());
        let produced = self
            .produce(&queue_tx, &resolver, &outstanding, &mut report, cancel)
            .await;

        // Close the queue; workers exit once it is drained
        drop(queue_tx);
        outstanding.wait_idle().await;
        pool.join().await;
        tally.fill(&mut report);

        info!("Found {} repositories", report.discovered);
        info!(
            discovered = report.discovered,
            enqueued = report.enqueued,
            skipped = report.skipped,
            cloned = report.cloned,
            up_to_date = report.up_to_date,
            fast_forwarded = report.fast_forwarded,
            diverged = report.diverged,
            failed = report.failed,
            "Sync cycle finished"
        );

        match produced {
            Ok(ProduceStop::Completed) => Ok(report),
            Ok(ProduceStop::Cancelled) => {
                info!("Sync cycle cut short by shutdown");
                Ok(report)
            }
            Ok(ProduceStop::QueueClosed) => {
                error!("Task queue closed before the listing was exhausted");
                Ok(report)
            }
            Err(e) => Err(CycleError::List(e)),
        }
    }

    /// Walk the listing and enqueue tasks until it ends, fails or is cancelled
    async fn produce(
        &self,
        queue: &mpsc::Sender<SyncTask>,
        resolver: &SyncTargetResolver,
        outstanding: &OutstandingTasks,
        report: &mut CycleReport,
        cancel: &CancellationToken,
    ) -> Result<ProduceStop, ListError> {
        let listing = pages(self.lister.as_ref());
        futures::pin_mut!(listing);

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return Ok(ProduceStop::Cancelled),
                next = listing.try_next() => next,
            };

            let (page, repositories) = match next {
                Ok(Some(page)) => page,
                Ok(None) => return Ok(ProduceStop::Completed),
                Err(e) => {
                    error!(page = e.page(), error = %e, "Failed to get repositories list");
                    return Err(e);
                }
            };
            debug!(page, count = repositories.len(), "Enqueuing page");
            report.discovered += repositories.len();

            for descriptor in repositories {
                let Some(path) = resolver.resolve(&descriptor) else {
                    warn!(repository = %descriptor.name, "Skipping repository with unusable name");
                    report.skipped += 1;
                    continue;
                };

                // Counted before the task becomes visible to workers
                let task = SyncTask::new(descriptor, path, outstanding.track());
                tokio::select! {
                    biased;
                    // Dropping the unsent task releases its slot
                    () = cancel.cancelled() => return Ok(ProduceStop::Cancelled),
                    sent = queue.send(task) => {
                        if sent.is_err() {
                            return Ok(ProduceStop::QueueClosed);
                        }
                        report.enqueued += 1;
                    }
                }
            }
        }
    }
}
