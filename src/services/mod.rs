//! Service layer: the concurrent sync core
//!
//! - `outstanding`: counter of enqueued-but-unfinished tasks
//! - `rate_limiter`: per-worker fixed cadence
//! - `target_resolver`: repository name to mirror path
//! - `pagination`: lazy page stream over a `RepositoryLister`
//! - `worker_pool`: bounded queue consumers
//! - `sync_orchestrator`: one full sync cycle
//! - `run_loop`: repeats cycles until shutdown

pub mod outstanding;
pub mod pagination;
pub mod rate_limiter;
pub mod run_loop;
pub mod sync_orchestrator;
pub mod target_resolver;
pub mod worker_pool;

pub use outstanding::{InFlight, OutstandingTasks};
pub use rate_limiter::WorkerRateLimiter;
pub use run_loop::{RunLoop, RunState, RunSummary};
pub use sync_orchestrator::SyncOrchestrator;
pub use target_resolver::SyncTargetResolver;
pub use worker_pool::{CycleTally, SyncTask, WorkerPool};
