//! Mirrorsync - GitHub account mirroring daemon
//!
//! Periodically lists every repository owned by a configured account and
//! keeps a local git mirror of each in sync: clone when absent, fast-forward
//! when present.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, error taxonomy and ports
//! - **Service Layer** (`services`): worker pool, orchestrator and run loop
//! - **Infrastructure Layer** (`infrastructure`): config, logging, GitHub and git adapters
//! - **CLI Layer** (`cli`): argument parsing and signal handling
//!
//! # Example
//!
//! ```ignore
//! use mirrorsync::infrastructure::config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (_config, settings) = ConfigLoader::load_settings("config.yaml")?;
//!     println!("mirroring into {}", settings.root_dir.display());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ConfigError, CycleError, ListError, UpdateError};
pub use domain::models::{
    CloneAuth, Config, CycleReport, LoggingConfig, RepositoryDescriptor, RepositoryPage,
    SyncSettings, UpdateOutcome,
};
pub use domain::ports::{RepoUpdater, RepositoryLister};
pub use infrastructure::config::ConfigLoader;
pub use services::{RunLoop, RunState, SyncOrchestrator};
