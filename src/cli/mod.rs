//! Command-line entry point and process wiring

pub mod shutdown;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::git::GitCliUpdater;
use crate::infrastructure::github::GitHubLister;
use crate::infrastructure::logging::LoggerImpl;
use crate::services::{RunLoop, SyncOrchestrator};

pub use shutdown::install_shutdown_handler;

/// Mirror every repository of a GitHub account into a local directory
#[derive(Debug, Parser)]
#[command(name = "mirrorsync", version, about)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, env = "MIRRORSYNC_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,
}

/// Load configuration, start logging and run the sync loop until shutdown
pub async fn run(cli: Cli) -> Result<()> {
    let (config, settings) = ConfigLoader::load_settings(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    let _logger = LoggerImpl::init(&config.logging).context("Failed to initialize logging")?;

    info!("Starting repository sync service...");
    info!(path = %settings.root_dir.display(), "Repositories will be stored in: {}", settings.root_dir.display());
    info!(
        workers = settings.worker_count,
        queue_size = settings.queue_capacity,
        "Using {} workers with queue size {}",
        settings.worker_count,
        settings.queue_capacity
    );
    info!(interval = ?settings.poll_interval, "Polling interval: {:?}", settings.poll_interval);

    let settings = Arc::new(settings);
    let lister = Arc::new(GitHubLister::new(&settings)?);
    let updater = Arc::new(GitCliUpdater::new(&settings));
    let orchestrator = SyncOrchestrator::new(Arc::clone(&settings), lister, updater);

    let cancel = CancellationToken::new();
    install_shutdown_handler(cancel.clone());

    RunLoop::new(orchestrator, settings.poll_interval, cancel)
        .run()
        .await
        .context("Sync loop stopped on a fatal error")?;

    Ok(())
}

/// Report a fatal error on stderr
pub fn handle_error(err: &anyhow::Error) {
    tracing::error!(error = %format!("{err:#}"), "Fatal error");
    eprintln!("Error: {err:#}");
}
