//! Error taxonomy for the mirror sync system.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors; fatal at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("github_token cannot be empty when clone_auth is 'token'")]
    MissingToken,

    #[error("github_user cannot be empty")]
    MissingUser,

    #[error("repos_dir cannot be empty")]
    MissingReposDir,

    #[error("Invalid poll_interval '{value}': {reason}")]
    InvalidPollInterval { value: String, reason: String },

    #[error("Invalid worker_count: {0}. Must be at least 1")]
    InvalidWorkerCount(usize),

    #[error("Invalid queue_size: {0}. Must be at least 1")]
    InvalidQueueSize(usize),

    #[error("Invalid worker_rate_per_second: {0}. Must be at least 1")]
    InvalidWorkerRate(u32),

    #[error("Invalid api_url '{0}'")]
    InvalidApiUrl(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Failure fetching a page of the repository listing
#[derive(Error, Debug)]
pub enum ListError {
    #[error("Request for page {page} failed: {message}")]
    Request { page: u32, message: String },

    #[error("Page {page} returned HTTP {status}: {body}")]
    Status { page: u32, status: u16, body: String },

    #[error("Failed to decode page {page}: {message}")]
    Decode { page: u32, message: String },
}

impl ListError {
    /// Page whose request failed
    pub const fn page(&self) -> u32 {
        match self {
            Self::Request { page, .. } | Self::Status { page, .. } | Self::Decode { page, .. } => {
                *page
            }
        }
    }
}

/// Per-task failure; logged by the worker and never escalated
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Failed to clone {repository}: {message}")]
    Clone { repository: String, message: String },

    #[error("Failed to pull {repository}: {message}")]
    Pull { repository: String, message: String },
}

/// Cycle-level failure surfaced to the run loop
#[derive(Error, Debug)]
pub enum CycleError {
    #[error("Failed to create repos directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list repositories: {0}")]
    List(#[from] ListError),
}

impl CycleError {
    /// Whether the run loop must stop instead of waiting for the next poll
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }
}
