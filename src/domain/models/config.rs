use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure for mirrorsync
///
/// Field names match the YAML keys used by existing deployments.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Personal access token used for the listing API and for git transport
    #[serde(default)]
    pub github_token: String,

    /// Account whose repositories are mirrored
    #[serde(default)]
    pub github_user: String,

    /// Root directory holding one mirror per repository
    #[serde(default)]
    pub repos_dir: PathBuf,

    /// Delay between sync cycles, as a duration string (`30s`, `5m`, `1h30m`)
    #[serde(default)]
    pub poll_interval: String,

    /// Number of concurrent workers per cycle
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Capacity of the bounded task queue
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Operations per second each worker may start
    #[serde(default = "default_worker_rate_per_second")]
    pub worker_rate_per_second: u32,

    /// How git transport authenticates against the remote
    #[serde(default)]
    pub clone_auth: CloneAuth,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

const fn default_worker_count() -> usize {
    5
}

const fn default_queue_size() -> usize {
    100
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

const fn default_worker_rate_per_second() -> u32 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: String::new(),
            github_user: String::new(),
            repos_dir: PathBuf::new(),
            poll_interval: String::new(),
            worker_count: default_worker_count(),
            queue_size: default_queue_size(),
            api_url: default_api_url(),
            worker_rate_per_second: default_worker_rate_per_second(),
            clone_auth: CloneAuth::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &"<redacted>")
            .field("github_user", &self.github_user)
            .field("repos_dir", &self.repos_dir)
            .field("poll_interval", &self.poll_interval)
            .field("worker_count", &self.worker_count)
            .field("queue_size", &self.queue_size)
            .field("api_url", &self.api_url)
            .field("worker_rate_per_second", &self.worker_rate_per_second)
            .field("clone_auth", &self.clone_auth)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Transport authentication used for listing, cloning and pulling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneAuth {
    /// Basic auth with the fixed username `git` and the token as password
    #[default]
    Token,
    /// No credentials; only public repositories are reachable
    Anonymous,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional directory for daily-rotated JSON log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
