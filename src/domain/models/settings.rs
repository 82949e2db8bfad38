use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::errors::ConfigError;

use super::config::{CloneAuth, Config};

/// Validated, immutable run parameters shared by the orchestrator and workers.
#[derive(Clone)]
pub struct SyncSettings {
    /// Credential for the listing API and git transport
    pub token: String,
    /// Account whose repositories are mirrored
    pub account: String,
    /// Root directory of the mirrors
    pub root_dir: PathBuf,
    /// Delay between cycles
    pub poll_interval: Duration,
    /// Workers started per cycle (at least 1)
    pub worker_count: usize,
    /// Bounded queue capacity (at least 1)
    pub queue_capacity: usize,
    /// Base URL of the listing API, without trailing slash
    pub api_url: String,
    /// Per-worker operation cadence
    pub worker_rate: NonZeroU32,
    /// Transport authentication mode
    pub clone_auth: CloneAuth,
}

impl SyncSettings {
    /// Build settings from a loaded configuration, enforcing its invariants
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        if config.clone_auth == CloneAuth::Token && config.github_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if config.github_user.trim().is_empty() {
            return Err(ConfigError::MissingUser);
        }
        if config.repos_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingReposDir);
        }
        if config.worker_count == 0 {
            return Err(ConfigError::InvalidWorkerCount(config.worker_count));
        }
        if config.queue_size == 0 {
            return Err(ConfigError::InvalidQueueSize(config.queue_size));
        }
        let worker_rate = NonZeroU32::new(config.worker_rate_per_second)
            .ok_or(ConfigError::InvalidWorkerRate(config.worker_rate_per_second))?;

        let api_url = config.api_url.trim().trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(config.api_url.clone()));
        }

        let poll_interval = parse_duration(&config.poll_interval).map_err(|reason| {
            ConfigError::InvalidPollInterval {
                value: config.poll_interval.clone(),
                reason,
            }
        })?;
        if poll_interval.is_zero() {
            return Err(ConfigError::InvalidPollInterval {
                value: config.poll_interval.clone(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            token: config.github_token.trim().to_string(),
            account: config.github_user.trim().to_string(),
            root_dir: config.repos_dir.clone(),
            poll_interval,
            worker_count: config.worker_count,
            queue_capacity: config.queue_size,
            api_url,
            worker_rate,
            clone_auth: config.clone_auth,
        })
    }
}

impl fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSettings")
            .field("token", &"<redacted>")
            .field("account", &self.account)
            .field("root_dir", &self.root_dir)
            .field("poll_interval", &self.poll_interval)
            .field("worker_count", &self.worker_count)
            .field("queue_capacity", &self.queue_capacity)
            .field("api_url", &self.api_url)
            .field("worker_rate", &self.worker_rate)
            .field("clone_auth", &self.clone_auth)
            .finish()
    }
}

/// Parse a duration string such as `30s`, `5m`, `1h30m`, `1.5h` or `250ms`.
///
/// Each group is a decimal number followed by a unit (`ms`, `s`, `m`, `h`).
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let mut total = 0.0_f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit after '{rest}' (expected ms, s, m or h)"))?;
        if num_len == 0 {
            return Err(format!("expected a number at '{rest}'"));
        }
        let value: f64 = rest[..num_len]
            .parse()
            .map_err(|_| format!("invalid number '{}'", &rest[..num_len]))?;
        rest = &rest[num_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let seconds_per_unit = match &rest[..unit_len] {
            "ms" => 0.001,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            other => return Err(format!("unknown unit '{other}' (expected ms, s, m or h)")),
        };
        rest = &rest[unit_len..];
        total += value * seconds_per_unit;
    }

    Duration::try_from_secs_f64(total).map_err(|e| e.to_string())
}
