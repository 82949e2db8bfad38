use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;

use crate::domain::errors::ConfigError;
use crate::domain::models::{Config, SyncSettings};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "MIRRORSYNC_";

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a specific file
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. The YAML file at `path` (must exist)
    /// 3. Environment variables (MIRRORSYNC_* prefix, `__` separates nested keys)
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load, validate and convert into the runtime settings in one step
    pub fn load_settings(path: impl AsRef<Path>) -> Result<(Config, SyncSettings)> {
        let config = Self::load_from_file(path)?;
        let settings = SyncSettings::from_config(&config)?;
        Ok((config, settings))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        // Field invariants (token, interval, counts) are enforced by SyncSettings
        SyncSettings::from_config(config).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CloneAuth;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.worker_count, 5);
        assert_eq!(config.queue_size, 100);
        assert_eq!(config.worker_rate_per_second, 10);
        assert_eq!(config.clone_auth, CloneAuth::Token);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
github_token: ghp_abc
github_user: octocat
repos_dir: /srv/mirrors
poll_interval: 10m
worker_count: 8
queue_size: 50
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.github_user, "octocat");
        assert_eq!(config.repos_dir.to_str(), Some("/srv/mirrors"));
        assert_eq!(config.worker_count, 8);
        assert_eq!(config.queue_size, 50);
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_load_from_file_applies_defaults() {
        let file = write_config(
            "github_token: ghp_abc\ngithub_user: octocat\nrepos_dir: /srv/mirrors\npoll_interval: 1h\n",
        );

        // Hold the temp-env lock so the override test cannot leak into this one
        temp_env::with_vars_unset(["MIRRORSYNC_WORKER_COUNT"], || {
            let (config, settings) = ConfigLoader::load_settings(file.path()).unwrap();
            assert_eq!(config.worker_count, 5);
            assert_eq!(config.queue_size, 100);
            assert_eq!(settings.poll_interval, Duration::from_secs(3600));
        });
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::load_from_file(dir.path().join("absent.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_required_field_fails() {
        let file = write_config("github_token: ghp_abc\nrepos_dir: /srv\npoll_interval: 1m\n");
        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingUser)
        ));
    }

    #[test]
    fn test_load_unparsable_interval_fails() {
        let file = write_config(
            "github_token: t\ngithub_user: u\nrepos_dir: /srv\npoll_interval: whenever\n",
        );
        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidPollInterval { .. })
        ));
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config {
            github_token: "t".to_string(),
            github_user: "u".to_string(),
            repos_dir: "/srv".into(),
            poll_interval: "1m".to_string(),
            ..Default::default()
        };
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_env_override() {
        let file = write_config(
            "github_token: t\ngithub_user: u\nrepos_dir: /srv\npoll_interval: 1m\nworker_count: 2\n",
        );

        temp_env::with_vars(
            [
                ("MIRRORSYNC_WORKER_COUNT", Some("12")),
                ("MIRRORSYNC_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.worker_count, 12, "Env should win over file");
                assert_eq!(config.logging.level, "debug");
                assert_eq!(config.github_user, "u", "File value should persist");
            },
        );
    }
}
