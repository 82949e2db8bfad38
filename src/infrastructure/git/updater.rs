//! Git-backed mirror updater
//!
//! Shells out to the `git` binary. Clones absent mirrors and fast-forwards
//! existing ones; local history is never rewritten.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::UpdateError;
use crate::domain::models::{CloneAuth, RepositoryDescriptor, SyncSettings, UpdateOutcome};
use crate::domain::ports::RepoUpdater;

/// Username sent with the token for basic auth over HTTPS
const BASIC_AUTH_USER: &str = "git";

/// Mirror updater driving the `git` command line
pub struct GitCliUpdater {
    /// `http.extraHeader` value carrying the credential, if any
    auth_header: Option<String>,
}

impl GitCliUpdater {
    /// Build an updater authenticating as configured
    pub fn new(settings: &SyncSettings) -> Self {
        match settings.clone_auth {
            CloneAuth::Token => Self::with_token(&settings.token),
            CloneAuth::Anonymous => Self::anonymous(),
        }
    }

    /// Basic auth with the fixed username and `token` as password
    pub fn with_token(token: &str) -> Self {
        let credential = STANDARD.encode(format!("{BASIC_AUTH_USER}:{token}"));
        Self {
            auth_header: Some(format!("Authorization: Basic {credential}")),
        }
    }

    /// No transport credentials
    pub const fn anonymous() -> Self {
        Self { auth_header: None }
    }

    /// Base git command; the credential is passed per invocation and never
    /// written to the mirror's config
    fn git(&self, dir: Option<&Path>) -> Command {
        let mut cmd = Command::new("git");
        if let Some(ref header) = self.auth_header {
            cmd.arg("-c").arg(format!("http.extraHeader={header}"));
        }
        if let Some(dir) = dir {
            cmd.arg("-C").arg(dir);
        }
        cmd.env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Run git and return trimmed stdout, or stderr on a non-zero exit
    async fn run<I, S>(&self, dir: Option<&Path>, args: I) -> Result<String, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self
            .git(dir)
            .args(args)
            .output()
            .await
            .map_err(|e| format!("failed to run git: {e}"))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(if stderr.is_empty() {
                format!("git exited with {}", output.status)
            } else {
                stderr
            })
        }
    }

    /// Resolve a revision to a commit id, `None` when it does not exist
    async fn resolve(&self, dir: &Path, rev: &str) -> Option<String> {
        self.run(Some(dir), ["rev-parse", "--verify", "--quiet", rev])
            .await
            .ok()
            .filter(|id| !id.is_empty())
    }

    /// Whether `ancestor` is reachable from `descendant`
    async fn is_ancestor(&self, dir: &Path, ancestor: &str, descendant: &str) -> Result<bool, String> {
        let status = self
            .git(Some(dir))
            .args(["merge-base", "--is-ancestor", ancestor, descendant])
            .status()
            .await
            .map_err(|e| format!("failed to run git: {e}"))?;

        match status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(format!("merge-base exited with {status}")),
        }
    }

    async fn clone_mirror(
        &self,
        local_path: &Path,
        descriptor: &RepositoryDescriptor,
    ) -> Result<UpdateOutcome, UpdateError> {
        info!(repository = %descriptor.name, path = %local_path.display(), "Cloning");

        let args: [&OsStr; 4] = [
            OsStr::new("clone"),
            OsStr::new("--quiet"),
            OsStr::new(&descriptor.clone_url),
            local_path.as_os_str(),
        ];
        self.run(None, args)
            .await
            .map_err(|message| UpdateError::Clone {
                repository: descriptor.name.clone(),
                message,
            })?;

        Ok(UpdateOutcome::Cloned)
    }

    async fn pull_mirror(
        &self,
        local_path: &Path,
        descriptor: &RepositoryDescriptor,
    ) -> Result<UpdateOutcome, UpdateError> {
        info!(repository = %descriptor.name, path = %local_path.display(), "Pulling updates");

        let pull_error = |message: String| UpdateError::Pull {
            repository: descriptor.name.clone(),
            message,
        };

        // Open: the path must be a work tree
        let inside = self
            .run(Some(local_path), ["rev-parse", "--is-inside-work-tree"])
            .await
            .map_err(|e| pull_error(format!("failed to open repository: {e}")))?;
        if inside != "true" {
            return Err(pull_error("path is not a git work tree".to_string()));
        }

        // FETCH_HEAD is not needed; skipping it keeps an unchanged mirror untouched
        self.run(Some(local_path), ["fetch", "--quiet", "--no-write-fetch-head"])
            .await
            .map_err(|e| pull_error(format!("fetch failed: {e}")))?;

        let Some(upstream) = self.resolve(local_path, "@{upstream}").await else {
            debug!(repository = %descriptor.name, "No upstream commit to pull");
            return Ok(UpdateOutcome::UpToDate);
        };
        let head = self.resolve(local_path, "HEAD").await;

        let fast_forward = match head {
            Some(ref head) if *head == upstream => return Ok(UpdateOutcome::UpToDate),
            Some(ref head) => {
                if self
                    .is_ancestor(local_path, &upstream, head)
                    .await
                    .map_err(pull_error)?
                {
                    // Local is ahead of the remote; nothing to bring in
                    return Ok(UpdateOutcome::UpToDate);
                }
                self.is_ancestor(local_path, head, &upstream)
                    .await
                    .map_err(pull_error)?
            }
            None => true,
        };

        if !fast_forward {
            return Ok(UpdateOutcome::Diverged);
        }

        self.run(Some(local_path), ["merge", "--ff-only", "--quiet", "@{upstream}"])
            .await
            .map_err(|e| pull_error(format!("fast-forward failed: {e}")))?;

        Ok(UpdateOutcome::FastForwarded)
    }
}

#[async_trait]
impl RepoUpdater for GitCliUpdater {
    #[instrument(skip(self, descriptor), fields(repository = %descriptor.name))]
    async fn update(
        &self,
        local_path: &Path,
        descriptor: &RepositoryDescriptor,
    ) -> Result<UpdateOutcome, UpdateError> {
        let exists = tokio::fs::try_exists(local_path)
            .await
            .map_err(|e| UpdateError::Pull {
                repository: descriptor.name.clone(),
                message: format!("failed to inspect {}: {e}", local_path.display()),
            })?;
        let outcome = if exists {
            self.pull_mirror(local_path, descriptor).await?
        } else {
            self.clone_mirror(local_path, descriptor).await?
        };

        match outcome {
            UpdateOutcome::UpToDate => {
                info!(repository = %descriptor.name, "Repository is already up to date");
            }
            UpdateOutcome::Diverged => warn!(
                repository = %descriptor.name,
                "Local history diverged from remote; leaving mirror as-is"
            ),
            UpdateOutcome::Cloned | UpdateOutcome::FastForwarded => {
                debug!(repository = %descriptor.name, %outcome, "Mirror updated");
            }
        }
        Ok(outcome)
    }
}
