//! Common test utilities for integration tests
//!
//! Provides shared fixtures, fakes for the lister/updater ports and git
//! helpers used across multiple integration test files.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tokio::sync::Semaphore;

use mirrorsync::domain::ports::repository_lister::PAGE_SIZE;
use mirrorsync::{
    CloneAuth, ListError, RepoUpdater, RepositoryDescriptor, RepositoryLister, RepositoryPage,
    SyncSettings, UpdateError, UpdateOutcome,
};

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Wait for a condition to be true with timeout
///
/// Polls the predicate every 10ms until it returns true or timeout is reached.
#[allow(dead_code)]
pub async fn wait_for<F>(mut predicate: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(timeout_ms);

    while start.elapsed() < timeout {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    false
}

/// Settings suitable for fast tests rooted at `root`
#[allow(dead_code)]
pub fn test_settings(root: &Path) -> SyncSettings {
    SyncSettings {
        token: "test-token".to_string(),
        account: "octocat".to_string(),
        root_dir: root.to_path_buf(),
        poll_interval: Duration::from_millis(50),
        worker_count: 5,
        queue_capacity: 100,
        api_url: "https://api.github.com".to_string(),
        worker_rate: NonZeroU32::new(1000).unwrap(),
        clone_auth: CloneAuth::Anonymous,
    }
}

/// Descriptors named `repo-000`, `repo-001`, ...
#[allow(dead_code)]
pub fn numbered_repos(count: usize) -> Vec<RepositoryDescriptor> {
    (0..count)
        .map(|i| {
            let name = format!("repo-{i:03}");
            let url = format!("https://github.com/octocat/{name}.git");
            RepositoryDescriptor::new(name, url)
        })
        .collect()
}

/// In-memory lister serving fixed pages
#[allow(dead_code)]
pub struct FakeLister {
    pages: Vec<Vec<RepositoryDescriptor>>,
    fail_on: Option<u32>,
    requested: Mutex<Vec<u32>>,
}

#[allow(dead_code)]
impl FakeLister {
    /// Serve `repos` split into pages of `page_size`
    pub fn paged(repos: Vec<RepositoryDescriptor>, page_size: usize) -> Self {
        let pages = repos.chunks(page_size).map(<[_]>::to_vec).collect();
        Self {
            pages,
            fail_on: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Serve `count` numbered repositories in pages of the API page size
    pub fn numbered(count: usize) -> Self {
        Self::paged(numbered_repos(count), PAGE_SIZE as usize)
    }

    /// Fail with a server error when `page` is requested
    pub fn failing_on(mut self, page: u32) -> Self {
        self.fail_on = Some(page);
        self
    }

    /// Pages requested so far, in order
    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requested.lock().unwrap().len()
    }
}

#[async_trait]
impl RepositoryLister for FakeLister {
    async fn list_page(&self, page: u32) -> Result<RepositoryPage, ListError> {
        self.requested.lock().unwrap().push(page);

        if self.fail_on == Some(page) {
            return Err(ListError::Status {
                page,
                status: 500,
                body: "internal error".to_string(),
            });
        }

        let index = page as usize - 1;
        let repositories = self.pages.get(index).cloned().unwrap_or_default();
        let next_page = (index + 1 < self.pages.len()).then_some(page + 1);
        Ok(RepositoryPage {
            repositories,
            next_page,
        })
    }
}

/// Updater that records every call and optionally blocks on a gate
#[allow(dead_code)]
pub struct RecordingUpdater {
    calls: Mutex<HashMap<String, usize>>,
    paths: Mutex<Vec<PathBuf>>,
    failing: HashSet<String>,
    started: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

#[allow(dead_code)]
impl RecordingUpdater {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
            paths: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            started: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Fail clones of the named repositories
    pub fn failing(mut self, names: &[&str]) -> Self {
        self.failing = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    /// Block every update until the returned semaphore gets permits
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Updates that have started, including ones still blocked
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> HashMap<String, usize> {
        self.calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepoUpdater for RecordingUpdater {
    async fn update(
        &self,
        local_path: &Path,
        descriptor: &RepositoryDescriptor,
    ) -> Result<UpdateOutcome, UpdateError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.expect("gate closed");
        }

        *self
            .calls
            .lock()
            .unwrap()
            .entry(descriptor.name.clone())
            .or_default() += 1;
        self.paths.lock().unwrap().push(local_path.to_path_buf());

        if self.failing.contains(&descriptor.name) {
            return Err(UpdateError::Clone {
                repository: descriptor.name.clone(),
                message: "simulated failure".to_string(),
            });
        }
        Ok(UpdateOutcome::Cloned)
    }
}

/// Whether a usable git binary is on PATH
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir` with a fixed identity, panicking on failure
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=Test User", "-c", "user.email=test@test.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Bare "remote" repository plus a working copy that pushes to it
#[allow(dead_code)]
pub struct TestRemote {
    _dir: TempDir,
    /// Bare repository, usable as a clone URL
    pub bare: PathBuf,
    /// Working copy used to author commits
    pub seed: PathBuf,
}

#[allow(dead_code)]
impl TestRemote {
    /// Create a remote on `main` with one commit adding README.md
    pub fn new() -> Self {
        let dir = temp_dir();
        let bare = dir.path().join("remote.git");
        let seed = dir.path().join("seed");
        std::fs::create_dir_all(&bare).unwrap();
        std::fs::create_dir_all(&seed).unwrap();

        git(&bare, &["init", "--bare", "--initial-branch=main"]);
        git(&seed, &["init", "--initial-branch=main"]);
        git(&seed, &["remote", "add", "origin", bare.to_str().unwrap()]);

        let remote = Self {
            _dir: dir,
            bare,
            seed,
        };
        remote.commit_file("README.md", "hello\n", "initial commit");
        remote
    }

    /// Clone URL of the bare repository
    pub fn url(&self) -> String {
        self.bare.to_string_lossy().into_owned()
    }

    /// Commit `contents` to `file` on the seed and push it
    pub fn commit_file(&self, file: &str, contents: &str, message: &str) {
        std::fs::write(self.seed.join(file), contents).unwrap();
        git(&self.seed, &["add", file]);
        git(&self.seed, &["commit", "-m", message]);
        git(&self.seed, &["push", "origin", "main"]);
    }

    /// Commit id the remote's `main` points at
    pub fn head(&self) -> String {
        git(&self.bare, &["rev-parse", "main"])
    }
}

/// Contents and modification time of every file under `root`
///
/// `.git` is skipped unless `include_git` is set.
#[allow(dead_code)]
pub fn snapshot_files(
    root: &Path,
    include_git: bool,
) -> BTreeMap<PathBuf, (Vec<u8>, SystemTime)> {
    let mut files = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).expect("Failed to read directory") {
            let entry = entry.unwrap();
            let path = entry.path();
            let file_type = entry.file_type().unwrap();
            if file_type.is_dir() {
                if include_git || entry.file_name() != ".git" {
                    pending.push(path);
                }
            } else if file_type.is_file() {
                let modified = entry.metadata().unwrap().modified().unwrap();
                files.insert(path.clone(), (std::fs::read(&path).unwrap(), modified));
            }
        }
    }

    files
}
