use std::path::{Path, PathBuf};

use crate::domain::models::RepositoryDescriptor;

/// Maps repositories to their mirror directory under the root
#[derive(Debug, Clone)]
pub struct SyncTargetResolver {
    root: PathBuf,
}

impl SyncTargetResolver {
    /// Resolver for mirrors stored under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of all mirrors
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mirror path for `descriptor`: `root/<name>`
    ///
    /// Returns `None` for names that would not stay a single directory
    /// directly under the root.
    pub fn resolve(&self, descriptor: &RepositoryDescriptor) -> Option<PathBuf> {
        is_safe_name(&descriptor.name).then(|| self.root.join(&descriptor.name))
    }
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
