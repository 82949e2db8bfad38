use async_trait::async_trait;
use std::path::Path;

use crate::domain::errors::UpdateError;
use crate::domain::models::{RepositoryDescriptor, UpdateOutcome};

/// Port for bringing one local mirror in line with its remote
///
/// Implementations clone when `local_path` does not exist and otherwise
/// fast-forward the existing mirror. They only touch files under
/// `local_path`, and an in-progress update always runs to completion.
#[async_trait]
pub trait RepoUpdater: Send + Sync {
    /// Clone or fast-forward the mirror at `local_path`
    ///
    /// # Returns
    ///
    /// * `Ok(UpdateOutcome::Cloned)` - path was absent and the clone succeeded
    /// * `Ok(UpdateOutcome::UpToDate)` - nothing to pull
    /// * `Ok(UpdateOutcome::FastForwarded)` - mirror advanced to the remote head
    /// * `Ok(UpdateOutcome::Diverged)` - history diverged, mirror left untouched
    /// * `Err(UpdateError)` - clone or pull failed
    async fn update(
        &self,
        local_path: &Path,
        descriptor: &RepositoryDescriptor,
    ) -> Result<UpdateOutcome, UpdateError>;
}
