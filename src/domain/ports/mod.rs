//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - RepositoryLister: paginated remote repository listing
//! - RepoUpdater: clone or fast-forward a local mirror
//!
//! These traits keep the sync core independent of the hosting service and of git.

pub mod repo_updater;
pub mod repository_lister;

pub use repo_updater::RepoUpdater;
pub use repository_lister::RepositoryLister;
