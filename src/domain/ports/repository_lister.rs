use async_trait::async_trait;

use crate::domain::errors::ListError;
use crate::domain::models::RepositoryPage;

/// Number of repositories requested per page
pub const PAGE_SIZE: u32 = 100;

/// Port for listing the repositories owned by the configured account
///
/// Pages are numbered from 1. Implementations return at most [`PAGE_SIZE`]
/// descriptors per page and signal the end of the listing with
/// `next_page: None`.
///
/// # Examples
///
/// ```no_run
/// use mirrorsync::domain::ports::RepositoryLister;
///
/// async fn first_page(lister: &dyn RepositoryLister) -> usize {
///     lister.list_page(1).await.map(|p| p.repositories.len()).unwrap_or(0)
/// }
/// ```
#[async_trait]
pub trait RepositoryLister: Send + Sync {
    /// Fetch a single page of the listing
    async fn list_page(&self, page: u32) -> Result<RepositoryPage, ListError>;
}
