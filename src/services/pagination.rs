use futures::stream::{self, Stream};

use crate::domain::errors::ListError;
use crate::domain::models::RepositoryDescriptor;
use crate::domain::ports::RepositoryLister;

/// One fetched page: its number and the descriptors on it
pub type Page = (u32, Vec<RepositoryDescriptor>);

/// Lazily walk the listing from page 1 until the lister reports no next page.
///
/// Nothing is fetched until the stream is polled, and each poll fetches at
/// most one page. The stream ends after the first error. Create a fresh
/// stream for every cycle.
pub fn pages(lister: &dyn RepositoryLister) -> impl Stream<Item = Result<Page, ListError>> + Send + '_ {
    stream::try_unfold(Some(1_u32), move |next| async move {
        let Some(page) = next else {
            return Ok(None);
        };

        let fetched = lister.list_page(page).await?;
        // A next page that does not move forward would loop forever
        let next = fetched.next_page.filter(|&n| n > page);
        Ok(Some(((page, fetched.repositories), next)))
    })
}
