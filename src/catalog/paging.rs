//! Offset-based pagination turned into a lazy stream of URIs.
//!
//! The stream is finite and restartable: every call to [`paged_uris`] starts
//! again at offset 0, and it ends on an empty page or when the service
//! reports no next page.

use std::future::Future;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use super::domain::{CatalogError, ItemPage};

/// Build a URI stream from a page fetcher taking the current offset.
///
/// The offset advances by the raw item count of each page, so entries that
/// carried no URI still count towards the next offset.
pub fn paged_uris<'a, F, Fut>(mut fetch_page: F) -> BoxStream<'a, Result<String, CatalogError>>
where
    F: FnMut(usize) -> Fut + Send + 'a,
    Fut: Future<Output = Result<ItemPage, CatalogError>> + Send + 'a,
{
    stream::try_unfold(Some(0usize), move |offset| {
        let pending = offset.map(|offset| (offset, fetch_page(offset)));
        async move {
            let Some((offset, pending)) = pending else {
                return Ok(None);
            };
            let page = pending.await?;
            if page.item_count == 0 {
                return Ok(None);
            }
            let next = page.has_next.then_some(offset + page.item_count);
            Ok::<_, CatalogError>(Some((page.uris, next)))
        }
    })
    .map_ok(|uris| stream::iter(uris.into_iter().map(Ok::<String, CatalogError>)))
    .try_flatten()
    .boxed()
}
