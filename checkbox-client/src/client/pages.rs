//! Lazy page-by-page listing.

use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;

use super::Client;
use crate::error::{ClientError, ClientResult};
use crate::method::{Paginated, page_results};
use crate::session::SessionStorage;
use crate::transport::Effects;

/// Cursor over a paginated list endpoint.
///
/// Each page is one request. After a non-empty page the descriptor's window is
/// resynced from the server's `meta` and advanced; an empty page ends the
/// listing. The descriptor is borrowed, so its window stays where the listing
/// left it: listing again with the same descriptor continues from there, and a
/// fresh listing needs a fresh descriptor.
pub struct Pages<'a, E, M> {
    client: &'a Client<E>,
    method: &'a mut M,
    session: &'a mut SessionStorage,
    exhausted: bool,
}

impl<E: Effects> Client<E> {
    /// List every item reachable from `method`'s current window.
    pub fn paginate<'a, M: Paginated>(
        &'a self,
        method: &'a mut M,
        session: &'a mut SessionStorage,
    ) -> Pages<'a, E, M> {
        Pages {
            client: self,
            method,
            session,
            exhausted: false,
        }
    }
}

impl<'a, E: Effects, M: Paginated> Pages<'a, E, M> {
    /// Fetch the next page; `None` once the server returns an empty page.
    pub async fn next_page(&mut self) -> ClientResult<Option<Vec<Value>>> {
        if self.exhausted {
            return Ok(None);
        }

        let paged = self.client.emit(&*self.method, self.session).await?;
        let results = page_results(&paged)?;
        if results.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }

        self.method.resync(&paged)?.advance();
        Ok(Some(results))
    }

    /// Flatten the pages into a stream of items.
    pub fn into_stream(self) -> impl Stream<Item = ClientResult<Value>> + 'a {
        stream::try_unfold(self, |mut pages| async move {
            let next = pages.next_page().await?;
            Ok::<_, ClientError>(next.map(|items| {
                let items = stream::iter(items.into_iter().map(Ok::<Value, ClientError>));
                (items, pages)
            }))
        })
        .try_flatten()
    }
}
