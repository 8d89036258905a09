//! # Paginator
//!
//! Drains a cursor-based listing into a single ordered `Vec`.
//!
//! ## Pagination Flow
//!
//! ```text
//! cursor = None
//! loop:
//!   response = executor.execute(call(cursor))
//!   None                    → warn, return what was collected so far
//!   items = extract(response)
//!   append items
//!   items empty or no cursor → return
//!   cursor = next cursor
//! ```
//!
//! There is no page limit: the listing is drained completely. Items keep the
//! order the API returned them in; nothing is sorted or deduplicated.

use std::future::Future;

use tracing::{debug, warn};

use super::RateLimitedExecutor;
use crate::custody::ApiError;
use crate::models::VaultPage;

/// A listing response that may point to a following page.
pub trait CursorPage {
    /// Continuation token of the next page, `None` on the last page.
    fn next_page_cursor(&self) -> Option<String>;
}

impl CursorPage for VaultPage {
    fn next_page_cursor(&self) -> Option<String> {
        self.next_cursor().map(str::to_string)
    }
}

/// Drives a cursor-based listing through a [`RateLimitedExecutor`].
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    executor: RateLimitedExecutor,
}

impl Paginator {
    pub fn new(executor: RateLimitedExecutor) -> Self {
        Self { executor }
    }

    /// Collect every item of the listing.
    ///
    /// ## Arguments
    ///
    /// * `call` - Fetches the page that follows `cursor` (`None` for the first)
    /// * `extract` - Pulls the items out of a page
    ///
    /// ## Returns
    ///
    /// * `Ok(items)` - All items in page order. An absent page ends the
    ///   listing early and the items gathered so far are returned.
    /// * `Err(...)` - A page request failed (after throttling retries)
    pub async fn collect<R, T, F, Fut, E>(
        &self,
        mut call: F,
        mut extract: E,
    ) -> Result<Vec<T>, ApiError>
    where
        R: CursorPage,
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Option<R>, ApiError>>,
        E: FnMut(&R) -> Vec<T>,
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let response = self
                .executor
                .execute(|| call(cursor.clone()))
                .await?;
            pages += 1;

            let Some(response) = response else {
                warn!(
                    "Empty response on page {} (cursor {:?}), stopping with {} items",
                    pages,
                    cursor,
                    items.len()
                );
                return Ok(items);
            };

            let page = extract(&response);
            let page_len = page.len();
            items.extend(page);

            match response.next_page_cursor() {
                Some(next) if page_len > 0 => {
                    debug!("Page {} returned {} items, next cursor {}", pages, page_len, next);
                    cursor = Some(next);
                }
                _ => {
                    debug!("Listing drained after {} pages, {} items", pages, items.len());
                    return Ok(items);
                }
            }
        }
    }
}
