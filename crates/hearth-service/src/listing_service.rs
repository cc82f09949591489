//! Listing service trait definition.

use crate::dto::{SearchQuery, SearchResult};
use async_trait::async_trait;
use hearth_core::HearthResult;

/// Listing search.
#[async_trait]
pub trait ListingService: Send + Sync {
    /// Answers a search with one page of available units.
    ///
    /// Fails with a validation error for a malformed query and with a data
    /// access error when the repository cannot be reached. Cache trouble is
    /// never reported.
    async fn search(&self, query: SearchQuery) -> HearthResult<SearchResult>;

    /// Drops every cached listing page and the home page.
    /// Returns the number of keys removed.
    async fn invalidate_listings(&self) -> u64;
}
