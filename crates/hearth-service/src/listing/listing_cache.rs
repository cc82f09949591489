//! Read-through cache over the listing search.

use super::{ConflictResolver, MissCoalescer, QueryPlanner, ResultAssembler};
use crate::cache::{cache_keys, BestEffortCache, CacheAddress};
use crate::dto::{SearchQuery, SearchRequest, SearchResult};
use crate::listing_service::ListingService;
use crate::metrics::{caches, names};
use async_trait::async_trait;
use hearth_config::ListingConfig;
use hearth_core::HearthResult;
use hearth_repository::{BookingRepository, UnitRepository};
use hearth_resilience::TimeoutPolicy;
use metrics::histogram;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The listing search behind a per-page read-through cache.
///
/// Pages of one filter/sort combination share a cache hash entry, one field
/// per page. The entry expires `ttl` after its most recent page write.
///
/// A page computed while [`ListingService::invalidate_listings`] ran on this
/// instance is returned but not stored.
pub struct ListingCache {
    units: Arc<dyn UnitRepository>,
    resolver: ConflictResolver,
    planner: QueryPlanner,
    assembler: ResultAssembler,
    cache: BestEffortCache,
    coalescer: Option<MissCoalescer>,
    ttl: Duration,
    timeouts: TimeoutPolicy,
    /// Bumped by every invalidation.
    generation: AtomicU64,
}

impl ListingCache {
    /// Creates the listing search.
    #[must_use]
    pub fn new(
        units: Arc<dyn UnitRepository>,
        bookings: Arc<dyn BookingRepository>,
        cache: BestEffortCache,
        config: &ListingConfig,
        timeouts: TimeoutPolicy,
    ) -> Self {
        Self {
            units,
            resolver: ConflictResolver::new(bookings, timeouts),
            planner: QueryPlanner::new(config.page_capacity),
            assembler: ResultAssembler::new(config.image_url_prefix.clone()),
            cache,
            coalescer: config.coalesce_misses.then(MissCoalescer::new),
            ttl: config.ttl(),
            timeouts,
            generation: AtomicU64::new(0),
        }
    }

    /// Searches with an already validated request.
    pub async fn search_request(&self, request: &SearchRequest) -> HearthResult<SearchResult> {
        let address = cache_keys::listing_address(request);

        if let Some(hit) = self.lookup(&address).await {
            return Ok(hit);
        }

        let _slot = match &self.coalescer {
            Some(coalescer) => {
                let slot = coalescer.lock(&address).await;
                // Whoever held the slot before us may have filled the page.
                if let Some(hit) = self.lookup(&address).await {
                    return Ok(hit);
                }
                Some(slot)
            }
            None => None,
        };

        let generation = self.generation.load(Ordering::Acquire);
        let result = self.compute(request).await?;

        if self.generation.load(Ordering::Acquire) != generation {
            debug!(key = %address.coarse_key, page = request.page, "Invalidated during computation, page not stored");
            return Ok(result);
        }

        // Every computed page is stored, including pages past the end.
        self.cache
            .hput(
                caches::LISTING,
                &address.coarse_key,
                &address.page_field,
                &result,
                self.ttl,
            )
            .await;

        Ok(result)
    }

    async fn lookup(&self, address: &CacheAddress) -> Option<SearchResult> {
        self.cache
            .hget(caches::LISTING, &address.coarse_key, &address.page_field)
            .await
    }

    /// Runs the search against the repositories.
    async fn compute(&self, request: &SearchRequest) -> HearthResult<SearchResult> {
        let conflicts = self.resolver.find_conflicting(&request.date_range).await?;
        let query = self.planner.plan(request, conflicts);

        let page = self
            .timeouts
            .repository("units.find_by_filter", self.units.find_by_filter(&query))
            .await?;

        self.assembler.page(page)
    }
}

#[async_trait]
impl ListingService for ListingCache {
    async fn search(&self, query: SearchQuery) -> HearthResult<SearchResult> {
        let started = Instant::now();
        let request = query.parse()?;

        debug!(
            area_id = ?request.area_id,
            range = %request.date_range,
            sort = %request.sort_key,
            page = request.page,
            "Searching listings"
        );

        let result = self.search_request(&request).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        histogram!(names::SEARCH_DURATION_SECONDS, "outcome" => outcome)
            .record(started.elapsed().as_secs_f64());
        result
    }

    async fn invalidate_listings(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let listings = self
            .cache
            .invalidate_pattern(caches::LISTING, &cache_keys::listing_pattern())
            .await;
        let home = self
            .cache
            .invalidate(caches::HOME_PAGE, &cache_keys::home_page())
            .await;

        info!(removed = listings + home, "Listing cache invalidated");
        listings + home
    }
}
