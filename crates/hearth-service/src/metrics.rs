//! Metrics emitted by the cache layer and the listing search.

use metrics::{describe_counter, describe_histogram};

/// Metric names.
pub mod names {
    /// Cache lookups answered from the cache. Labels: cache.
    pub const CACHE_HITS_TOTAL: &str = "hearth_cache_hits_total";
    /// Cache lookups that fell through to the repository. Labels: cache.
    pub const CACHE_MISSES_TOTAL: &str = "hearth_cache_misses_total";
    /// Degraded cache operations. Labels: cache, op (read, write, decode, invalidate).
    pub const CACHE_ERRORS_TOTAL: &str = "hearth_cache_errors_total";
    /// Keys removed by explicit invalidation.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "hearth_cache_invalidations_total";
    /// End-to-end listing search latency in seconds. Labels: outcome.
    pub const SEARCH_DURATION_SECONDS: &str = "hearth_listing_search_duration_seconds";
}

/// Cache label values.
pub mod caches {
    pub const LISTING: &str = "listing";
    pub const AREAS: &str = "areas";
    pub const UNIT_DETAIL: &str = "unit_detail";
    pub const HOME_PAGE: &str = "home_page";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Cache lookups served from the cache");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Cache lookups that went to the repository");
    describe_counter!(
        names::CACHE_ERRORS_TOTAL,
        "Cache operations that failed and were degraded"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Cache keys removed by explicit invalidation"
    );
    describe_histogram!(
        names::SEARCH_DURATION_SECONDS,
        "Listing search latency in seconds"
    );
}
