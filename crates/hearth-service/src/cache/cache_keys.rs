//! Cache key generators for consistent key naming.

use crate::dto::SearchRequest;
use hearth_core::UnitId;

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "hearth:cache";

/// Where one page of one listing search lives: a hash entry shared by every
/// page of the same filter/sort combination, and the field for this page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheAddress {
    pub coarse_key: String,
    pub page_field: String,
}

/// Address of a listing page.
///
/// The coarse key is built from the raw filter strings exactly as received,
/// so two searches share a group iff their raw inputs are byte-identical.
/// Dates and the area id are validated before this is called and cannot
/// contain `:`; the free-form sort key goes last, which keeps the key
/// unambiguous.
#[must_use]
pub fn listing_address(request: &SearchRequest) -> CacheAddress {
    let raw = request.raw();
    CacheAddress {
        coarse_key: format!(
            "{}:listing:{}:{}:{}:{}",
            CACHE_PREFIX, raw.start_date, raw.end_date, raw.area_id, raw.sort_key
        ),
        page_field: request.page.to_string(),
    }
}

/// Pattern matching every listing group.
#[must_use]
pub fn listing_pattern() -> String {
    format!("{}:listing:*", CACHE_PREFIX)
}

/// Key of the area list.
#[must_use]
pub fn areas() -> String {
    format!("{}:areas", CACHE_PREFIX)
}

/// Key of one unit's detail view.
#[must_use]
pub fn unit_detail(id: UnitId) -> String {
    format!("{}:unit:{}", CACHE_PREFIX, id)
}

/// Key of the home page featured units.
#[must_use]
pub fn home_page() -> String {
    format!("{}:home", CACHE_PREFIX)
}
