//! Unit service implementation.

use crate::cache::{cache_keys, BestEffortCache};
use crate::dto::{UnitDetailResponse, UnitSummary};
use crate::listing::ResultAssembler;
use crate::listing_service::ListingService;
use crate::metrics::caches;
use crate::unit_service::UnitService;
use async_trait::async_trait;
use hearth_config::CacheConfig;
use hearth_core::{HearthError, HearthResult, UnitId};
use hearth_repository::UnitRepository;
use hearth_resilience::TimeoutPolicy;
use std::sync::Arc;
use tracing::{debug, info};

/// Unit detail and home page lists behind read-through caches.
pub struct UnitServiceImpl {
    units: Arc<dyn UnitRepository>,
    listings: Arc<dyn ListingService>,
    cache: BestEffortCache,
    assembler: ResultAssembler,
    config: CacheConfig,
    timeouts: TimeoutPolicy,
}

impl UnitServiceImpl {
    #[must_use]
    pub fn new(
        units: Arc<dyn UnitRepository>,
        listings: Arc<dyn ListingService>,
        cache: BestEffortCache,
        assembler: ResultAssembler,
        config: CacheConfig,
        timeouts: TimeoutPolicy,
    ) -> Self {
        Self {
            units,
            listings,
            cache,
            assembler,
            config,
            timeouts,
        }
    }
}

#[async_trait]
impl UnitService for UnitServiceImpl {
    async fn get_unit_detail(&self, id: UnitId) -> HearthResult<UnitDetailResponse> {
        let key = cache_keys::unit_detail(id);
        if let Some(detail) = self.cache.get(caches::UNIT_DETAIL, &key).await {
            return Ok(detail);
        }

        debug!("Loading unit detail: {}", id);
        let detail = self
            .timeouts
            .repository("units.find_detail", self.units.find_detail(id))
            .await?
            .ok_or_else(|| HearthError::not_found("Unit", id))?;
        let detail = self.assembler.detail(detail)?;

        self.cache
            .put(caches::UNIT_DETAIL, &key, &detail, self.config.unit_detail_ttl())
            .await;
        Ok(detail)
    }

    async fn featured_units(&self) -> HearthResult<Vec<UnitSummary>> {
        let key = cache_keys::home_page();
        if let Some(units) = self.cache.get(caches::HOME_PAGE, &key).await {
            return Ok(units);
        }

        debug!("Loading {} featured units", self.config.home_page_max_units);
        let units = self
            .timeouts
            .repository(
                "units.find_most_booked",
                self.units.find_most_booked(self.config.home_page_max_units),
            )
            .await?;
        let units = self.assembler.summarize(units)?;

        self.cache
            .put(caches::HOME_PAGE, &key, &units, self.config.home_page_ttl())
            .await;
        Ok(units)
    }

    async fn invalidate_unit(&self, id: UnitId) -> u64 {
        let detail = self
            .cache
            .invalidate(caches::UNIT_DETAIL, &cache_keys::unit_detail(id))
            .await;
        let listings = self.listings.invalidate_listings().await;

        info!(unit_id = %id, removed = detail + listings, "Unit cache invalidated");
        detail + listings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheInterface, MemoryCache};
    use crate::dto::{SearchQuery, SearchResult};
    use chrono::{TimeZone, Utc};
    use hearth_core::{AreaId, Page};
    use hearth_domain::{Unit, UnitDetail};
    use hearth_repository::UnitQuery;
    use mockall::mock;

    mock! {
        Units {}

        #[async_trait]
        impl UnitRepository for Units {
            async fn find_by_filter(&self, query: &UnitQuery) -> HearthResult<Page<Unit>>;
            async fn find_detail(&self, id: UnitId) -> HearthResult<Option<UnitDetail>>;
            async fn find_most_booked(&self, limit: u32) -> HearthResult<Vec<Unit>>;
        }
    }

    mock! {
        Listings {}

        #[async_trait]
        impl ListingService for Listings {
            async fn search(&self, query: SearchQuery) -> HearthResult<SearchResult>;
            async fn invalidate_listings(&self) -> u64;
        }
    }

    fn unit(id: i64, booking_count: u32) -> Unit {
        Unit {
            id: UnitId::new(id),
            owner_id: 1,
            area_id: AreaId::new(5),
            area_name: Some("Harbour".to_string()),
            title: format!("unit {}", id),
            price: 10_000,
            address: String::new(),
            room_count: 1,
            acreage: 20,
            layout: String::new(),
            capacity: 2,
            beds: String::new(),
            deposit: 0,
            min_days: 1,
            max_days: 0,
            booking_count,
            index_image_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn service(units: MockUnits, listings: MockListings, backend: Arc<MemoryCache>) -> UnitServiceImpl {
        UnitServiceImpl::new(
            Arc::new(units),
            Arc::new(listings),
            BestEffortCache::new(backend, TimeoutPolicy::default()),
            ResultAssembler::new("http://img/"),
            CacheConfig::default(),
            TimeoutPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_detail_fetched_once_then_cached() {
        let mut units = MockUnits::new();
        units
            .expect_find_detail()
            .withf(|id| *id == UnitId::new(7))
            .times(1)
            .returning(|id| {
                Ok(Some(UnitDetail {
                    unit: unit(id.into_inner(), 0),
                    image_urls: vec!["a.jpg".to_string()],
                    facility_ids: vec![2],
                }))
            });
        let service = service(units, MockListings::new(), Arc::new(MemoryCache::new(16)));

        let first = service.get_unit_detail(UnitId::new(7)).await.unwrap();
        let second = service.get_unit_detail(UnitId::new(7)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.image_urls, vec!["http://img/a.jpg"]);
    }

    #[tokio::test]
    async fn test_unknown_unit_is_not_found_and_not_cached() {
        let mut units = MockUnits::new();
        units.expect_find_detail().times(2).returning(|_| Ok(None));
        let backend = Arc::new(MemoryCache::new(16));
        let service = service(units, MockListings::new(), Arc::clone(&backend));

        for _ in 0..2 {
            let err = service.get_unit_detail(UnitId::new(404)).await.unwrap_err();
            assert!(matches!(err, HearthError::NotFound { .. }));
        }
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_featured_units_use_configured_limit() {
        let mut units = MockUnits::new();
        units
            .expect_find_most_booked()
            .withf(|limit| *limit == 5)
            .times(1)
            .returning(|_| Ok(vec![unit(2, 9), unit(1, 4)]));
        let service = service(units, MockListings::new(), Arc::new(MemoryCache::new(16)));

        let featured = service.featured_units().await.unwrap();
        let again = service.featured_units().await.unwrap();
        assert_eq!(featured, again);
        assert_eq!(featured[0].unit_id, UnitId::new(2));
    }

    #[tokio::test]
    async fn test_invalidate_unit_clears_detail_and_listings() {
        let mut units = MockUnits::new();
        units
            .expect_find_detail()
            .times(2)
            .returning(|id| {
                Ok(Some(UnitDetail {
                    unit: unit(id.into_inner(), 0),
                    image_urls: Vec::new(),
                    facility_ids: Vec::new(),
                }))
            });
        let mut listings = MockListings::new();
        listings.expect_invalidate_listings().times(1).returning(|| 3);
        let backend = Arc::new(MemoryCache::new(16));
        let service = service(units, listings, Arc::clone(&backend));

        service.get_unit_detail(UnitId::new(7)).await.unwrap();
        assert_eq!(service.invalidate_unit(UnitId::new(7)).await, 4);
        service.get_unit_detail(UnitId::new(7)).await.unwrap();
    }

    #[tokio::test]
    async fn test_detail_payload_lands_under_unit_key() {
        let backend = Arc::new(MemoryCache::new(16));
        let mut units = MockUnits::new();
        units.expect_find_detail().times(1).returning(|id| {
            Ok(Some(UnitDetail {
                unit: unit(id.into_inner(), 0),
                image_urls: Vec::new(),
                facility_ids: Vec::new(),
            }))
        });
        let service = service(units, MockListings::new(), Arc::clone(&backend));
        service.get_unit_detail(UnitId::new(1)).await.unwrap();

        assert!(backend
            .get_raw(&cache_keys::unit_detail(UnitId::new(1)))
            .await
            .unwrap()
            .is_some());
        // A second read would panic on the mock if it reached the repository.
        service.get_unit_detail(UnitId::new(1)).await.unwrap();
    }
}
