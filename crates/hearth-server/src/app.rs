//! Application wiring.
//!
//! Builds the repositories, the cache backend and the three read services
//! from an [`AppConfig`], and passes every handle explicitly.

use hearth_config::AppConfig;
use hearth_core::HearthResult;
use hearth_repository::{
    AreaRepository, BookingRepository, DatabasePool, MySqlAreaRepository, MySqlBookingRepository,
    MySqlUnitRepository, UnitRepository,
};
use hearth_resilience::TimeoutPolicy;
use hearth_service::listing::ResultAssembler;
use hearth_service::metrics::register_metrics;
use hearth_service::{
    create_redis_pool, AreaService, AreaServiceImpl, BestEffortCache, CacheInterface,
    ListingCache, ListingService, MemoryCache, RedisCacheService, UnitService, UnitServiceImpl,
};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Repository handles the services read from.
#[derive(Clone)]
pub struct Repositories {
    pub units: Arc<dyn UnitRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub areas: Arc<dyn AreaRepository>,
}

impl Repositories {
    /// MySQL repositories sharing one pool.
    #[must_use]
    pub fn mysql(pool: &Arc<DatabasePool>) -> Self {
        Self {
            units: Arc::new(MySqlUnitRepository::new(pool.clone())),
            bookings: Arc::new(MySqlBookingRepository::new(pool.clone())),
            areas: Arc::new(MySqlAreaRepository::new(pool.clone())),
        }
    }
}

/// Picks the cache backend: Redis when enabled, otherwise the in-process cache.
pub fn build_cache(config: &AppConfig) -> HearthResult<Arc<dyn CacheInterface>> {
    if config.redis.enabled {
        let pool = create_redis_pool(&config.redis)?;
        info!(pool_size = config.redis.pool_size, "Using Redis cache backend");
        Ok(Arc::new(RedisCacheService::new(Arc::new(pool))))
    } else {
        info!(max_entries = config.cache.max_entries, "Redis disabled, using in-process cache");
        Ok(Arc::new(MemoryCache::new(config.cache.max_entries)))
    }
}

/// Application builder.
///
/// Anything not supplied explicitly is built from the configuration.
pub struct AppBuilder {
    config: AppConfig,
    repositories: Option<Repositories>,
    cache: Option<Arc<dyn CacheInterface>>,
}

impl AppBuilder {
    /// Creates a builder for the given configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            repositories: None,
            cache: None,
        }
    }

    /// Uses these repositories instead of connecting to MySQL.
    #[must_use]
    pub fn with_repositories(mut self, repositories: Repositories) -> Self {
        self.repositories = Some(repositories);
        self
    }

    /// Uses this cache backend instead of the configured one.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn CacheInterface>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Connects what needs connecting and wires the services.
    pub async fn build(self) -> HearthResult<Services> {
        let config = self.config;

        if config.observability.metrics_enabled {
            register_metrics();
        }

        let timeouts = TimeoutPolicy::new(config.timeouts.repository(), config.timeouts.cache());

        let backend = match self.cache {
            Some(cache) => cache,
            None => build_cache(&config)?,
        };
        let cache = BestEffortCache::new(backend, timeouts);

        let (repositories, database) = match self.repositories {
            Some(repositories) => (repositories, None),
            None => {
                let pool = hearth_repository::create_pool(&config.database).await?;
                (Repositories::mysql(&pool), Some(pool))
            }
        };

        let listings: Arc<dyn ListingService> = Arc::new(ListingCache::new(
            repositories.units.clone(),
            repositories.bookings.clone(),
            cache.clone(),
            &config.listing,
            timeouts,
        ));

        let areas: Arc<dyn AreaService> = Arc::new(AreaServiceImpl::new(
            repositories.areas.clone(),
            cache.clone(),
            config.cache.areas_ttl(),
            timeouts,
        ));

        let units: Arc<dyn UnitService> = Arc::new(UnitServiceImpl::new(
            repositories.units.clone(),
            listings.clone(),
            cache.clone(),
            ResultAssembler::new(config.listing.image_url_prefix.clone()),
            config.cache.clone(),
            timeouts,
        ));

        info!("Services wired");

        Ok(Services {
            listings,
            areas,
            units,
            cache,
            database,
        })
    }
}

/// The wired read services.
pub struct Services {
    pub listings: Arc<dyn ListingService>,
    pub areas: Arc<dyn AreaService>,
    pub units: Arc<dyn UnitService>,
    cache: BestEffortCache,
    database: Option<Arc<DatabasePool>>,
}

/// State of one backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentHealth {
    Up,
    Down(String),
    /// Not configured for this process.
    Skipped,
}

impl ComponentHealth {
    fn from_result(result: HearthResult<()>) -> Self {
        match result {
            Ok(()) => Self::Up,
            Err(e) => Self::Down(e.to_string()),
        }
    }
}

impl fmt::Display for ComponentHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down(reason) => write!(f, "down ({})", reason),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result of [`Services::health_check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub database: ComponentHealth,
    pub cache: ComponentHealth,
}

impl HealthReport {
    /// The database must answer. A cache outage only degrades latency.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !matches!(self.database, ComponentHealth::Down(_))
    }
}

/// What a warm-up run loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupSummary {
    pub areas: usize,
    pub featured_units: usize,
}

impl Services {
    /// Pings the database and the cache.
    pub async fn health_check(&self) -> HealthReport {
        let database = match &self.database {
            Some(pool) => ComponentHealth::from_result(pool.health_check().await),
            None => ComponentHealth::Skipped,
        };

        let cache = if self.cache.backend().is_enabled() {
            ComponentHealth::from_result(self.cache.ping().await)
        } else {
            ComponentHealth::Skipped
        };

        if let ComponentHealth::Down(reason) = &cache {
            warn!(%reason, "Cache unreachable, reads will go to the database");
        }
        info!(database = %database, cache = %cache, "Health check finished");

        HealthReport { database, cache }
    }

    /// Loads the area list and the home page units so their cache entries exist.
    pub async fn warm_up(&self) -> HearthResult<WarmupSummary> {
        let areas = self.areas.list_areas().await?;
        let featured = self.units.featured_units().await?;

        let summary = WarmupSummary {
            areas: areas.len(),
            featured_units: featured.len(),
        };
        info!(areas = summary.areas, featured_units = summary.featured_units, "Caches warmed");
        Ok(summary)
    }

    /// Closes the database pool, if one was opened.
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.database {
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hearth_core::{AreaId, UnitId};
    use hearth_domain::{Area, Unit};
    use hearth_repository::memory::{
        InMemoryAreaRepository, InMemoryBookingRepository, InMemoryUnitRepository,
    };
    use hearth_service::SearchQuery;

    fn unit(id: i64, booking_count: u32) -> Unit {
        Unit {
            id: UnitId::new(id),
            owner_id: 1,
            area_id: AreaId::new(5),
            area_name: Some("Harbour".to_string()),
            title: format!("unit {}", id),
            price: 100,
            address: String::new(),
            room_count: 1,
            acreage: 30,
            layout: String::new(),
            capacity: 2,
            beds: String::new(),
            deposit: 0,
            min_days: 1,
            max_days: 0,
            booking_count,
            index_image_url: None,
            created_at: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
        }
    }

    struct Harness {
        units: Arc<InMemoryUnitRepository>,
        areas: Arc<InMemoryAreaRepository>,
        services: Services,
    }

    async fn harness(config: AppConfig) -> Harness {
        let units = Arc::new(InMemoryUnitRepository::with_units((1..=7).map(|id| unit(id, id as u32))));
        let areas = Arc::new(InMemoryAreaRepository::with_areas([Area {
            id: AreaId::new(5),
            name: "Harbour".to_string(),
        }]));
        let repositories = Repositories {
            units: units.clone(),
            bookings: Arc::new(InMemoryBookingRepository::new()),
            areas: areas.clone(),
        };
        let services = AppBuilder::new(config)
            .with_repositories(repositories)
            .with_cache(Arc::new(MemoryCache::new(64)))
            .build()
            .await
            .unwrap();
        Harness {
            units,
            areas,
            services,
        }
    }

    #[tokio::test]
    async fn test_warm_up_fills_area_and_home_caches() {
        let h = harness(AppConfig::default()).await;

        let summary = h.services.warm_up().await.unwrap();
        assert_eq!(
            summary,
            WarmupSummary {
                areas: 1,
                featured_units: 5
            }
        );

        h.services.areas.list_areas().await.unwrap();
        let featured = h.services.units.featured_units().await.unwrap();
        assert_eq!(featured[0].unit_id, UnitId::new(7));
        assert_eq!(h.areas.calls(), 1);
        assert_eq!(h.units.calls(), 1);
    }

    #[tokio::test]
    async fn test_services_share_one_cache() {
        let h = harness(AppConfig::default()).await;
        let query = SearchQuery::default();

        h.services.listings.search(query.clone()).await.unwrap();
        h.services.listings.search(query.clone()).await.unwrap();
        assert_eq!(h.units.calls(), 1);

        // Invalidating a unit drops the listing pages too.
        h.services.units.invalidate_unit(UnitId::new(3)).await;
        h.services.listings.search(query).await.unwrap();
        assert_eq!(h.units.calls(), 2);
    }

    #[tokio::test]
    async fn test_health_without_database() {
        let h = harness(AppConfig::default()).await;

        let report = h.services.health_check().await;
        assert_eq!(report.database, ComponentHealth::Skipped);
        assert_eq!(report.cache, ComponentHealth::Up);
        assert!(report.is_ready());
    }

    #[test]
    fn test_readiness_ignores_cache_outage() {
        let report = HealthReport {
            database: ComponentHealth::Up,
            cache: ComponentHealth::Down("refused".to_string()),
        };
        assert!(report.is_ready());

        let report = HealthReport {
            database: ComponentHealth::Down("refused".to_string()),
            cache: ComponentHealth::Up,
        };
        assert!(!report.is_ready());
    }

    #[test]
    fn test_build_cache_follows_redis_switch() {
        let mut config = AppConfig::default();
        config.redis.enabled = false;
        assert!(build_cache(&config).unwrap().is_enabled());

        // The Redis pool connects lazily, so no server is needed here.
        config.redis.enabled = true;
        config.redis.url = "redis://127.0.0.1:6379".to_string();
        assert!(build_cache(&config).unwrap().is_enabled());
    }

    #[test]
    fn test_component_health_display() {
        assert_eq!(ComponentHealth::Up.to_string(), "up");
        assert_eq!(ComponentHealth::Down("gone".to_string()).to_string(), "down (gone)");
        assert_eq!(ComponentHealth::Skipped.to_string(), "skipped");
    }
}
