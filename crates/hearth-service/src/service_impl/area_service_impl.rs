//! Area service implementation.

use crate::area_service::AreaService;
use crate::cache::{cache_keys, BestEffortCache};
use crate::dto::AreaInfo;
use crate::metrics::caches;
use async_trait::async_trait;
use hearth_core::HearthResult;
use hearth_repository::AreaRepository;
use hearth_resilience::TimeoutPolicy;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Area list behind a read-through cache.
pub struct AreaServiceImpl {
    areas: Arc<dyn AreaRepository>,
    cache: BestEffortCache,
    ttl: Duration,
    timeouts: TimeoutPolicy,
}

impl AreaServiceImpl {
    #[must_use]
    pub fn new(
        areas: Arc<dyn AreaRepository>,
        cache: BestEffortCache,
        ttl: Duration,
        timeouts: TimeoutPolicy,
    ) -> Self {
        Self {
            areas,
            cache,
            ttl,
            timeouts,
        }
    }
}

#[async_trait]
impl AreaService for AreaServiceImpl {
    async fn list_areas(&self) -> HearthResult<Vec<AreaInfo>> {
        let key = cache_keys::areas();
        if let Some(areas) = self.cache.get::<Vec<AreaInfo>>(caches::AREAS, &key).await {
            return Ok(areas);
        }

        debug!("Loading areas from repository");
        let areas: Vec<AreaInfo> = self
            .timeouts
            .repository("areas.find_all", self.areas.find_all())
            .await?
            .into_iter()
            .map(AreaInfo::from)
            .collect();

        self.cache.put(caches::AREAS, &key, &areas, self.ttl).await;
        Ok(areas)
    }
}
