//! Cache access that never fails the caller.

use super::{CacheExt, CacheInterface};
use crate::metrics::names;
use hearth_core::{HearthError, HearthResult};
use hearth_resilience::TimeoutPolicy;
use metrics::counter;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Wraps a [`CacheInterface`] with the degrade rules of the read path.
///
/// Reads that fail for any reason (backend error, timeout, corrupt payload)
/// come back as `None`, i.e. a miss. Writes and invalidations that fail are
/// logged and counted. Every call is bounded by the cache timeout.
#[derive(Clone)]
pub struct BestEffortCache {
    cache: Arc<dyn CacheInterface>,
    timeouts: TimeoutPolicy,
}

impl BestEffortCache {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, timeouts: TimeoutPolicy) -> Self {
        Self { cache, timeouts }
    }

    /// The wrapped backend.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn CacheInterface> {
        &self.cache
    }

    /// Reads a plain entry.
    pub async fn get<T>(&self, cache: &'static str, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        let result = self.timeouts.cache("cache.get", self.cache.get::<T>(key)).await;
        Self::observe(cache, key, result)
    }

    /// Reads one field of a hash entry.
    pub async fn hget<T>(&self, cache: &'static str, key: &str, field: &str) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        let result = self
            .timeouts
            .cache("cache.hget", self.cache.hget::<T>(key, field))
            .await;
        Self::observe(cache, key, result)
    }

    /// Writes a plain entry.
    pub async fn put<T>(&self, cache: &'static str, key: &str, value: &T, ttl: Duration)
    where
        T: Serialize + Send + Sync,
    {
        let result = self
            .timeouts
            .cache("cache.set", self.cache.set(key, value, ttl))
            .await;
        Self::observe_write(cache, key, result);
    }

    /// Writes one field of a hash entry and re-arms the entry TTL.
    pub async fn hput<T>(&self, cache: &'static str, key: &str, field: &str, value: &T, ttl: Duration)
    where
        T: Serialize + Send + Sync,
    {
        let result = self
            .timeouts
            .cache("cache.hset", self.cache.hset(key, field, value, ttl))
            .await;
        Self::observe_write(cache, key, result);
    }

    /// Deletes one key. Returns how many keys went away.
    pub async fn invalidate(&self, cache: &'static str, key: &str) -> u64 {
        let result = self
            .timeouts
            .cache("cache.delete", self.cache.delete(key))
            .await
            .map(u64::from);
        Self::observe_invalidation(cache, key, result)
    }

    /// Deletes every key matching `pattern`. Returns how many keys went away.
    pub async fn invalidate_pattern(&self, cache: &'static str, pattern: &str) -> u64 {
        let result = self
            .timeouts
            .cache("cache.delete_pattern", self.cache.delete_pattern(pattern))
            .await;
        Self::observe_invalidation(cache, pattern, result)
    }

    /// Backend round trip, bounded by the cache timeout. Errors are returned.
    pub async fn ping(&self) -> HearthResult<()> {
        self.timeouts.cache("cache.ping", self.cache.ping()).await
    }

    fn observe<T>(cache: &'static str, key: &str, result: HearthResult<Option<T>>) -> Option<T> {
        match result {
            Ok(Some(value)) => {
                debug!(cache, key, "Cache hit");
                counter!(names::CACHE_HITS_TOTAL, "cache" => cache).increment(1);
                Some(value)
            }
            Ok(None) => {
                debug!(cache, key, "Cache miss");
                counter!(names::CACHE_MISSES_TOTAL, "cache" => cache).increment(1);
                None
            }
            Err(e) => {
                let op = match &e {
                    HearthError::CorruptCacheEntry { .. } => "decode",
                    _ => "read",
                };
                warn!(cache, key, op, error = %e, "Cache read failed, treating as miss");
                counter!(names::CACHE_ERRORS_TOTAL, "cache" => cache, "op" => op).increment(1);
                counter!(names::CACHE_MISSES_TOTAL, "cache" => cache).increment(1);
                None
            }
        }
    }

    fn observe_write(cache: &'static str, key: &str, result: HearthResult<()>) {
        if let Err(e) = result {
            warn!(cache, key, error = %e, "Cache write failed, result still returned");
            counter!(names::CACHE_ERRORS_TOTAL, "cache" => cache, "op" => "write").increment(1);
        }
    }

    fn observe_invalidation(cache: &'static str, entry: &str, result: HearthResult<u64>) -> u64 {
        match result {
            Ok(removed) => {
                debug!(cache, entry, removed, "Cache invalidated");
                counter!(names::CACHE_INVALIDATIONS_TOTAL, "cache" => cache).increment(removed);
                removed
            }
            Err(e) => {
                warn!(cache, entry, error = %e, "Cache invalidation failed");
                counter!(names::CACHE_ERRORS_TOTAL, "cache" => cache, "op" => "invalidate")
                    .increment(1);
                0
            }
        }
    }
}
