//! Cache interface trait for abstracted caching operations.

use super::codec;
use async_trait::async_trait;
use hearth_core::HearthResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Key-value cache with plain string entries and hash entries.
///
/// Values are opaque strings so the trait stays dyn-compatible; typed access
/// goes through [`CacheExt`].
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// Get a plain value. `None` if the key is absent or expired.
    async fn get_raw(&self, key: &str) -> HearthResult<Option<String>>;

    /// Set a plain value with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> HearthResult<()>;

    /// Get one field of a hash entry.
    async fn hget_raw(&self, key: &str, field: &str) -> HearthResult<Option<String>>;

    /// Set one field of a hash entry and (re)arm the TTL of the whole entry,
    /// as a single atomic step.
    async fn hset_raw_with_ttl(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl: Duration,
    ) -> HearthResult<()>;

    /// Delete a key. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> HearthResult<bool>;

    /// Delete every key matching a glob pattern. Returns the number deleted.
    async fn delete_pattern(&self, pattern: &str) -> HearthResult<u64>;

    /// Round-trip to the backend.
    async fn ping(&self) -> HearthResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Typed access over [`CacheInterface`] using the versioned payload codec.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed plain value.
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> HearthResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(raw) => codec::decode(key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Set a typed plain value.
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> HearthResult<()> {
        let raw = codec::encode(value)?;
        self.set_raw(key, &raw, ttl).await
    }

    /// Get a typed hash field.
    async fn hget<T: DeserializeOwned + Send>(&self, key: &str, field: &str) -> HearthResult<Option<T>> {
        match self.hget_raw(key, field).await? {
            Some(raw) => codec::decode(key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Set a typed hash field, re-arming the entry TTL.
    async fn hset<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        field: &str,
        value: &T,
        ttl: Duration,
    ) -> HearthResult<()> {
        let raw = codec::encode(value)?;
        self.hset_raw_with_ttl(key, field, &raw, ttl).await
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
