//! Caching infrastructure for the service layer.
//!
//! [`CacheInterface`] is the raw key-value contract with a Redis and an
//! in-process implementation. Services talk to it through [`BestEffortCache`],
//! which applies timeouts, the versioned payload codec and the rule that a
//! cache failure never reaches the caller.

mod best_effort;
mod cache_interface;
pub mod cache_keys;
pub mod codec;
mod memory_cache;
mod redis_cache;

pub use best_effort::BestEffortCache;
pub use cache_interface::{CacheExt, CacheInterface};
pub use cache_keys::CacheAddress;
pub use memory_cache::MemoryCache;
pub use redis_cache::{create_redis_pool, RedisCacheService};
