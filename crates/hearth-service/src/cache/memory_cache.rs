//! In-process cache backend.
//!
//! Used when Redis is disabled and in tests. Holds at most `max_entries`
//! top-level keys; when a new key would exceed that, expired keys are purged
//! first and then the key closest to expiry (oldest write on ties) is evicted.

use super::CacheInterface;
use async_trait::async_trait;
use hearth_core::{HearthError, HearthResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
enum Value {
    Plain(String),
    Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Instant,
    written: u64,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Entry>,
    writes: u64,
}

impl State {
    fn live(&mut self, key: &str, now: Instant) -> Option<&mut Entry> {
        if self.entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            self.entries.remove(key);
        }
        self.entries.get_mut(key)
    }

    fn make_room(&mut self, key: &str, capacity: usize, now: Instant) {
        if self.entries.contains_key(key) || self.entries.len() < capacity {
            return;
        }

        self.entries.retain(|_, entry| entry.expires_at > now);

        while self.entries.len() >= capacity {
            let victim = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| (entry.expires_at, entry.written))
                .map(|(key, _)| key.clone());
            match victim {
                Some(victim) => {
                    debug!("Evicting cache key '{}'", victim);
                    self.entries.remove(&victim);
                }
                None => break,
            }
        }
    }

    fn next_write(&mut self) -> u64 {
        self.writes += 1;
        self.writes
    }
}

/// Bounded in-memory cache with per-key TTL.
#[derive(Debug)]
pub struct MemoryCache {
    state: Mutex<State>,
    max_entries: usize,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` keys (minimum 1).
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of keys currently held, expired ones included until touched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn wrong_type(key: &str) -> HearthError {
    HearthError::Cache(format!("Key '{}' holds a value of the wrong type", key))
}

/// Glob match supporting `*` and `?`, the subset the key patterns use.
fn glob_match(pattern: &str, text: &str) -> bool {
    let (p, t): (Vec<char>, Vec<char>) = (pattern.chars().collect(), text.chars().collect());
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((star_pi, star_ti)) = star {
            pi = star_pi + 1;
            ti = star_ti + 1;
            star = Some((star_pi, star_ti + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&c| c == '*')
}

#[async_trait]
impl CacheInterface for MemoryCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> HearthResult<Option<String>> {
        let mut state = self.state.lock();
        match state.live(key, Instant::now()) {
            Some(Entry { value: Value::Plain(value), .. }) => Ok(Some(value.clone())),
            Some(_) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> HearthResult<()> {
        let now = Instant::now();
        let mut state = self.state.lock();
        state.make_room(key, self.max_entries, now);
        let written = state.next_write();
        state.entries.insert(
            key.to_string(),
            Entry {
                value: Value::Plain(value.to_string()),
                expires_at: now + ttl,
                written,
            },
        );
        Ok(())
    }

    async fn hget_raw(&self, key: &str, field: &str) -> HearthResult<Option<String>> {
        let mut state = self.state.lock();
        match state.live(key, Instant::now()) {
            Some(Entry { value: Value::Hash(fields), .. }) => Ok(fields.get(field).cloned()),
            Some(_) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn hset_raw_with_ttl(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl: Duration,
    ) -> HearthResult<()> {
        let now = Instant::now();
        let mut state = self.state.lock();
        let written = state.next_write();

        if let Some(entry) = state.live(key, now) {
            let Value::Hash(fields) = &mut entry.value else {
                return Err(wrong_type(key));
            };
            fields.insert(field.to_string(), value.to_string());
            entry.expires_at = now + ttl;
            entry.written = written;
            return Ok(());
        }

        state.make_room(key, self.max_entries, now);
        state.entries.insert(
            key.to_string(),
            Entry {
                value: Value::Hash(HashMap::from([(field.to_string(), value.to_string())])),
                expires_at: now + ttl,
                written,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> HearthResult<bool> {
        let mut state = self.state.lock();
        let existed = state.live(key, Instant::now()).is_some();
        state.entries.remove(key);
        Ok(existed)
    }

    async fn delete_pattern(&self, pattern: &str) -> HearthResult<u64> {
        let now = Instant::now();
        let mut state = self.state.lock();
        let before = state.entries.len();
        let mut live_matches = 0u64;
        state.entries.retain(|key, entry| {
            if glob_match(pattern, key) {
                if entry.expires_at > now {
                    live_matches += 1;
                }
                false
            } else {
                true
            }
        });
        debug!(
            "Deleted {} keys matching pattern '{}'",
            before - state.entries.len(),
            pattern
        );
        Ok(live_matches)
    }

    async fn ping(&self) -> HearthResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_plain_entry_expires() {
        let cache = MemoryCache::new(10);
        cache.set_raw("k", "v", TTL).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(TTL).await;
        assert_eq!(cache.get_raw("k").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hash_write_rearms_whole_entry() {
        let cache = MemoryCache::new(10);
        cache.hset_raw_with_ttl("group", "1", "a", TTL).await.unwrap();

        tokio::time::advance(Duration::from_secs(40)).await;
        cache.hset_raw_with_ttl("group", "2", "b", TTL).await.unwrap();

        tokio::time::advance(Duration::from_secs(40)).await;
        assert_eq!(cache.hget_raw("group", "1").await.unwrap().as_deref(), Some("a"));
        assert_eq!(cache.hget_raw("group", "2").await.unwrap().as_deref(), Some("b"));
        assert_eq!(cache.hget_raw("group", "3").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_cache_error() {
        let cache = MemoryCache::new(10);
        cache.set_raw("k", "v", TTL).await.unwrap();
        assert!(matches!(
            cache.hget_raw("k", "1").await.unwrap_err(),
            HearthError::Cache(_)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cache_evicts_closest_to_expiry() {
        let cache = MemoryCache::new(2);
        cache.set_raw("long", "1", Duration::from_secs(600)).await.unwrap();
        cache.set_raw("short", "2", Duration::from_secs(30)).await.unwrap();
        cache.set_raw("new", "3", Duration::from_secs(300)).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_raw("short").await.unwrap(), None);
        assert!(cache.get_raw("long").await.unwrap().is_some());
        assert!(cache.get_raw("new").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_eviction_prefers_expired_keys() {
        let cache = MemoryCache::new(2);
        cache.set_raw("a", "1", Duration::from_secs(10)).await.unwrap();
        cache.set_raw("b", "2", Duration::from_secs(100)).await.unwrap();
        tokio::time::advance(Duration::from_secs(20)).await;

        cache.set_raw("c", "3", Duration::from_secs(50)).await.unwrap();
        assert!(cache.get_raw("b").await.unwrap().is_some());
        assert!(cache.get_raw("c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overwrite_does_not_evict() {
        let cache = MemoryCache::new(1);
        cache.set_raw("k", "1", TTL).await.unwrap();
        cache.set_raw("k", "2", TTL).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_delete_pattern() {
        let cache = MemoryCache::new(10);
        cache.hset_raw_with_ttl("hearth:cache:listing:a", "1", "x", TTL).await.unwrap();
        cache.hset_raw_with_ttl("hearth:cache:listing:b", "1", "x", TTL).await.unwrap();
        cache.set_raw("hearth:cache:areas", "x", TTL).await.unwrap();

        assert_eq!(cache.delete_pattern("hearth:cache:listing:*").await.unwrap(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.delete("hearth:cache:areas").await.unwrap());
        assert!(!cache.delete("hearth:cache:areas").await.unwrap());
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match("a:*", "a:b:c"));
        assert!(glob_match("a:?", "a:b"));
        assert!(glob_match("*", ""));
        assert!(glob_match("a*c", "abbbc"));
        assert!(!glob_match("a:*", "b:a"));
        assert!(!glob_match("a:?", "a:bc"));
    }
}
