//! Per-address serialisation of cache misses.

use crate::cache::CacheAddress;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

/// Lets one caller at a time compute a given cache address.
///
/// Callers that queue behind the holder re-check the cache once they get in,
/// so a burst of identical misses costs one repository round trip. Slots are
/// dropped as soon as nobody holds or waits on them.
#[derive(Debug, Default)]
pub struct MissCoalescer {
    slots: Mutex<HashMap<CacheAddress, Slot>>,
}

impl MissCoalescer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of `address`.
    pub async fn lock(&self, address: &CacheAddress) -> CoalesceGuard<'_> {
        let slot = Arc::clone(self.slots.lock().entry(address.clone()).or_default());
        let guard = slot.lock_owned().await;
        CoalesceGuard {
            coalescer: self,
            address: address.clone(),
            guard: Some(guard),
        }
    }

    /// Number of addresses currently held or waited on.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Exclusive use of one address; released on drop.
pub struct CoalesceGuard<'a> {
    coalescer: &'a MissCoalescer,
    address: CacheAddress,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for CoalesceGuard<'_> {
    fn drop(&mut self) {
        let mut slots = self.coalescer.slots.lock();
        // Release the async lock first so waiters can proceed.
        self.guard.take();
        if let Some(slot) = slots.get(&self.address) {
            if Arc::strong_count(slot) == 1 {
                slots.remove(&self.address);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn address(page: &str) -> CacheAddress {
        CacheAddress {
            coarse_key: "hearth:cache:listing::::new".to_string(),
            page_field: page.to_string(),
        }
    }

    #[tokio::test]
    async fn test_slot_removed_after_release() {
        let coalescer = MissCoalescer::new();
        {
            let _guard = coalescer.lock(&address("1")).await;
            assert_eq!(coalescer.in_flight(), 1);
        }
        assert_eq!(coalescer.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_distinct_addresses_do_not_block() {
        let coalescer = MissCoalescer::new();
        let _first = coalescer.lock(&address("1")).await;
        let _second = tokio::time::timeout(Duration::from_secs(1), coalescer.lock(&address("2")))
            .await
            .expect("different page should not wait");
        assert_eq!(coalescer.in_flight(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_address_is_exclusive() {
        let coalescer = Arc::new(MissCoalescer::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let coalescer = Arc::clone(&coalescer);
                let inside = Arc::clone(&inside);
                let peak = Arc::clone(&peak);
                tokio::spawn(async move {
                    let _guard = coalescer.lock(&address("1")).await;
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(coalescer.in_flight(), 0);
    }
}
