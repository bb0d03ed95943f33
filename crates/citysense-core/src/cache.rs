//! Short-lived cache of the distinct-area list.
//!
//! The area list only feeds the selection UI and changes rarely, so it is
//! kept for a bounded time. The cache is process-scoped: construct one at
//! startup, pass it where needed, and call [`AreaCache::invalidate`] after
//! any write that could introduce a new area.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use citysense_store::RecordStore;
use tracing::debug;

use crate::error::Result;

/// Default time an area list stays valid.
pub const DEFAULT_AREA_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
    areas: Vec<String>,
    loaded_at: Instant,
}

/// Single-entry, time-bounded cache of [`RecordStore::distinct_areas`].
#[derive(Debug)]
pub struct AreaCache {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl Default for AreaCache {
    fn default() -> Self {
        Self::new(DEFAULT_AREA_TTL)
    }
}

impl AreaCache {
    /// Create an empty cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Validity window of a loaded list.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The sorted distinct areas, loaded from `store` on a miss or expiry.
    ///
    /// A failed load leaves the cache empty and returns the store error.
    pub fn areas<S: RecordStore + ?Sized>(&self, store: &S) -> Result<Vec<String>> {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        if let Some(cached) = entry.as_ref() {
            if now.duration_since(cached.loaded_at) < self.ttl {
                debug!("Area cache hit ({} areas)", cached.areas.len());
                return Ok(cached.areas.clone());
            }
        }

        debug!("Area cache miss, loading distinct areas");
        *entry = None;
        let areas = store.distinct_areas()?;
        *entry = Some(CacheEntry {
            areas: areas.clone(),
            loaded_at: now,
        });

        Ok(areas)
    }

    /// Drop the cached list so the next call reloads it.
    pub fn invalidate(&self) {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        if entry.take().is_some() {
            debug!("Area cache invalidated");
        }
    }

    /// Whether a list is currently held and unexpired.
    pub fn is_fresh(&self) -> bool {
        let entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        entry
            .as_ref()
            .is_some_and(|cached| cached.loaded_at.elapsed() < self.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use citysense_store::{
        GroupRow, Grouping, MemoryStore, Projection, ReadingFilter, Result as StoreResult,
    };
    use citysense_types::SensorReading;

    /// Wraps a store and counts `distinct_areas` calls.
    struct CountingStore {
        inner: MemoryStore,
        loads: Cell<usize>,
    }

    impl RecordStore for CountingStore {
        fn run_grouping(&self, f: &ReadingFilter, g: &Grouping) -> StoreResult<Vec<GroupRow>> {
            self.inner.run_grouping(f, g)
        }

        fn run_projection(
            &self,
            f: &ReadingFilter,
            p: &Projection,
        ) -> StoreResult<Vec<SensorReading>> {
            self.inner.run_projection(f, p)
        }

        fn run_count(&self, f: &ReadingFilter) -> StoreResult<u64> {
            self.inner.run_count(f)
        }

        fn distinct_areas(&self) -> StoreResult<Vec<String>> {
            self.loads.set(self.loads.get() + 1);
            self.inner.distinct_areas()
        }
    }

    fn counting(areas: &[&str]) -> CountingStore {
        CountingStore {
            inner: areas
                .iter()
                .map(|a| SensorReading::new("s", *a, "2024-05-01T08:00", 0, 0, 0))
                .collect(),
            loads: Cell::new(0),
        }
    }

    #[test]
    fn test_second_call_within_ttl_is_served_from_cache() {
        let store = counting(&["B", "A"]);
        let cache = AreaCache::new(Duration::from_secs(60));

        assert_eq!(cache.areas(&store).unwrap(), vec!["A", "B"]);
        assert_eq!(cache.areas(&store).unwrap(), vec!["A", "B"]);
        assert_eq!(store.loads.get(), 1);
        assert!(cache.is_fresh());
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let mut store = counting(&["A"]);
        let cache = AreaCache::default();

        assert_eq!(cache.areas(&store).unwrap(), vec!["A"]);
        store
            .inner
            .insert(SensorReading::new("s", "New Area", "2024-05-01T08:00", 0, 0, 0));

        // Stale until invalidated.
        assert_eq!(cache.areas(&store).unwrap(), vec!["A"]);

        cache.invalidate();
        assert!(!cache.is_fresh());
        assert_eq!(cache.areas(&store).unwrap(), vec!["A", "New Area"]);
        assert_eq!(store.loads.get(), 2);
    }

    #[test]
    fn test_zero_ttl_always_reloads() {
        let store = counting(&["A"]);
        let cache = AreaCache::new(Duration::ZERO);

        cache.areas(&store).unwrap();
        cache.areas(&store).unwrap();
        assert_eq!(store.loads.get(), 2);
        assert!(!cache.is_fresh());
    }

    #[test]
    fn test_default_ttl() {
        assert_eq!(AreaCache::default().ttl(), Duration::from_secs(60));
    }
}
