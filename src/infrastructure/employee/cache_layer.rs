//! Read-through / write-through cache in front of the employee store
//!
//! Entries are keyed `employee:{id}` and never expire. Mutations hold the
//! per-id lock across their store operation and cache update, and read misses
//! hold it across their store read and cache fill, so a fill can never put a
//! value older than the store's current record into the cache.
//!
//! When a cache update fails and the stale entry cannot be evicted either, the
//! layer becomes degraded: reads skip the cache until a full clear succeeds.

use std::collections::hash_map::DefaultHasher;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::domain::cache::{Cache, CacheExt};
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_cache_bypass, record_cache_failure, record_cache_hit, record_cache_miss,
};

const KEY_PREFIX: &str = "employee";
const LOCK_STRIPES: usize = 64;

/// Default wait between recovery attempts while degraded
pub const DEFAULT_RECOVERY_INTERVAL: Duration = Duration::from_secs(5);

/// Cache key for an employee id
pub fn cache_key(id: &EmployeeId) -> String {
    format!("{}:{}", KEY_PREFIX, id)
}

/// Health of the cache as seen by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Healthy,
    Degraded,
    Disabled,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Outcome of a single cache lookup
enum Lookup {
    Hit(Employee),
    Miss,
    /// The backend failed; the read must go to the store
    Unavailable,
}

/// Consistent cache layer for employee records
#[derive(Debug)]
pub struct EmployeeCacheLayer {
    backend: Option<Arc<dyn Cache>>,
    locks: Vec<AsyncMutex<()>>,
    /// Count of cache updates that may have left a stale entry behind
    failures: AtomicU64,
    /// Highest failure count wiped out by a successful clear
    recovered: AtomicU64,
    recovery_interval: Duration,
    last_recovery_attempt: Mutex<Option<Instant>>,
}

impl EmployeeCacheLayer {
    /// Layer over a cache backend
    pub fn new(backend: Arc<dyn Cache>) -> Self {
        Self::build(Some(backend))
    }

    /// Layer over a backend that may hold entries this process never wrote,
    /// such as a shared server that outlived an earlier run
    ///
    /// The backend is cleared before first use. When that clear fails the
    /// layer starts degraded and retries on later reads.
    pub async fn start(backend: Arc<dyn Cache>, recovery_interval: Duration) -> Self {
        let layer = Self::build(Some(backend.clone())).with_recovery_interval(recovery_interval);
        layer.failures.store(1, Ordering::SeqCst);

        if !layer.try_recover(&backend).await {
            warn!("Could not clear employee cache at startup, reads go to the store");
        }

        layer
    }

    /// Layer that always reads straight from the store
    pub fn disabled() -> Self {
        Self::build(None)
    }

    fn build(backend: Option<Arc<dyn Cache>>) -> Self {
        Self {
            backend,
            locks: (0..LOCK_STRIPES).map(|_| AsyncMutex::new(())).collect(),
            failures: AtomicU64::new(0),
            recovered: AtomicU64::new(0),
            recovery_interval: DEFAULT_RECOVERY_INTERVAL,
            last_recovery_attempt: Mutex::new(None),
        }
    }

    pub fn with_recovery_interval(mut self, interval: Duration) -> Self {
        self.recovery_interval = interval;
        self
    }

    pub fn status(&self) -> CacheStatus {
        if self.backend.is_none() {
            CacheStatus::Disabled
        } else if self.is_degraded() {
            CacheStatus::Degraded
        } else {
            CacheStatus::Healthy
        }
    }

    /// Serialize work on one employee id
    ///
    /// Ids share one of a fixed set of locks, so unrelated ids may
    /// occasionally wait on each other.
    pub async fn lock(&self, id: &EmployeeId) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        let stripe = (hasher.finish() as usize) % self.locks.len();
        self.locks[stripe].lock().await
    }

    /// Return the cached record for `id`, or load it from the store and fill
    ///
    /// An absent record is never cached.
    pub async fn read<F, Fut>(&self, id: &EmployeeId, load: F) -> Result<Option<Employee>, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Employee>, DomainError>>,
    {
        let Some(cache) = self.active_backend().await else {
            record_cache_bypass();
            return load().await;
        };

        let key = cache_key(id);

        match self.lookup(cache, &key).await {
            Lookup::Hit(employee) => return Ok(Some(employee)),
            Lookup::Unavailable => return load().await,
            Lookup::Miss => {}
        }

        let _guard = self.lock(id).await;

        // A writer may have filled the entry while we waited
        match self.lookup(cache, &key).await {
            Lookup::Hit(employee) => return Ok(Some(employee)),
            Lookup::Unavailable => return load().await,
            Lookup::Miss => {}
        }

        record_cache_miss();
        let loaded = load().await?;

        if let Some(employee) = &loaded {
            if let Err(e) = cache.set(&key, employee).await {
                warn!(key = %key, error = %e, "Failed to fill employee cache entry");
                self.evict_or_degrade(cache, &key).await;
            }
        }

        Ok(loaded)
    }

    /// Store the updated record after a successful store update
    pub async fn write(&self, id: &EmployeeId, employee: &Employee) {
        let Some(cache) = &self.backend else {
            return;
        };
        let key = cache_key(id);

        match cache.set(&key, employee).await {
            Ok(()) => debug!(key = %key, "Wrote employee cache entry"),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to write employee cache entry");
                self.evict_or_degrade(cache, &key).await;
            }
        }
    }

    /// Drop the entry for `id` after a delete
    pub async fn invalidate(&self, id: &EmployeeId) {
        let Some(cache) = &self.backend else {
            return;
        };
        let key = cache_key(id);

        match cache.delete(&key).await {
            Ok(removed) => debug!(key = %key, removed = removed, "Invalidated employee cache entry"),
            Err(e) => {
                error!(key = %key, error = %e, "Failed to invalidate employee cache entry");
                self.mark_degraded();
            }
        }
    }

    async fn lookup(&self, cache: &Arc<dyn Cache>, key: &str) -> Lookup {
        match cache.get::<Employee>(key).await {
            Ok(Some(employee)) => {
                record_cache_hit();
                Lookup::Hit(employee)
            }
            Ok(None) => Lookup::Miss,
            Err(e) => {
                warn!(key = %key, error = %e, "Employee cache read failed, using store");
                record_cache_bypass();
                Lookup::Unavailable
            }
        }
    }

    async fn evict_or_degrade(&self, cache: &Arc<dyn Cache>, key: &str) {
        if let Err(e) = cache.delete(key).await {
            error!(key = %key, error = %e, "Failed to evict employee cache entry");
            self.mark_degraded();
        }
    }

    fn mark_degraded(&self) {
        record_cache_failure();
        let failures = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
        warn!(failures = failures, "Employee cache degraded, reads go to the store");
    }

    fn is_degraded(&self) -> bool {
        self.failures.load(Ordering::SeqCst) > self.recovered.load(Ordering::SeqCst)
    }

    /// The backend if reads may use it, attempting recovery when degraded
    async fn active_backend(&self) -> Option<&Arc<dyn Cache>> {
        let cache = self.backend.as_ref()?;

        if !self.is_degraded() || self.try_recover(cache).await {
            Some(cache)
        } else {
            None
        }
    }

    async fn try_recover(&self, cache: &Arc<dyn Cache>) -> bool {
        {
            let Ok(mut last) = self.last_recovery_attempt.lock() else {
                return false;
            };
            if last.is_some_and(|at| at.elapsed() < self.recovery_interval) {
                return false;
            }
            *last = Some(Instant::now());
        }

        // Failures recorded after this point are not covered by the clear
        let seen = self.failures.load(Ordering::SeqCst);

        match cache.clear().await {
            Ok(()) => {
                self.recovered.fetch_max(seen, Ordering::SeqCst);
                let recovered = !self.is_degraded();
                if recovered {
                    info!("Employee cache cleared and back in use");
                }
                recovered
            }
            Err(e) => {
                debug!(error = %e, "Employee cache still unavailable");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use crate::domain::employee::EmployeeDraft;

    fn id(value: &str) -> EmployeeId {
        EmployeeId::new(value).unwrap()
    }

    fn employee(value: &str, address: &str) -> Employee {
        Employee::from_draft(id(value), EmployeeDraft::new("Ann", address, "Y", "Eng"))
    }

    fn layer(cache: &Arc<MockCache>) -> EmployeeCacheLayer {
        let backend: Arc<dyn Cache> = cache.clone();
        EmployeeCacheLayer::new(backend).with_recovery_interval(Duration::ZERO)
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key(&id("11111")), "employee:11111");
    }

    #[tokio::test]
    async fn test_miss_loads_and_fills() {
        let cache = Arc::new(MockCache::new());
        let layer = layer(&cache);
        let record = employee("11111", "X");

        let loaded = layer
            .read(&id("11111"), || async { Ok(Some(record.clone())) })
            .await
            .unwrap();

        assert_eq!(loaded, Some(record.clone()));
        let cached: Option<Employee> = cache.get("employee:11111").await.unwrap();
        assert_eq!(cached, Some(record));
    }

    #[tokio::test]
    async fn test_hit_skips_the_store() {
        let record = employee("11111", "X");
        let cache = Arc::new(MockCache::new().with_entry("employee:11111", &record));
        let layer = layer(&cache);

        let loaded = layer
            .read(&id("11111"), || async {
                Err(DomainError::internal("store must not be read on a hit"))
            })
            .await
            .unwrap();

        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn test_absence_is_not_cached() {
        let cache = Arc::new(MockCache::new());
        let layer = layer(&cache);

        let loaded = layer.read(&id("11111"), || async { Ok(None) }).await.unwrap();

        assert!(loaded.is_none());
        assert!(!cache.contains("employee:11111"));
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let cache = Arc::new(MockCache::new());
        let layer = layer(&cache);

        let result = layer
            .read(&id("11111"), || async {
                Err(DomainError::storage("disk on fire"))
            })
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_write_replaces_entry() {
        let cache = Arc::new(MockCache::new().with_entry("employee:11111", &employee("11111", "X")));
        let layer = layer(&cache);
        let updated = employee("11111", "Z");

        layer.write(&id("11111"), &updated).await;

        let cached: Option<Employee> = cache.get("employee:11111").await.unwrap();
        assert_eq!(cached, Some(updated));
        assert_eq!(layer.status(), CacheStatus::Healthy);
    }

    #[tokio::test]
    async fn test_failed_write_evicts_stale_entry() {
        let cache = Arc::new(MockCache::new().with_entry("employee:11111", &employee("11111", "X")));
        let layer = layer(&cache);

        cache.set_failing_writes(true);
        layer.write(&id("11111"), &employee("11111", "Z")).await;

        assert!(!cache.contains("employee:11111"));
        assert_eq!(layer.status(), CacheStatus::Healthy);
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = Arc::new(MockCache::new().with_entry("employee:11111", &employee("11111", "X")));
        let layer = layer(&cache);

        layer.invalidate(&id("11111")).await;

        assert!(!cache.contains("employee:11111"));
    }

    #[tokio::test]
    async fn test_read_bypasses_failing_backend() {
        let cache = Arc::new(MockCache::new());
        let layer = layer(&cache);
        let record = employee("11111", "X");

        cache.set_failing(true);
        let loaded = layer
            .read(&id("11111"), || async { Ok(Some(record.clone())) })
            .await
            .unwrap();

        assert_eq!(loaded, Some(record));
        assert_eq!(layer.status(), CacheStatus::Healthy);
    }

    #[tokio::test]
    async fn test_failed_invalidate_degrades_until_clear_succeeds() {
        let stale = employee("11111", "X");
        let cache = Arc::new(MockCache::new().with_entry("employee:11111", &stale));
        let layer = layer(&cache);

        cache.set_failing(true);
        layer.invalidate(&id("11111")).await;
        assert_eq!(layer.status(), CacheStatus::Degraded);

        // Backend is reachable again but still holds the stale entry
        cache.set_failing(false);
        let loaded = layer.read(&id("11111"), || async { Ok(None) }).await.unwrap();

        assert!(loaded.is_none());
        assert!(!cache.contains("employee:11111"));
        assert_eq!(layer.status(), CacheStatus::Healthy);
    }

    #[tokio::test]
    async fn test_degraded_reads_go_to_store_while_backend_is_down() {
        let cache = Arc::new(MockCache::new());
        let layer = layer(&cache);
        let current = employee("11111", "Z");

        cache.set_failing(true);
        layer.write(&id("11111"), &employee("11111", "Y")).await;
        assert_eq!(layer.status(), CacheStatus::Degraded);

        let gets_before = cache.get_calls();
        let loaded = layer
            .read(&id("11111"), || async { Ok(Some(current.clone())) })
            .await
            .unwrap();

        assert_eq!(loaded, Some(current));
        assert_eq!(cache.get_calls(), gets_before);
        assert_eq!(layer.status(), CacheStatus::Degraded);
    }

    #[tokio::test]
    async fn test_start_clears_entries_left_by_earlier_run() {
        let cache = Arc::new(MockCache::new().with_entry("employee:11111", &employee("11111", "X")));
        let backend: Arc<dyn Cache> = cache.clone();

        let layer = EmployeeCacheLayer::start(backend, Duration::ZERO).await;

        assert!(!cache.contains("employee:11111"));
        assert_eq!(layer.status(), CacheStatus::Healthy);

        let loaded = layer.read(&id("11111"), || async { Ok(None) }).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_start_with_unreachable_backend_waits_for_clear() {
        let leftover = employee("11111", "X");
        let cache = Arc::new(MockCache::new().with_entry("employee:11111", &leftover));
        cache.set_failing(true);
        let backend: Arc<dyn Cache> = cache.clone();

        let layer = EmployeeCacheLayer::start(backend, Duration::ZERO).await;
        assert_eq!(layer.status(), CacheStatus::Degraded);

        // Reachable again, but the old entry must not be served
        cache.set_failing(false);
        let loaded = layer.read(&id("11111"), || async { Ok(None) }).await.unwrap();

        assert!(loaded.is_none());
        assert!(!cache.contains("employee:11111"));
        assert_eq!(layer.status(), CacheStatus::Healthy);
    }

    #[tokio::test]
    async fn test_disabled_layer_always_loads() {
        let layer = EmployeeCacheLayer::disabled();
        let record = employee("11111", "X");

        layer.write(&id("11111"), &record).await;
        layer.invalidate(&id("11111")).await;

        let loaded = layer
            .read(&id("11111"), || async { Ok(Some(record.clone())) })
            .await
            .unwrap();

        assert_eq!(loaded, Some(record));
        assert_eq!(layer.status(), CacheStatus::Disabled);
    }

    #[tokio::test]
    async fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(CacheStatus::Degraded).unwrap(),
            serde_json::json!("degraded")
        );
        assert_eq!(CacheStatus::Healthy.to_string(), "healthy");
    }
}
