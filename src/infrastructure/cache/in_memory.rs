//! Process-local cache backed by moka

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Bounded moka cache with no time-based expiry.
///
/// An entry only leaves when it is deleted, cleared or pushed out by the
/// capacity bound, and a pushed-out entry just turns the next read into a miss.
#[derive(Debug)]
pub struct InMemoryCache {
    entries: MokaCache<String, String>,
    max_capacity: u64,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            entries: MokaCache::builder().max_capacity(max_capacity).build(),
            max_capacity,
        }
    }

    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.get(key).await)
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.entries.remove(key).await.is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.entries.contains_key(key))
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
        Ok(())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.entries.run_pending_tasks().await;
        Ok(self.entries.entry_count() as usize)
    }
}
