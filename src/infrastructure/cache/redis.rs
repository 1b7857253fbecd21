//! Redis cache shared by every service instance pointed at the same server

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::Cache;
use crate::domain::DomainError;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    pub url: String,
    /// Namespace for every key written by this service
    pub key_prefix: String,
    pub connection_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "employee-directory".to_string(),
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Narrow the key prefix to one process, so instances that each hold
    /// their own records never read each other's entries
    pub fn scoped_to(mut self, instance: &str) -> Self {
        self.key_prefix = prefixed(&self.key_prefix, instance);
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Entries are written with plain `SET` and carry no TTL. `clear` and `size`
/// only see keys under the configured prefix.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Connect, giving up after the configured timeout
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = tokio::time::timeout(
            config.connection_timeout,
            ConnectionManager::new(client),
        )
        .await
        .map_err(|_| {
            DomainError::cache(format!(
                "Timed out connecting to Redis after {:?}",
                config.connection_timeout
            ))
        })?
        .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    fn key(&self, key: &str) -> String {
        prefixed(&self.config.key_prefix, key)
    }

    /// Every key this service owns, gathered with cursor-based `SCAN`
    async fn owned_keys(&self) -> Result<Vec<String>, DomainError> {
        let pattern = self.key("*");
        let mut conn = self.connection.clone();
        let mut owned = Vec::new();
        let mut cursor = 0u64;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| failed("SCAN", &pattern, e))?;

            owned.extend(batch);
            if next == 0 {
                return Ok(owned);
            }
            cursor = next;
        }
    }
}

const SCAN_BATCH: usize = 500;

fn prefixed(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}:{}", prefix, key)
    }
}

fn failed(command: &str, key: &str, error: redis::RedisError) -> DomainError {
    DomainError::cache(format!("Redis {} on '{}' failed: {}", command, key, error))
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.connection.clone();
        conn.get(self.key(key))
            .await
            .map_err(|e| failed("GET", key, e))
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();
        conn.set::<_, _, ()>(self.key(key), value)
            .await
            .map_err(|e| failed("SET", key, e))
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();
        let removed: u32 = conn
            .del(self.key(key))
            .await
            .map_err(|e| failed("DEL", key, e))?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();
        conn.exists(self.key(key))
            .await
            .map_err(|e| failed("EXISTS", key, e))
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let keys = self.owned_keys().await?;
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection.clone();
        conn.del::<_, ()>(&keys)
            .await
            .map_err(|e| failed("DEL", &self.config.key_prefix, e))
    }

    async fn size(&self) -> Result<usize, DomainError> {
        Ok(self.owned_keys().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RedisCacheConfig::default();

        assert_eq!(config.url, "redis://127.0.0.1:6379");
        assert_eq!(config.key_prefix, "employee-directory");
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_builder() {
        let config = RedisCacheConfig::new("redis://cache:6379")
            .with_key_prefix("staff")
            .with_connection_timeout(Duration::from_secs(1));

        assert_eq!(config.url, "redis://cache:6379");
        assert_eq!(config.key_prefix, "staff");
        assert_eq!(config.connection_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_prefixed_keys() {
        assert_eq!(prefixed("staff", "employee:11111"), "staff:employee:11111");
        assert_eq!(prefixed("", "employee:11111"), "employee:11111");
    }

    #[test]
    fn test_instance_scope_extends_prefix() {
        let config = RedisCacheConfig::new("redis://cache:6379")
            .with_key_prefix("staff")
            .scoped_to("b1946ac9");
        assert_eq!(config.key_prefix, "staff:b1946ac9");

        let config = RedisCacheConfig::new("redis://cache:6379").with_key_prefix("").scoped_to("b1946ac9");
        assert_eq!(config.key_prefix, "b1946ac9");
    }

    #[test]
    fn test_scan_pattern_stays_in_namespace() {
        assert_eq!(prefixed("staff", "*"), "staff:*");
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_cache_error() {
        let result = RedisCache::new(RedisCacheConfig::new("not a url")).await;
        assert!(matches!(result.unwrap_err(), DomainError::Cache { .. }));
    }
}
