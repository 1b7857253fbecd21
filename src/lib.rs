//! Employee directory
//!
//! An HTTP service over a table of employee records with:
//! - Request-scoped views that hide internal fields unless asked for
//! - A read-through / write-through record cache that never serves a value
//!   older than the store's
//! - In-memory or Redis cache backends

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::employee::Employee;
use infrastructure::{
    cache::CacheFactory,
    employee::{EmployeeCacheLayer, EmployeeService, EmployeeStore, IdGenerator},
    storage::InMemoryStorage,
};
use tracing::{info, warn};

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let ids = IdGenerator::new(config.store.id_width)?;
    let store = EmployeeStore::new(Arc::new(InMemoryStorage::<Employee>::new()))
        .with_id_generator(ids)
        .with_max_random_attempts(config.store.max_random_attempts);

    if config.store.seed_demo_data {
        store.seed_demo_data().await?;
    }

    let cache_layer = create_cache_layer(config).await;
    info!(
        cache_type = %config.cache.cache_type,
        cache_status = %cache_layer.status(),
        id_width = config.store.id_width,
        "Employee service ready"
    );

    let service = EmployeeService::new(Arc::new(store), Arc::new(cache_layer));

    Ok(AppState::new(Arc::new(service)))
}

/// Build the cache layer; a backend that cannot be created leaves caching off
///
/// The records live in this process only, so whatever the backend already
/// holds is cleared before the layer serves from it.
async fn create_cache_layer(config: &AppConfig) -> EmployeeCacheLayer {
    let recovery_interval = Duration::from_secs(config.cache.recovery_interval_secs);

    match CacheFactory::new().create(&config.cache).await {
        Ok(Some(backend)) => EmployeeCacheLayer::start(backend, recovery_interval).await,
        Ok(None) => EmployeeCacheLayer::disabled(),
        Err(e) => {
            warn!(
                cache_type = %config.cache.cache_type,
                error = %e,
                "Cache backend unavailable, serving every read from the store"
            );
            EmployeeCacheLayer::disabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::{CacheConfig, CacheType};
    use crate::infrastructure::employee::CacheStatus;

    #[tokio::test]
    async fn test_create_app_state_seeds_when_enabled() {
        let mut config = AppConfig::default();
        config.store.seed_demo_data = true;

        let state = create_app_state(&config).await.unwrap();

        assert_eq!(state.employee_service.count().await.unwrap(), 5);
        assert_eq!(state.employee_service.cache_status(), CacheStatus::Healthy);
    }

    #[tokio::test]
    async fn test_create_app_state_starts_empty() {
        let state = create_app_state(&AppConfig::default()).await.unwrap();

        assert_eq!(state.employee_service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_disabled_cache() {
        let mut config = AppConfig::default();
        config.cache = CacheConfig::disabled();

        let state = create_app_state(&config).await.unwrap();
        assert_eq!(state.employee_service.cache_status(), CacheStatus::Disabled);
    }

    #[tokio::test]
    async fn test_misconfigured_redis_falls_back_to_no_cache() {
        let mut config = AppConfig::default();
        config.cache.cache_type = CacheType::Redis;
        config.cache.redis_url = None;

        let state = create_app_state(&config).await.unwrap();
        assert_eq!(state.employee_service.cache_status(), CacheStatus::Disabled);
    }

    #[tokio::test]
    async fn test_invalid_id_width_is_rejected() {
        let mut config = AppConfig::default();
        config.store.id_width = 0;

        assert!(create_app_state(&config).await.is_err());
    }
}
