//! Cache backends and runtime selection between them

mod factory;
mod in_memory;
mod redis;

pub use factory::{CacheConfig, CacheFactory, CacheType};
pub use in_memory::{InMemoryCache, DEFAULT_MAX_CAPACITY};
pub use redis::{RedisCache, RedisCacheConfig};
