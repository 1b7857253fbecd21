//! Employee store, cache layer and service

mod cache_layer;
mod id_generator;
mod service;
mod store;

pub use cache_layer::{cache_key, CacheStatus, EmployeeCacheLayer, DEFAULT_RECOVERY_INTERVAL};
pub use id_generator::IdGenerator;
pub use service::EmployeeService;
pub use store::{EmployeeStore, DEFAULT_MAX_RANDOM_ATTEMPTS};
