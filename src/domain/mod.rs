//! Domain layer - Core records, visibility rules and storage/cache contracts

pub mod cache;
pub mod employee;
pub mod error;
pub mod storage;
pub mod visibility;

pub use cache::{Cache, CacheExt};
pub use employee::{Employee, EmployeeDraft, EmployeeId, EmployeeRepository};
pub use error::DomainError;
pub use storage::{Storage, StorageEntity, StorageKey};
pub use visibility::{FieldVisibilityFilter, View, ViewContext};
