//! Application state for shared services

use std::sync::Arc;

use crate::domain::employee::{Employee, EmployeeDraft, EmployeeRepository};
use crate::domain::DomainError;
use crate::infrastructure::employee::{CacheStatus, EmployeeService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub employee_service: Arc<dyn EmployeeServiceTrait>,
}

/// Trait for employee service operations
#[async_trait::async_trait]
pub trait EmployeeServiceTrait: Send + Sync {
    async fn fetch_one(&self, id: &str) -> Result<Option<Employee>, DomainError>;
    async fn fetch_all(&self) -> Result<Vec<Employee>, DomainError>;
    async fn create(&self, draft: EmployeeDraft) -> Result<Employee, DomainError>;
    async fn update(&self, id: &str, draft: EmployeeDraft) -> Result<Employee, DomainError>;
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    fn cache_status(&self) -> CacheStatus;
}

#[async_trait::async_trait]
impl<R: EmployeeRepository + 'static> EmployeeServiceTrait for EmployeeService<R> {
    async fn fetch_one(&self, id: &str) -> Result<Option<Employee>, DomainError> {
        EmployeeService::fetch_one(self, id).await
    }

    async fn fetch_all(&self) -> Result<Vec<Employee>, DomainError> {
        EmployeeService::fetch_all(self).await
    }

    async fn create(&self, draft: EmployeeDraft) -> Result<Employee, DomainError> {
        EmployeeService::create(self, draft).await
    }

    async fn update(&self, id: &str, draft: EmployeeDraft) -> Result<Employee, DomainError> {
        EmployeeService::update(self, id, draft).await
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        EmployeeService::delete(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        EmployeeService::count(self).await
    }

    fn cache_status(&self) -> CacheStatus {
        EmployeeService::cache_status(self)
    }
}

impl AppState {
    pub fn new(employee_service: Arc<dyn EmployeeServiceTrait>) -> Self {
        Self { employee_service }
    }
}
