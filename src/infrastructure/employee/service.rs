//! Employee service combining the store and its cache layer

use std::sync::Arc;

use tracing::{debug, info};

use super::cache_layer::{CacheStatus, EmployeeCacheLayer};
use crate::domain::employee::{Employee, EmployeeDraft, EmployeeId, EmployeeRepository};
use crate::domain::DomainError;

/// Employee service for record lookup and mutation
#[derive(Debug)]
pub struct EmployeeService<R: EmployeeRepository> {
    repository: Arc<R>,
    cache: Arc<EmployeeCacheLayer>,
}

fn parse_id(id: &str) -> Result<EmployeeId, DomainError> {
    EmployeeId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Create a new employee service
    pub fn new(repository: Arc<R>, cache: Arc<EmployeeCacheLayer>) -> Self {
        Self { repository, cache }
    }

    /// Get an employee by id, through the cache
    pub async fn fetch_one(&self, id: &str) -> Result<Option<Employee>, DomainError> {
        let employee_id = parse_id(id)?;
        debug!(id = %employee_id, "Fetching employee");

        self.cache
            .read(&employee_id, || self.repository.get(&employee_id))
            .await
    }

    /// List all employees, ordered by id
    ///
    /// Always served from the store.
    pub async fn fetch_all(&self) -> Result<Vec<Employee>, DomainError> {
        let mut employees = self.repository.list().await?;
        employees.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(employees)
    }

    /// Create an employee under a freshly generated id
    ///
    /// The cache is left alone: the id has never been cached.
    pub async fn create(&self, draft: EmployeeDraft) -> Result<Employee, DomainError> {
        draft
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let employee = self.repository.create(draft).await?;
        info!(id = %employee.id(), "Created employee");

        Ok(employee)
    }

    /// Replace the employee stored at `id`
    pub async fn update(&self, id: &str, draft: EmployeeDraft) -> Result<Employee, DomainError> {
        let employee_id = parse_id(id)?;
        draft
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let _guard = self.cache.lock(&employee_id).await;

        match self.repository.update(&employee_id, draft).await {
            Ok(employee) => {
                self.cache.write(&employee_id, &employee).await;
                info!(id = %employee_id, "Updated employee");
                Ok(employee)
            }
            Err(e) if e.is_not_found() => {
                // Nothing stored, so nothing may be cached either
                self.cache.invalidate(&employee_id).await;
                Err(DomainError::not_found(format!(
                    "Employee '{}' not found",
                    employee_id
                )))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete the employee at `id`; returns whether one existed
    ///
    /// Deleting an absent id is a no-op.
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let employee_id = parse_id(id)?;
        let _guard = self.cache.lock(&employee_id).await;

        let existed = self.repository.delete(&employee_id).await?;
        self.cache.invalidate(&employee_id).await;

        info!(id = %employee_id, existed = existed, "Deleted employee");
        Ok(existed)
    }

    /// Number of stored employees
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    pub fn cache_status(&self) -> CacheStatus {
        self.cache.status()
    }
}
