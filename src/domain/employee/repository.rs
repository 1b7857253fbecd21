//! Employee repository trait

use async_trait::async_trait;

use super::entity::{Employee, EmployeeDraft, EmployeeId};
use crate::domain::DomainError;

/// The authoritative employee table
///
/// Each call is atomic with respect to concurrent callers. In particular two
/// concurrent `create` calls never receive the same identifier.
#[async_trait]
pub trait EmployeeRepository: Send + Sync + std::fmt::Debug {
    /// Store a draft under a freshly generated, previously unused id
    async fn create(&self, draft: EmployeeDraft) -> Result<Employee, DomainError>;

    /// Get an employee by id
    async fn get(&self, id: &EmployeeId) -> Result<Option<Employee>, DomainError>;

    /// List all employees, order unspecified
    async fn list(&self) -> Result<Vec<Employee>, DomainError>;

    /// Replace the record stored at `id`; `NotFound` if absent
    async fn update(&self, id: &EmployeeId, draft: EmployeeDraft)
        -> Result<Employee, DomainError>;

    /// Remove the record at `id`; returns whether one existed
    async fn delete(&self, id: &EmployeeId) -> Result<bool, DomainError>;

    /// Number of stored employees
    async fn count(&self) -> Result<usize, DomainError>;
}
