//! Employee domain module
//!
//! Employee records are plain text rows keyed by a system-generated id. Two of
//! their fields (`id` and `company`) are internal and only leave the service
//! when a request asks for the internal view.

mod entity;
mod repository;
mod validation;

pub use entity::{Employee, EmployeeDraft, EmployeeId, EMPLOYEE_FIELDS};
pub use repository::EmployeeRepository;
pub use validation::{
    validate_employee_field, validate_employee_id, EmployeeValidationError,
    MAX_EMPLOYEE_FIELD_LENGTH, MAX_EMPLOYEE_ID_LENGTH,
};

#[cfg(test)]
pub use repository::mock;
