//! Employee validation

use thiserror::Error;

/// Errors that can occur during employee validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmployeeValidationError {
    #[error("Employee ID cannot be empty")]
    EmptyId,

    #[error("Employee ID cannot exceed {0} characters")]
    IdTooLong(usize),

    #[error("Employee {field} cannot exceed {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
}

pub const MAX_EMPLOYEE_ID_LENGTH: usize = 64;
pub const MAX_EMPLOYEE_FIELD_LENGTH: usize = 256;

/// Validate an employee ID supplied by a caller
///
/// Lookups accept any short non-empty string; ids that were never issued
/// simply resolve to not-found.
pub fn validate_employee_id(id: &str) -> Result<(), EmployeeValidationError> {
    if id.is_empty() {
        return Err(EmployeeValidationError::EmptyId);
    }

    if id.chars().count() > MAX_EMPLOYEE_ID_LENGTH {
        return Err(EmployeeValidationError::IdTooLong(MAX_EMPLOYEE_ID_LENGTH));
    }

    Ok(())
}

/// Validate one text field of an employee record
pub fn validate_employee_field(
    field: &'static str,
    value: &str,
) -> Result<(), EmployeeValidationError> {
    if value.chars().count() > MAX_EMPLOYEE_FIELD_LENGTH {
        return Err(EmployeeValidationError::FieldTooLong {
            field,
            max: MAX_EMPLOYEE_FIELD_LENGTH,
        });
    }

    Ok(())
}
