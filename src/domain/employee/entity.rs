//! Employee entity and related types

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_employee_field, validate_employee_id, EmployeeValidationError,
};
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::visibility::{FieldPolicy, Redactable, Visibility};

/// Employee identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Create a new EmployeeId after validation; surrounding whitespace is dropped
    pub fn new(id: impl Into<String>) -> Result<Self, EmployeeValidationError> {
        let id = id.into();
        let id = id.trim();
        validate_employee_id(id)?;
        Ok(Self(id.to_string()))
    }

    /// Wrap an id produced by the store's generator, which is always a short
    /// run of digits
    pub(crate) fn generated(id: String) -> Self {
        debug_assert!(validate_employee_id(&id).is_ok());
        Self(id)
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmployeeId {
    type Error = EmployeeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmployeeId> for String {
    fn from(id: EmployeeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for EmployeeId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Employee record body as supplied by callers on create and update
///
/// Any `id` in the body is ignored: the store assigns ids on create and the
/// request's identifier parameter wins on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub designation: String,
}

impl EmployeeDraft {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        company: impl Into<String>,
        designation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            company: company.into(),
            designation: designation.into(),
        }
    }

    /// Check field lengths
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        validate_employee_field("name", &self.name)?;
        validate_employee_field("address", &self.address)?;
        validate_employee_field("company", &self.company)?;
        validate_employee_field("designation", &self.designation)?;
        Ok(())
    }
}

/// Stored employee record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    name: String,
    address: String,
    company: String,
    designation: String,
}

impl Employee {
    /// Build the stored form of a draft under the given id
    pub fn from_draft(id: EmployeeId, draft: EmployeeDraft) -> Self {
        Self {
            id,
            name: draft.name,
            address: draft.address,
            company: draft.company,
            designation: draft.designation,
        }
    }

    // Getters

    pub fn id(&self) -> &EmployeeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    /// The record body without its id
    pub fn to_draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            name: self.name.clone(),
            address: self.address.clone(),
            company: self.company.clone(),
            designation: self.designation.clone(),
        }
    }
}

impl StorageEntity for Employee {
    type Key = EmployeeId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Visibility of each serialized employee field
pub static EMPLOYEE_FIELDS: FieldPolicy = FieldPolicy::new(&[
    ("id", Visibility::Internal),
    ("name", Visibility::Public),
    ("address", Visibility::Public),
    ("company", Visibility::Internal),
    ("designation", Visibility::Public),
]);

impl Redactable for Employee {
    fn field_policy() -> &'static FieldPolicy {
        &EMPLOYEE_FIELDS
    }
}
