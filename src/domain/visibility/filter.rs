//! Serialization-time field filter

use serde_json::{Map, Value};

use super::policy::Redactable;
use super::view::ViewContext;
use crate::domain::DomainError;

/// Reduces records to the fields visible under a request's view.
///
/// The decision depends only on the record type's static [`FieldPolicy`] and
/// the context's view, so single records and sequences go through the same
/// path.
///
/// [`FieldPolicy`]: super::FieldPolicy
#[derive(Debug, Clone, Copy)]
pub struct FieldVisibilityFilter<'a> {
    context: &'a ViewContext,
}

impl<'a> FieldVisibilityFilter<'a> {
    pub fn new(context: &'a ViewContext) -> Self {
        Self { context }
    }

    /// Project a single record to its visible fields
    pub fn project<T: Redactable>(&self, record: &T) -> Result<Map<String, Value>, DomainError> {
        let policy = T::field_policy();
        let view = self.context.view();

        match serde_json::to_value(record) {
            Ok(Value::Object(mut fields)) => {
                fields.retain(|name, _| policy.is_visible(name, view));
                Ok(fields)
            }
            Ok(_) => Err(DomainError::internal(
                "Redactable records must serialize to a JSON object",
            )),
            Err(e) => Err(DomainError::internal(format!(
                "Failed to serialize record: {}",
                e
            ))),
        }
    }

    /// Project every record of a sequence
    pub fn project_all<'r, T, I>(&self, records: I) -> Result<Vec<Map<String, Value>>, DomainError>
    where
        T: Redactable + 'r,
        I: IntoIterator<Item = &'r T>,
    {
        records.into_iter().map(|record| self.project(record)).collect()
    }
}
