//! Static field visibility tags

use serde::Serialize;

use super::view::View;

/// Visibility tag of a single serialized field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Always emitted
    Public,
    /// Emitted only under the internal view
    Internal,
}

impl Visibility {
    pub fn is_visible_in(&self, view: View) -> bool {
        match self {
            Self::Public => true,
            Self::Internal => view.is_internal(),
        }
    }
}

/// Table of serialized field names and their visibility tags
#[derive(Debug)]
pub struct FieldPolicy {
    fields: &'static [(&'static str, Visibility)],
}

impl FieldPolicy {
    pub const fn new(fields: &'static [(&'static str, Visibility)]) -> Self {
        Self { fields }
    }

    /// Tag for a serialized field name, if the table lists it
    pub fn tag(&self, field: &str) -> Option<Visibility> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, tag)| *tag)
    }

    /// Fields missing from the table are treated as internal
    pub fn is_visible(&self, field: &str, view: View) -> bool {
        self.tag(field)
            .unwrap_or(Visibility::Internal)
            .is_visible_in(view)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|(name, _)| *name)
    }
}

/// Serializable record type with a static field visibility table
pub trait Redactable: Serialize {
    fn field_policy() -> &'static FieldPolicy;
}
