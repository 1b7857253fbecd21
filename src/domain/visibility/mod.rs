//! Field visibility - request-scoped views and serialization-time redaction
//!
//! A [`ViewContext`] is built once per inbound request from its `X-view`
//! header and handed to a [`FieldVisibilityFilter`], which drops every field
//! the record type tags as internal unless the request asked for the internal
//! view.

mod filter;
mod policy;
mod view;

pub use filter::FieldVisibilityFilter;
pub use policy::{FieldPolicy, Redactable, Visibility};
pub use view::{View, ViewContext, INTERNAL_VIEW_VALUE, VIEW_HEADER};
