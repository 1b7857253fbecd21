//! Request views

use serde::Serialize;
use tracing::debug;

/// Header carrying the requested view
pub const VIEW_HEADER: &str = "x-view";

/// Header value that selects the internal view
pub const INTERNAL_VIEW_VALUE: &str = "internal";

/// Visibility mode of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Default,
    Internal,
}

impl View {
    /// Resolve a view from the raw header value.
    ///
    /// Only the exact internal marker selects the internal view; anything else,
    /// including a missing header, falls back to the default view.
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some(INTERNAL_VIEW_VALUE) => Self::Internal,
            Some(other) => {
                debug!(value = %other, "Unrecognized view header, using default view");
                Self::Default
            }
            None => Self::Default,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Per-request visibility context.
///
/// The view is fixed at construction. A context belongs to exactly one request
/// and is dropped with it; it is passed by reference to whatever builds the
/// response and is never stored in shared state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewContext {
    view: View,
}

impl ViewContext {
    pub fn new(view: View) -> Self {
        Self { view }
    }

    /// Build the context from the request's view header value
    pub fn from_header(value: Option<&str>) -> Self {
        Self::new(View::from_header(value))
    }

    pub fn view(&self) -> View {
        self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_header_selects_internal_view() {
        assert_eq!(View::from_header(Some("internal")), View::Internal);
    }

    #[test]
    fn test_other_values_fall_back_to_default() {
        assert_eq!(View::from_header(None), View::Default);
        assert_eq!(View::from_header(Some("")), View::Default);
        assert_eq!(View::from_header(Some("INTERNAL")), View::Default);
        assert_eq!(View::from_header(Some(" internal")), View::Default);
        assert_eq!(View::from_header(Some("admin")), View::Default);
    }

    #[test]
    fn test_context_from_header() {
        let context = ViewContext::from_header(Some("internal"));
        assert!(context.view().is_internal());

        let context = ViewContext::from_header(None);
        assert_eq!(context.view(), View::Default);
        assert_eq!(context, ViewContext::default());
    }

    #[test]
    fn test_view_display() {
        assert_eq!(View::Default.to_string(), "default");
        assert_eq!(View::Internal.to_string(), "internal");
    }
}
