//! Per-request view extraction

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::domain::visibility::{ViewContext, VIEW_HEADER};

/// Builds the request's [`ViewContext`] from the `X-view` header
///
/// Never rejects: a missing, unknown or non-UTF-8 value selects the default
/// view.
impl<S> FromRequestParts<S> for ViewContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(VIEW_HEADER)
            .and_then(|value| value.to_str().ok());

        Ok(ViewContext::from_header(value))
    }
}
