//! JSON error responses
//!
//! Every failure leaves the API as `{"error": {"message", "type", "param"?, "code"?}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

/// Error categories reported in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotFoundError,
    ServerError,
}

impl ApiErrorType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequestError => "invalid_request_error",
            Self::NotFoundError => "not_found_error",
            Self::ServerError => "server_error",
        }
    }

    /// Status used when the category is raised without an explicit one
    pub const fn default_status(self) -> StatusCode {
        match self {
            Self::InvalidRequestError => StatusCode::BAD_REQUEST,
            Self::NotFoundError => StatusCode::NOT_FOUND,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        let error = ApiErrorDetail {
            message: message.into(),
            error_type,
            param: None,
            code: None,
        };

        Self {
            status,
            response: ApiErrorResponse { error },
        }
    }

    fn of(error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self::new(error_type.default_status(), error_type, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::of(ApiErrorType::InvalidRequestError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::of(ApiErrorType::NotFoundError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::of(ApiErrorType::ServerError, message)
    }

    pub fn employee_not_found(id: &str) -> Self {
        Self::not_found(format!("Employee '{}' not found", id))
            .with_param("id")
            .with_code("employee_not_found")
    }

    /// Name the request field that caused the error
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::InvalidId { message } => Self::bad_request(message).with_param("id"),
            DomainError::Validation { message } | DomainError::Conflict { message } => {
                Self::bad_request(message)
            }
            DomainError::IdentifierExhausted { message } => {
                error!(error = %message, "Employee id space exhausted");
                Self::internal(message).with_code("identifier_exhausted")
            }
            other => {
                error!(error = %other, "Request failed");
                Self::internal(other.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let detail = &self.response.error;
        write!(f, "{}: {}", detail.error_type, detail.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_picks_status() {
        let err = ApiError::bad_request("name is too long");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.to_string(), "invalid_request_error: name is too long");
    }

    #[test]
    fn test_employee_not_found() {
        let err = ApiError::employee_not_found("11111");

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.response.error.param.as_deref(), Some("id"));
        assert_eq!(err.response.error.code.as_deref(), Some("employee_not_found"));
    }

    #[test]
    fn test_domain_error_conversion() {
        let cases = [
            (DomainError::not_found("gone"), StatusCode::NOT_FOUND),
            (DomainError::validation("too long"), StatusCode::BAD_REQUEST),
            (DomainError::invalid_id("empty"), StatusCode::BAD_REQUEST),
            (
                DomainError::identifier_exhausted("full"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (DomainError::storage("down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            let api_err: ApiError = domain_err.into();
            assert_eq!(api_err.status, status);
        }
    }

    #[test]
    fn test_exhaustion_carries_code() {
        let err: ApiError = DomainError::identifier_exhausted("all 10 ids in use").into();

        assert_eq!(err.response.error.code.as_deref(), Some("identifier_exhausted"));
        assert_eq!(err.response.error.message, "all 10 ids in use");
    }

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_value(&ApiError::employee_not_found("11111").response).unwrap();
        assert_eq!(json["error"]["type"], "not_found_error");
        assert_eq!(json["error"]["message"], "Employee '11111' not found");

        let json = serde_json::to_value(&ApiError::internal("boom").response).unwrap();
        assert!(json["error"].get("param").is_none());
        assert!(json["error"].get("code").is_none());
    }
}
