//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;
use crate::infrastructure::employee::CacheStatus;

/// Health response with optional component detail
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Returns 200 while the process is serving
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: None,
        employees: None,
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check reporting the store and the cache layer
///
/// A degraded cache still answers 200: reads fall back to the store.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let service = &state.employee_service;

    let (store_check, employees) = match service.count().await {
        Ok(count) => (
            HealthCheck {
                name: "store".to_string(),
                status: HealthStatus::Healthy,
                message: None,
            },
            Some(count),
        ),
        Err(e) => (
            HealthCheck {
                name: "store".to_string(),
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
            },
            None,
        ),
    };

    let cache = service.cache_status();
    let cache_check = HealthCheck {
        name: "cache".to_string(),
        status: match cache {
            CacheStatus::Healthy | CacheStatus::Disabled => HealthStatus::Healthy,
            CacheStatus::Degraded => HealthStatus::Degraded,
        },
        message: match cache {
            CacheStatus::Healthy => None,
            CacheStatus::Degraded => Some("reads bypass the cache until it recovers".to_string()),
            CacheStatus::Disabled => Some("caching disabled".to_string()),
        },
    };

    let overall_status = if store_check.status == HealthStatus::Unhealthy {
        HealthStatus::Unhealthy
    } else {
        cache_check.status
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: Some(cache),
        employees,
        checks: Some(vec![store_check, cache_check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check for Kubernetes liveness probes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
