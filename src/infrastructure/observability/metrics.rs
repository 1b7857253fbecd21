//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, describe_counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

const CACHE_HITS: &str = "employee_cache_hits_total";
const CACHE_MISSES: &str = "employee_cache_misses_total";
const CACHE_BYPASS: &str = "employee_cache_bypass_total";
const CACHE_FAILURES: &str = "employee_cache_failures_total";

/// Longest path label kept before truncation
const MAX_PATH_LABEL: usize = 50;

/// Runs of three or more digits, which is every generated employee id
static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d{3,}(/|$)").expect("numeric segment regex"));

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
///
/// Returns `None` when metrics are disabled or a recorder is already
/// installed; the `metrics` macros are then no-ops.
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            register_default_metrics();

            tracing::info!("Prometheus metrics initialized at {}", config.route());

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("employee_directory_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

    describe_counter!(CACHE_HITS, "Employee reads answered from the cache");
    describe_counter!(CACHE_MISSES, "Employee reads that filled the cache from the store");
    describe_counter!(CACHE_BYPASS, "Employee reads that skipped an unusable cache");
    describe_counter!(
        CACHE_FAILURES,
        "Cache updates that failed and left the cache degraded"
    );
}

/// Create the metrics router serving at `path`
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

pub fn record_cache_hit() {
    counter!(CACHE_HITS).increment(1);
}

pub fn record_cache_miss() {
    counter!(CACHE_MISSES).increment(1);
}

pub fn record_cache_bypass() {
    counter!(CACHE_BYPASS).increment(1);
}

pub fn record_cache_failure() {
    counter!(CACHE_FAILURES).increment(1);
}

/// Sanitize URL path for metric labels (replace ids, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = NUMERIC_SEGMENT.replace_all(path, "/{id}$1");

    if path.len() > MAX_PATH_LABEL {
        path.chars().take(MAX_PATH_LABEL).collect()
    } else {
        path.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_employee_id() {
        assert_eq!(sanitize_path("/employees/011111"), "/employees/{id}");
        assert_eq!(sanitize_path("/employees/11111/"), "/employees/{id}/");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/employee/all"), "/employee/all");
        assert_eq!(sanitize_path("/health"), "/health");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= MAX_PATH_LABEL);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_cache_hit();
        record_cache_miss();
        record_http_request("GET", "/employees/11111", 200, Duration::from_millis(3));
    }
}
