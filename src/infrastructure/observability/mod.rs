//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_cache_bypass, record_cache_failure,
    record_cache_hit, record_cache_miss, record_http_request, PrometheusMetrics,
};
