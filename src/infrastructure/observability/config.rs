//! Settings for the Prometheus scrape endpoint

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Install the recorder and mount the scrape route
    pub enabled: bool,
    /// Route the scrape endpoint is mounted on
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// The scrape route with a leading slash, as the router requires one
    pub fn route(&self) -> String {
        let trimmed = self.path.trim().trim_start_matches('/');
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_route_default() {
        let config = MetricsConfig::default();

        assert!(config.enabled);
        assert_eq!(config.route(), "/metrics");
    }

    #[test]
    fn test_scrape_route_gets_leading_slash() {
        let config: MetricsConfig = serde_json::from_str(r#"{"path": "prom"}"#).unwrap();

        assert!(config.enabled);
        assert_eq!(config.route(), "/prom");
    }

    #[test]
    fn test_disabled_keeps_default_path() {
        let config: MetricsConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();

        assert!(!config.enabled);
        assert_eq!(config.route(), "/metrics");
    }
}
