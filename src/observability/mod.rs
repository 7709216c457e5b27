// src/observability/mod.rs
//! Tracing and metrics setup
//!
//! Metric names emitted by the engine:
//!
//! - `interception_calls_total{method}`: calls routed through a chain
//! - `interception_call_failures_total{method}`: failures converted to a default
//! - `interception_hook_failures_total{interceptor}`: hook errors propagated
//! - `interception_proxies_created_total{type}`: proxies built by the factory
//! - `interception_call_duration_seconds{method}`: recorded by the timing interceptor

use crate::utils::config::LoggingConfig;
use crate::utils::errors::{ProxyError, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;

pub const CALLS_TOTAL: &str = "interception_calls_total";
pub const CALL_FAILURES_TOTAL: &str = "interception_call_failures_total";
pub const HOOK_FAILURES_TOTAL: &str = "interception_hook_failures_total";
pub const PROXIES_CREATED_TOTAL: &str = "interception_proxies_created_total";
pub const CALL_DURATION_SECONDS: &str = "interception_call_duration_seconds";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ProxyError::Observability(format!("invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ProxyError::Observability(e.to_string()))
}

/// Install the Prometheus metrics recorder
pub fn init_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ProxyError::Observability(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_is_valid_filter() {
        let config = LoggingConfig::default();
        assert!(EnvFilter::try_new(&config.level).is_ok());
    }

    #[test]
    fn test_metric_names_are_namespaced() {
        for name in [
            CALLS_TOTAL,
            CALL_FAILURES_TOTAL,
            HOOK_FAILURES_TOTAL,
            PROXIES_CREATED_TOTAL,
            CALL_DURATION_SECONDS,
        ] {
            assert!(name.starts_with("interception_"));
        }
    }
}
