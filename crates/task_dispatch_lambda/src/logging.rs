//! Structured log lines for the dispatcher.
//!
//! Every line carries `component`, `event` and a JSON `details` payload so the
//! log stream can be filtered per dispatch stage.

use serde_json::Value;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the JSON formatter. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_current_span(false)
        .init();
}

pub fn log_info(component: &str, event: &str, details: Value) {
    tracing::info!(component, event, details = %details);
}

pub fn log_error(component: &str, event: &str, details: Value) {
    tracing::error!(component, event, details = %details);
}
