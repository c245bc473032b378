//! Configuration for observability/telemetry

use std::sync::Arc;

use crate::error::ObservabilityError;
use crate::log_layer::LogEntry;

/// Receives every structured log entry. Called from the tracing layer; must not block.
pub type LogSink = Arc<dyn Fn(&LogEntry) + Send + Sync>;

const DEFAULT_SERVICE_NAME: &str = "barnstormer";

/// Observability configuration
#[derive(Clone)]
pub struct ObservabilityConfig {
    /// Service name for traces
    pub service_name: String,

    /// Service version (optional, defaults to "unknown")
    pub service_version: Option<String>,

    /// OTLP endpoint for trace export (e.g., "http://localhost:4317")
    pub otlp_endpoint: Option<String>,

    /// Spans are exported only when this is set and an endpoint is configured
    pub telemetry_enabled: bool,

    /// Enable console/log output
    pub enable_console: bool,

    /// Log level filter (e.g., "info", "debug", "barnstormer_config=trace").
    /// Defaults to "info" if not set
    pub log_level: Option<String>,

    /// Additional resource attributes (key-value pairs)
    pub resource_attributes: Vec<(String, String)>,

    pub log_sinks: Vec<LogSink>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            service_version: None,
            otlp_endpoint: None,
            telemetry_enabled: true,
            enable_console: true,
            log_level: None,
            resource_attributes: Vec::new(),
            log_sinks: Vec::new(),
        }
    }
}

impl std::fmt::Debug for ObservabilityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservabilityConfig")
            .field("service_name", &self.service_name)
            .field("service_version", &self.service_version)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .field("telemetry_enabled", &self.telemetry_enabled)
            .field("enable_console", &self.enable_console)
            .field("log_level", &self.log_level)
            .field("resource_attributes", &self.resource_attributes)
            .field("log_sinks", &self.log_sinks.len())
            .finish()
    }
}

impl ObservabilityConfig {
    /// Create a new configuration with service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_telemetry(mut self, enabled: bool) -> Self {
        self.telemetry_enabled = enabled;
        self
    }

    pub fn with_console(mut self, enable: bool) -> Self {
        self.enable_console = enable;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn with_resource_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.resource_attributes.push((key.into(), value.into()));
        self
    }

    /// Adds a sink; every sink sees every entry that passes the level filter.
    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log_sinks.push(sink);
        self
    }

    /// The endpoint spans should be exported to, if export is on.
    pub fn export_endpoint(&self) -> Option<&str> {
        if self.telemetry_enabled {
            self.otlp_endpoint.as_deref()
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), ObservabilityError> {
        if self.service_name.trim().is_empty() {
            return Err(ObservabilityError::Config(
                "service name must not be empty".to_string(),
            ));
        }
        if let Some(endpoint) = &self.otlp_endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ObservabilityError::Config(format!(
                    "OTLP endpoint must be an http(s) URL, got '{endpoint}'"
                )));
            }
        }
        Ok(())
    }

    /// Build from environment variables
    ///
    /// Reads:
    /// - `OTEL_SERVICE_NAME` or `SERVICE_NAME` → service_name
    /// - `OTEL_SERVICE_VERSION` or `SERVICE_VERSION` → service_version
    /// - `OTEL_EXPORTER_OTLP_ENDPOINT` → otlp_endpoint
    /// - `BARNSTORMER_LOG` or `RUST_LOG` → log_level
    pub fn from_env() -> Self {
        let service_name = std::env::var("OTEL_SERVICE_NAME")
            .or_else(|_| std::env::var("SERVICE_NAME"))
            .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

        let service_version = std::env::var("OTEL_SERVICE_VERSION")
            .or_else(|_| std::env::var("SERVICE_VERSION"))
            .ok();

        // Only export when explicitly set; otherwise console-only.
        let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

        let log_level = std::env::var("BARNSTORMER_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();

        Self {
            service_name,
            service_version,
            otlp_endpoint,
            log_level,
            ..Default::default()
        }
    }
}
