//! Subscriber initialization with optional OTLP export (OpenTelemetry 0.31).

use once_cell::sync::OnceCell;
use opentelemetry::{global, trace::TracerProvider, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::ObservabilityConfig;
use crate::error::ObservabilityError;
use crate::log_layer;

// Kept for flushing on shutdown
static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    config
        .log_level
        .as_ref()
        .map(|level| EnvFilter::new(level.as_str()))
        .unwrap_or_else(|| EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
}

/// Installs the global subscriber: env filter, console output, sink layer and,
/// when telemetry is enabled and an endpoint is set, OTLP span export.
///
/// Fails if a global subscriber is already installed. An exporter that cannot
/// be built degrades to console-only with a warning.
pub fn init(config: ObservabilityConfig) -> Result<(), ObservabilityError> {
    config.validate()?;

    let mut attributes = vec![KeyValue::new("service.name", config.service_name.clone())];
    if let Some(version) = &config.service_version {
        attributes.push(KeyValue::new("service.version", version.clone()));
    }
    for (key, value) in &config.resource_attributes {
        attributes.push(KeyValue::new(key.clone(), value.clone()));
    }
    let resource = Resource::builder().with_attributes(attributes).build();

    let fmt_layer = config
        .enable_console
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let mut export_failure = None;
    let otel_layer = match config.export_endpoint() {
        Some(endpoint) => {
            match build_otlp_tracer_provider(&config.service_name, endpoint, resource) {
                Ok((tracer, provider)) => {
                    global::set_tracer_provider(provider.clone());
                    let _ = TRACER_PROVIDER.set(provider);
                    Some(OpenTelemetryLayer::new(tracer))
                }
                Err(e) => {
                    export_failure = Some(e);
                    None
                }
            }
        }
        None => None,
    };
    let exporting = otel_layer.is_some();

    Registry::default()
        .with(env_filter(&config))
        .with(fmt_layer)
        .with(otel_layer)
        .with(log_layer::log_layer(config.log_sinks.clone()))
        .try_init()
        .map_err(|e| ObservabilityError::InitFailed(e.to_string()))?;

    // Logged after install so the messages reach the new subscriber.
    if let Some(e) = export_failure {
        tracing::warn!(
            service.name = %config.service_name,
            error = %e,
            "Failed to initialize OTLP export, falling back to console-only tracing"
        );
    } else if exporting {
        tracing::info!(
            service.name = %config.service_name,
            otlp.endpoint = config.otlp_endpoint.as_deref().unwrap_or_default(),
            "OTLP tracing enabled"
        );
    } else {
        tracing::debug!(
            service.name = %config.service_name,
            telemetry = config.telemetry_enabled,
            "Tracing initialized without span export"
        );
    }

    Ok(())
}

fn build_otlp_tracer_provider(
    service_name: &str,
    endpoint: &str,
    resource: Resource,
) -> Result<(opentelemetry_sdk::trace::SdkTracer, SdkTracerProvider), ObservabilityError> {
    let span_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint.to_string())
        .build()
        .map_err(|e| ObservabilityError::InitFailed(e.to_string()))?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource)
        .build();

    // tracer() needs an owned name
    let tracer = provider.tracer(service_name.to_string());

    Ok((tracer, provider))
}

/// Flushes and shuts down the OTLP provider, if one was installed.
pub fn shutdown() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        let _ = provider.shutdown();
        tracing::debug!("OpenTelemetry tracer provider shut down");
    }
}

/// Initialize from environment variables
pub fn init_from_env() -> Result<(), ObservabilityError> {
    init(ObservabilityConfig::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected_before_install() {
        let config = ObservabilityConfig::new("svc").with_otlp_endpoint("grpc://nowhere");
        assert!(matches!(init(config), Err(ObservabilityError::Config(_))));
    }

    #[test]
    fn test_explicit_level_wins() {
        let config = ObservabilityConfig::new("svc").with_log_level("barnstormer_config=trace");
        assert_eq!(env_filter(&config).to_string(), "barnstormer_config=trace");
    }
}
