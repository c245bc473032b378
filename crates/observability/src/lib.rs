//! Barnstormer observability: subscriber setup, structured log sinks and OTLP export.
//!
//! # Quick Start
//!
//! ```no_run
//! use barnstormer_observability::{init, LogEntry, ObservabilityConfig};
//!
//! let config = ObservabilityConfig::new("barnstormer")
//!     .with_log_level("debug")
//!     .with_log_sink(std::sync::Arc::new(|entry: &LogEntry| eprintln!("{}", entry.render())));
//!
//! init(config)?;
//! tracing::info!("Service started");
//! # Ok::<(), barnstormer_observability::ObservabilityError>(())
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_SERVICE_NAME` or `SERVICE_NAME` - Service name
//! - `OTEL_SERVICE_VERSION` or `SERVICE_VERSION` - Service version
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint
//! - `BARNSTORMER_LOG` or `RUST_LOG` - Log level filter
//!
//! Spans are only exported when telemetry is enabled and an endpoint is set.

pub mod config;
pub mod error;
pub mod log_layer;
pub mod telemetry;
pub mod tracing;

pub use config::{LogSink, ObservabilityConfig};
pub use error::ObservabilityError;
pub use log_layer::{LogEntry, LogLevel};
pub use telemetry::{init, init_from_env, shutdown};
pub use crate::tracing::{record_duration, record_error};
