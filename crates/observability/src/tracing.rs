//! Span helpers

/// Span around configuration resolution.
///
/// ```rust
/// use barnstormer_observability::config_span;
///
/// let span = config_span!("load");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! config_span {
    ($operation:expr) => {
        tracing::info_span!(
            "config.operation",
            operation = $operation,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Span around a model catalog fetch or hydration.
///
/// ```rust
/// use barnstormer_observability::catalog_span;
///
/// let span = catalog_span!("hydrate", "http://localhost:8787/api/openrouter/models");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! catalog_span {
    ($operation:expr, $endpoint:expr) => {
        tracing::info_span!(
            "catalog.operation",
            operation = $operation,
            catalog.endpoint = $endpoint,
            catalog.source = tracing::field::Empty,
            catalog.count = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Span around a panel drag or resize gesture.
#[macro_export]
macro_rules! gesture_span {
    ($panel:expr, $kind:expr) => {
        tracing::debug_span!(
            "layout.gesture",
            panel.id = $panel,
            gesture.kind = $kind,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Record an error on the current span and log it.
///
/// The span must declare `error` and `error.message` fields (all span macros here do).
pub fn record_error<E: std::error::Error + ?Sized>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::error!(error = %error, "Operation failed");
}

/// Record a duration in milliseconds on the current span.
pub fn record_duration(key: &str, duration: std::time::Duration) {
    let span = tracing::Span::current();
    span.record(key, duration.as_millis() as u64);
}
