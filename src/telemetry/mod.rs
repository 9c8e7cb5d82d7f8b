//! Telemetry and observability module
//!
//! Structured logging with tracing. The library only emits events; installing
//! a subscriber is left to the binary through [`init_telemetry`].

use std::time::{Duration, Instant};

use tracing::{info_span, Span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TelemetryConfig;
use crate::error::{SdkError, SdkResult};

/// Initialize the telemetry subsystem
pub fn init_telemetry(config: &TelemetryConfig) -> SdkResult<()> {
    if !config.enabled {
        return Ok(());
    }

    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let installed = if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_target(true)
            .with_writer(std::io::stderr);

        subscriber.with(json_layer).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact();

        subscriber.with(fmt_layer).try_init()
    };

    installed.map_err(|e| SdkError::Config(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!(
        service = %config.service_name,
        version = %crate::VERSION,
        "Telemetry initialized"
    );

    Ok(())
}

/// Span and clock for one remote call
#[derive(Debug)]
pub struct RequestSpan {
    span: Span,
    start: Instant,
    request_id: String,
}

impl RequestSpan {
    /// Open a span with a fresh request id and log the start event
    pub fn start(method: &str, path: &str) -> Self {
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = info_span!(
            "moonshot_request",
            request_id = %request_id,
            method = %method,
            path = %path,
            status = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        );

        span.in_scope(|| log_request_start(&request_id, method, path));

        Self {
            span,
            start: Instant::now(),
            request_id,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record the response status and log the end event
    pub fn finish(&self, status: u16) {
        let latency = self.elapsed();
        self.span.record("status", status);
        self.span.record("latency_ms", latency.as_millis() as u64);
        self.span.in_scope(|| log_request_end(&self.request_id, status, latency));
    }

    /// Log a failed call
    pub fn fail(&self, error: &SdkError) {
        self.span.in_scope(|| log_error(&self.request_id, error));
    }
}

/// Log a request start
#[inline]
pub fn log_request_start(request_id: &str, method: &str, path: &str) {
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Request started"
    );
}

/// Log a request completion
#[inline]
pub fn log_request_end(request_id: &str, status: u16, latency: Duration) {
    tracing::debug!(
        request_id = %request_id,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "Request completed"
    );
}

/// Log an error; remote failures at `warn`, everything else at `error`
#[inline]
pub fn log_error(request_id: &str, error: &SdkError) {
    match error {
        SdkError::Remote(remote) => tracing::warn!(
            request_id = %request_id,
            code = remote.code,
            error_type = %remote.error_type,
            message = %remote.message,
            "Request rejected by service"
        ),
        SdkError::Cancelled => tracing::debug!(request_id = %request_id, "Request cancelled"),
        other => tracing::error!(
            request_id = %request_id,
            error = %other,
            error_kind = other.kind(),
            "Request failed"
        ),
    }
}
