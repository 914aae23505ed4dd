//! Observability module.
//!
//! Prometheus-format metrics, health checks and tracing initialization.

use axum::{Json, Router, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::config::LoggingConfig;

// ===== Simple Metrics (atomics, no metrics registry dependency) =====

/// Application metrics
#[derive(Clone, Default)]
pub struct AppMetrics {
    pub http_requests_total: Arc<AtomicU64>,
    pub http_request_duration_sum: Arc<AtomicU64>,
    pub chat_turns_total: Arc<AtomicU64>,
    pub conversations_started: Arc<AtomicUsize>,
    pub retrieval_requests_total: Arc<AtomicU64>,
    pub retrieval_latency_sum: Arc<AtomicU64>,
    pub generation_failures_total: Arc<AtomicU64>,
    pub errors_total: Arc<AtomicU64>,
}

impl AppMetrics {
    /// Record an HTTP request
    pub fn record_http_request(&self, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::SeqCst);
        self.http_request_duration_sum
            .fetch_add(duration_ms, Ordering::SeqCst);
    }

    /// Record a completed chat turn
    pub fn record_chat_turn(&self) {
        self.chat_turns_total.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a started conversation
    pub fn record_conversation_started(&self) {
        self.conversations_started.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a context retrieval
    pub fn record_retrieval(&self, duration_ms: u64) {
        self.retrieval_requests_total.fetch_add(1, Ordering::SeqCst);
        self.retrieval_latency_sum
            .fetch_add(duration_ms, Ordering::SeqCst);
    }

    /// Record a generation failure
    pub fn record_generation_failure(&self) {
        self.generation_failures_total.fetch_add(1, Ordering::SeqCst);
    }

    /// Record an error
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::SeqCst);
    }

    /// Render Prometheus text format
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP http_requests_total Total HTTP requests
# TYPE http_requests_total counter
http_requests_total {}
# HELP http_request_duration_seconds HTTP request duration in seconds
# TYPE http_request_duration_seconds histogram
http_request_duration_seconds_sum {}
http_request_duration_seconds_count {}
# HELP chat_turns_total Total completed chat turns
# TYPE chat_turns_total counter
chat_turns_total {}
# HELP conversations_started Conversations started
# TYPE conversations_started gauge
conversations_started {}
# HELP retrieval_requests_total Total context retrieval requests
# TYPE retrieval_requests_total counter
retrieval_requests_total {}
# HELP retrieval_latency_seconds Context retrieval latency in seconds
# TYPE retrieval_latency_seconds histogram
retrieval_latency_seconds_sum {}
retrieval_latency_seconds_count {}
# HELP generation_failures_total Failed generation calls
# TYPE generation_failures_total counter
generation_failures_total {}
# HELP errors_total Total errors
# TYPE errors_total counter
errors_total {}
"#,
            self.http_requests_total.load(Ordering::SeqCst),
            self.http_request_duration_sum.load(Ordering::SeqCst) as f64 / 1000.0,
            self.http_requests_total.load(Ordering::SeqCst),
            self.chat_turns_total.load(Ordering::SeqCst),
            self.conversations_started.load(Ordering::SeqCst),
            self.retrieval_requests_total.load(Ordering::SeqCst),
            self.retrieval_latency_sum.load(Ordering::SeqCst) as f64 / 1000.0,
            self.retrieval_requests_total.load(Ordering::SeqCst),
            self.generation_failures_total.load(Ordering::SeqCst),
            self.errors_total.load(Ordering::SeqCst),
        )
    }
}

// ===== Health Check =====

/// Health status body
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
}

/// Observability state
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: String, metrics: Arc<AppMetrics>) -> Self {
        Self {
            metrics,
            start_time: Utc::now(),
            version,
        }
    }

    /// Process uptime
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }
}

/// Full health status
pub async fn health_check(
    state: axum::extract::State<Arc<ObservabilityState>>,
) -> impl IntoResponse {
    let health_status = HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(health_status)
}

/// Liveness probe
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// Readiness probe
pub async fn readiness() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "Ready")
}

/// Prometheus metrics endpoint
pub async fn metrics(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let output = state.metrics.gather();
    (axum::http::StatusCode::OK, output)
}

/// Version endpoint
pub async fn version(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Observability router
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// Initialize tracing.
///
/// Logs to a daily-rolling file when a log directory is configured, stdout
/// otherwise. The returned guard must be held for the process lifetime so
/// buffered log lines are flushed.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Option<WorkerGuard> {
    let default_filter = if config.level.is_empty() {
        format!("info,{}=debug", service_name)
    } else {
        config.level.clone()
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);

    match &config.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, format!("{}.log", service_name));
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .init();
            None
        }
    }
}
