use axum::{http::StatusCode, response::Json, routing::get, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Readiness check response.
#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    ready: bool,
}

/// Shared readiness state, driven by the device link status.
#[derive(Clone, Default)]
pub struct HealthState {
    ready: Arc<AtomicBool>,
}

impl HealthState {
    /// Create a new health state; not ready until the device link is up.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mark the service as ready.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }

    /// Check if the service is ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }
}

/// Serve Prometheus metrics plus `/health` and `/ready` on a separate
/// address from the control surface.
///
/// # Errors
///
/// Returns an error if installing the recorder or binding the metrics HTTP
/// server fails.
pub async fn start_metrics_server(
    addr: SocketAddr,
    health_state: HealthState,
) -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    let app = Router::new()
        .route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
        .route("/health", get(health_handler))
        .route("/ready", get(move || ready_handler(health_state.clone())));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("metrics server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Health check handler - returns 200 if the process is running.
async fn health_handler() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "healthy" }))
}

/// Readiness check handler - returns 200 if the device link is up, 503 if not.
async fn ready_handler(state: HealthState) -> (StatusCode, Json<ReadyResponse>) {
    if state.is_ready() {
        (
            StatusCode::OK,
            Json(ReadyResponse {
                status: "ready",
                ready: true,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                status: "not ready",
                ready: false,
            }),
        )
    }
}

/// Device link gauges.
pub mod gauges {
    /// Set whether the device link is currently connected.
    pub fn device_link_up(up: bool) {
        metrics::gauge!("hashgate_device_link_up").set(if up { 1.0 } else { 0.0 });
    }
}

/// Event counters.
pub mod counters {
    /// Record a publish attempt with its outcome label.
    pub fn publishes_total(result: &'static str) {
        metrics::counter!("hashgate_publishes_total", "result" => result).increment(1);
    }

    /// Record an inbound result frame with its staleness-filter outcome.
    pub fn results_total(status: &'static str) {
        metrics::counter!("hashgate_results_total", "status" => status).increment(1);
    }

    /// Increment the work-frames-sent counter.
    pub fn frames_sent_total() {
        metrics::counter!("hashgate_frames_sent_total").increment(1);
    }

    /// Increment the device reconnect-attempts counter.
    pub fn reconnects_total() {
        metrics::counter!("hashgate_reconnects_total").increment(1);
    }
}
