//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::core::runtime::SignalRuntime;
use crate::core::state::EngineStatus;
use crate::error::{ControlError, SnapshotError};
use crate::metrics::Metrics;
use crate::models::signal::SignalRecord;

pub const SERVICE_NAME: &str = "emacross-signal-engine";

/// Consecutive failed cycles after which `/health` reports `degraded`.
pub const DEGRADED_AFTER_FAILURES: u64 = 3;

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub runtime: Arc<SignalRuntime>,
}

impl AppState {
    pub fn new(runtime: Arc<SignalRuntime>, metrics: Arc<Metrics>) -> Self {
        Self {
            metrics,
            start_time: Arc::new(Instant::now()),
            runtime,
        }
    }
}

pub fn health_label(consecutive_failures: u64) -> &'static str {
    if consecutive_failures >= DEGRADED_AFTER_FAILURES {
        "degraded"
    } else {
        "healthy"
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let status = state.runtime.status().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health_label(status.consecutive_failures),
        "running": status.running,
        "consecutive_failures": status.consecutive_failures,
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

async fn get_status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.runtime.status().await)
}

#[derive(Debug, Deserialize)]
struct SignalsQuery {
    limit: Option<usize>,
}

/// Recent signals, most recent first
async fn list_signals(
    State(state): State<AppState>,
    Query(params): Query<SignalsQuery>,
) -> Json<Vec<SignalRecord>> {
    let limit = params
        .limit
        .unwrap_or(state.runtime.config().ledger_capacity);
    Json(state.runtime.recent_signals(limit).await)
}

async fn start_engine(State(state): State<AppState>) -> Response {
    match state.runtime.start().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "started" }))).into_response(),
        Err(e @ ControlError::AlreadyRunning) => (
            StatusCode::CONFLICT,
            Json(json!({ "status": "already_running", "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn stop_engine(State(state): State<AppState>) -> Json<Value> {
    if state.runtime.stop().await {
        Json(json!({ "status": "stopped" }))
    } else {
        Json(json!({
            "status": "not_running",
            "message": ControlError::NotRunning.to_string()
        }))
    }
}

/// Latest price and indicator values, computed on demand
async fn current_price(State(state): State<AppState>) -> Response {
    match state.runtime.snapshot().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e @ SnapshotError::InsufficientData(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to build market snapshot");
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/status", get(get_status))
        .route("/api/signals", get(list_signals))
        .route("/api/start_bot", post(start_engine))
        .route("/api/stop_bot", post(stop_engine))
        .route("/api/current_price", get(current_price))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    runtime: Arc<SignalRuntime>,
    metrics: Arc<Metrics>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(AppState::new(runtime, metrics));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
