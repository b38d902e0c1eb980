//! HTTP API: prediction, health checks and Prometheus metrics

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    health::{ComponentStatus, HealthRegistry},
    GradeInput, PredictionResponse, PredictionService,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Name reported by the root endpoint
pub const MODEL_DISPLAY_NAME: &str = "XGBoost Grade Predictor";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub health_registry: HealthRegistry,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>, health_registry: HealthRegistry) -> Self {
        Self {
            service,
            health_registry,
        }
    }
}

/// Error returned by `/predict`; always a 400 carrying the failure message
#[derive(Debug)]
pub struct ApiError(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "detail": self.0 }))).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ServiceStatus {
    status: &'static str,
    model: &'static str,
}

async fn home() -> impl IntoResponse {
    Json(ServiceStatus {
        status: "running",
        model: MODEL_DISPLAY_NAME,
    })
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GradeInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(input) = payload.map_err(|rejection| {
        state
            .service
            .logger()
            .log_prediction_failure(&rejection.body_text());
        ApiError(rejection.body_text())
    })?;

    let service = state.service.clone();
    let outcome = tokio::task::spawn_blocking(move || service.predict(&input)).await;

    match outcome {
        Ok(Ok(response)) => Ok(Json(response)),
        Ok(Err(err)) => Err(ApiError(err.to_string())),
        Err(join_err) => {
            // The model panicked; the service keeps serving
            let message = format!("Inference task failed: {}", join_err);
            state.service.record_aborted(&message);
            Err(ApiError(message))
        }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/predict", post(predict))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolve once `signal` fires
///
/// A listener that fails to install is logged and never resolves, so the
/// server keeps running instead of shutting down on startup.
pub async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Start the API server, returning once `shutdown` resolves
pub async fn serve(
    addr: &str,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
