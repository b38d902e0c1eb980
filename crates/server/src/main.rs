//! Grade Predictor - HTTP inference service
//!
//! Loads the exported grade model once at startup and serves predictions
//! until interrupted.

use anyhow::{Context, Result};
use grade_predictor::{
    api::{self, AppState, MODEL_DISPLAY_NAME},
    config::ServerConfig,
};
use predictor_lib::{
    health::{components, HealthRegistry},
    ModelArtifact, PredictionService,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting grade-predictor");

    let config = ServerConfig::load()?;
    info!(model_dir = %config.model_dir.display(), addr = %config.bind_address(), "Service configured");

    let health_registry = HealthRegistry::new();
    health_registry.register(components::API).await;

    let artifact = ModelArtifact::load(&config.artifact_config(), MODEL_DISPLAY_NAME)
        .map_err(|e| {
            error!(error = %e, "Model artifact could not be loaded");
            e
        })
        .context("Failed to load model artifact")?;
    let checksum = artifact.checksum.clone();

    let service = Arc::new(PredictionService::from_artifact(artifact));
    let logger = service.logger().clone();
    logger.log_model_loaded(
        service.catalog().input_courses().len(),
        service.catalog().output_courses().len(),
        &checksum,
    );
    health_registry.register(components::MODEL).await;

    let app_state = Arc::new(AppState::new(service, health_registry.clone()));
    health_registry.set_ready(true).await;

    let addr = config.bind_address();
    logger.log_startup(SERVICE_VERSION, &addr);

    api::serve(&addr, app_state, api::wait_for_signal(tokio::signal::ctrl_c())).await?;

    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
