//! Grade prediction library
//!
//! This crate provides the core functionality for:
//! - Aligning submitted grades to a model's feature order
//! - Running the exported regressor and summarizing its output
//! - Loading the model artifact and its course catalog
//! - Health checks and observability

pub mod artifact;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use artifact::{ArtifactConfig, ModelArtifact};
pub use error::{ArtifactError, PredictionError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::{GradeModel, PredictionService};
