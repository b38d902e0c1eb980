//! Error types for prediction and model artifact loading

use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning a grade input into a prediction
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("{0}")]
    Inference(String),

    #[error("model returned {actual} predictions, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("model returned no predictions")]
    EmptyOutput,
}

impl From<anyhow::Error> for PredictionError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate format keeps the context chain
        PredictionError::Inference(format!("{:#}", err))
    }
}

/// Failure while loading the model artifact at startup
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse course list {}: {source}", path.display())]
    CourseList {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {kind} course list: {reason}")]
    InvalidCourses { kind: &'static str, reason: String },

    #[error("model checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("failed to load model: {0:#}")]
    Model(anyhow::Error),
}
