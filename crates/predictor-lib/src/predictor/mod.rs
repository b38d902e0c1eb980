//! ML prediction engine

mod features;
mod inference;
mod output;
mod service;

pub use features::{align, FeatureAligner, DEFAULT_GRADE};
pub use inference::OnnxModel;
pub use output::{summarize, OutputFormatter, PASS_THRESHOLD};
pub use service::PredictionService;

use anyhow::Result;

/// Trait for grade model implementations
///
/// A model takes one row of features ordered like the input course list and
/// returns one value per output course, in output course order.
pub trait GradeModel: Send + Sync {
    /// Predict output grades from an aligned feature vector
    fn predict(&self, features: &[f64]) -> Result<Vec<f64>>;

    /// Human-readable model name for logs and metrics
    fn name(&self) -> &str;
}
