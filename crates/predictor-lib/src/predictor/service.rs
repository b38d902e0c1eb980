//! Prediction service
//!
//! Immutable context built once at startup: the loaded model and its course
//! catalog. Each call aligns the request, runs the model and summarizes the
//! output without touching shared state beyond metrics.

use super::features::FeatureAligner;
use super::output::OutputFormatter;
use super::GradeModel;
use crate::artifact::ModelArtifact;
use crate::error::PredictionError;
use crate::models::{CourseCatalog, GradeInput, PredictionResponse};
use crate::observability::{ServiceMetrics, StructuredLogger};
use std::sync::Arc;
use std::time::Instant;

pub struct PredictionService {
    model: Arc<dyn GradeModel>,
    catalog: CourseCatalog,
    metrics: ServiceMetrics,
    logger: StructuredLogger,
}

impl PredictionService {
    pub fn new(model: Arc<dyn GradeModel>, catalog: CourseCatalog) -> Self {
        let metrics = ServiceMetrics::new();
        metrics.set_model_info(
            model.name(),
            catalog.input_courses().len(),
            catalog.output_courses().len(),
        );
        let logger = StructuredLogger::new(model.name());

        Self {
            model,
            catalog,
            metrics,
            logger,
        }
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        Self::new(artifact.model, artifact.catalog)
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Align, infer and summarize a single request
    pub fn predict(&self, input: &GradeInput) -> Result<PredictionResponse, PredictionError> {
        let start = Instant::now();

        let result = self.run(input);

        let elapsed = start.elapsed();
        self.metrics.observe_prediction_latency(elapsed.as_secs_f64());
        match &result {
            Ok(response) => {
                self.metrics.inc_predictions_served();
                self.logger.log_prediction(
                    response.predictions.len(),
                    response.average,
                    response.pass_rate,
                    elapsed.as_secs_f64() * 1000.0,
                );
            }
            Err(err) => {
                self.metrics.inc_prediction_errors();
                self.logger.log_prediction_failure(&err.to_string());
            }
        }

        result
    }

    /// Record a prediction that never returned, e.g. a panic inside the model
    pub fn record_aborted(&self, message: &str) {
        self.metrics.inc_prediction_errors();
        self.logger.log_prediction_failure(message);
    }

    fn run(&self, input: &GradeInput) -> Result<PredictionResponse, PredictionError> {
        let features = FeatureAligner::new(self.catalog.input_courses()).align(&input.grades);

        self.logger.log_prediction_request(
            input.grades.len(),
            self.catalog.input_courses().len(),
            &features.defaulted,
            &features.ignored,
        );
        self.metrics
            .record_input_coverage(features.defaulted.len(), features.ignored.len());

        let outputs = self.model.predict(&features.values)?;

        OutputFormatter::new(self.catalog.output_courses()).format(&outputs)
    }
}
