//! Observability infrastructure for the grade predictor
//!
//! Provides:
//! - Prometheus metrics (prediction latency, request outcomes, input coverage, model info)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, GaugeVec, Histogram, IntCounter,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_served: IntCounter,
    prediction_errors: IntCounter,
    defaulted_features: IntCounter,
    ignored_grades: IntCounter,
    model_info: GaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "grade_predictor_prediction_latency_seconds",
                "Time spent aligning, running and summarizing a prediction",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_served: register_int_counter!(
                "grade_predictor_predictions_served_total",
                "Total number of successful predictions"
            )
            .expect("Failed to register predictions_served"),

            prediction_errors: register_int_counter!(
                "grade_predictor_prediction_errors_total",
                "Total number of failed predictions"
            )
            .expect("Failed to register prediction_errors"),

            defaulted_features: register_int_counter!(
                "grade_predictor_defaulted_features_total",
                "Input courses missing from requests and filled with the default grade"
            )
            .expect("Failed to register defaulted_features"),

            ignored_grades: register_int_counter!(
                "grade_predictor_ignored_grades_total",
                "Request grades dropped because the model does not use the course"
            )
            .expect("Failed to register ignored_grades"),

            model_info: register_gauge_vec!(
                "grade_predictor_model_info",
                "Information about the currently loaded model",
                &["model", "input_courses", "output_courses"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions_served(&self) {
        self.inner().predictions_served.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors.inc();
    }

    /// Record how many features were defaulted and grades ignored for one request
    pub fn record_input_coverage(&self, defaulted: usize, ignored: usize) {
        self.inner().defaulted_features.inc_by(defaulted as u64);
        self.inner().ignored_grades.inc_by(ignored as u64);
    }

    /// Update model info
    pub fn set_model_info(&self, model: &str, input_courses: usize, output_courses: usize) {
        let inputs = input_courses.to_string();
        let outputs = output_courses.to_string();
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[model, inputs.as_str(), outputs.as_str()])
            .set(1.0);
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for prediction requests,
/// model loading and lifecycle events.
#[derive(Clone)]
pub struct StructuredLogger {
    model: String,
}

impl StructuredLogger {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Log the shape of an incoming prediction request
    pub fn log_prediction_request(
        &self,
        received: usize,
        expected: usize,
        defaulted: &[String],
        ignored: &[String],
    ) {
        info!(
            event = "prediction_request",
            model = %self.model,
            received_courses = received,
            expected_courses = expected,
            defaulted_courses = ?defaulted,
            ignored_courses = ?ignored,
            "Prediction request received"
        );
    }

    /// Log a successful prediction
    pub fn log_prediction(&self, outputs: usize, average: f64, pass_rate: f64, elapsed_ms: f64) {
        info!(
            event = "prediction_served",
            model = %self.model,
            outputs = outputs,
            average = average,
            pass_rate = pass_rate,
            elapsed_ms = elapsed_ms,
            "Prediction completed"
        );
    }

    /// Log a failed prediction
    pub fn log_prediction_failure(&self, error: &str) {
        warn!(
            event = "prediction_failed",
            model = %self.model,
            error = %error,
            "Prediction failed"
        );
    }

    /// Log a loaded model artifact
    pub fn log_model_loaded(&self, input_courses: usize, output_courses: usize, checksum: &str) {
        info!(
            event = "model_loaded",
            model = %self.model,
            input_courses = input_courses,
            output_courses = output_courses,
            checksum = %checksum,
            "Model artifact loaded"
        );
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, addr: &str) {
        info!(
            event = "service_started",
            model = %self.model,
            service_version = %version,
            addr = %addr,
            "Grade predictor started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            model = %self.model,
            reason = %reason,
            "Grade predictor shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_metrics_creation() {
        // Metrics live in the global Prometheus registry, so repeated handles share them
        let metrics = ServiceMetrics::new();
        let again = ServiceMetrics::new();

        metrics.observe_prediction_latency(0.002);
        metrics.inc_predictions_served();
        again.inc_prediction_errors();
        again.record_input_coverage(3, 1);
        metrics.set_model_info("test-model", 30, 12);
    }

    #[test]
    fn test_model_info_registered() {
        let metrics = ServiceMetrics::new();
        metrics.set_model_info("info-model", 4, 2);

        let families = prometheus::gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "grade_predictor_model_info"));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-model");
        assert_eq!(logger.model, "test-model");
    }
}
