//! Prediction output formatting
//!
//! Pairs raw model outputs with their course identifiers and computes the
//! summary statistics returned alongside them.

use crate::error::PredictionError;
use crate::models::PredictionResponse;

/// Predicted grade at or above which a course counts as passed
pub const PASS_THRESHOLD: f64 = 50.0;

/// Formats raw model outputs into a PredictionResponse
pub struct OutputFormatter<'a> {
    output_courses: &'a [String],
}

impl<'a> OutputFormatter<'a> {
    pub fn new(output_courses: &'a [String]) -> Self {
        Self { output_courses }
    }

    /// Format raw model outputs, one value per output course in catalog order
    pub fn format(&self, raw_outputs: &[f64]) -> Result<PredictionResponse, PredictionError> {
        if raw_outputs.is_empty() {
            return Err(PredictionError::EmptyOutput);
        }
        if raw_outputs.len() != self.output_courses.len() {
            return Err(PredictionError::ShapeMismatch {
                expected: self.output_courses.len(),
                actual: raw_outputs.len(),
            });
        }

        let predictions = self
            .output_courses
            .iter()
            .cloned()
            .zip(raw_outputs.iter().copied())
            .collect();

        Ok(PredictionResponse {
            predictions,
            average: mean(raw_outputs),
            pass_rate: pass_rate(raw_outputs),
        })
    }
}

/// Summarize `output_vector` against `output_courses`
pub fn summarize(
    output_vector: &[f64],
    output_courses: &[String],
) -> Result<PredictionResponse, PredictionError> {
    OutputFormatter::new(output_courses).format(output_vector)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentage of values at or above the pass threshold
fn pass_rate(values: &[f64]) -> f64 {
    let passed = values.iter().filter(|v| **v >= PASS_THRESHOLD).count();
    100.0 * passed as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn courses(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("I33{:02}", i)).collect()
    }

    #[test]
    fn test_predictions_paired_by_position() {
        let out = courses(3);
        let response = summarize(&[61.0, 48.5, 77.0], &out).unwrap();
        assert_eq!(response.predictions.len(), 3);
        assert_eq!(response.predictions["I3300"], 61.0);
        assert_eq!(response.predictions["I3301"], 48.5);
        assert_eq!(response.predictions["I3302"], 77.0);
    }

    #[test]
    fn test_average_is_arithmetic_mean() {
        let response = summarize(&[40.0, 60.0, 80.0, 100.0], &courses(4)).unwrap();
        assert!((response.average - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_pass_rate_counts_threshold_as_pass() {
        let response = summarize(&[50.0, 49.999, 75.0], &courses(3)).unwrap();
        assert_eq!(response.pass_rate, 100.0 * 2.0 / 3.0);
    }

    #[test]
    fn test_pass_rate_bounds() {
        let all_fail = summarize(&[10.0, 20.0], &courses(2)).unwrap();
        assert_eq!(all_fail.pass_rate, 0.0);

        let all_pass = summarize(&[50.0, 99.0], &courses(2)).unwrap();
        assert_eq!(all_pass.pass_rate, 100.0);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = summarize(&[60.0, 70.0], &courses(3)).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::ShapeMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_empty_output_rejected() {
        let err = summarize(&[], &courses(2)).unwrap_err();
        assert!(matches!(err, PredictionError::EmptyOutput));
    }
}
