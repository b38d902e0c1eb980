//! ONNX inference using tract
//!
//! Runs the exported grade regressor on a single row of aligned features.
//! The model is optimized once at load time for a `[1, n_features]` input.

use super::GradeModel;
use anyhow::{Context, Result};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Inference latency above which a warning is logged
const MAX_INFERENCE_MS: u128 = 50;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-based grade model using tract for lightweight inference
pub struct OnnxModel {
    model: TractModel,
    num_features: usize,
    name: String,
}

impl OnnxModel {
    /// Create a model from ONNX bytes expecting `num_features` inputs
    pub fn new(model_bytes: &[u8], num_features: usize, name: impl Into<String>) -> Result<Self> {
        let model = Self::load_model(model_bytes, num_features)?;
        Ok(Self {
            model,
            num_features,
            name: name.into(),
        })
    }

    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8], num_features: usize) -> Result<TractModel> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, num_features]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(model)
    }

    fn features_to_tensor(&self, features: &[f64]) -> Result<Tensor> {
        let data: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let array = tract_ndarray::Array2::from_shape_vec((1, self.num_features), data)
            .context("Feature vector does not match model input shape")?;
        Ok(array.into())
    }
}

impl GradeModel for OnnxModel {
    fn predict(&self, features: &[f64]) -> Result<Vec<f64>> {
        let start = Instant::now();

        if features.len() != self.num_features {
            anyhow::bail!(
                "Feature vector has {} values, model expects {}",
                features.len(),
                self.num_features
            );
        }

        let input = self.features_to_tensor(features)?;
        let result = self.model.run(tvec!(input.into()))?;
        let output = result.first().context("No output from model")?;
        let values: Vec<f64> = output
            .to_array_view::<f32>()
            .context("Model output is not a float tensor")?
            .iter()
            .map(|v| *v as f64)
            .collect();

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), outputs = values.len(), "Inference completed");
        }

        Ok(values)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
