//! Model artifact loading
//!
//! An artifact directory holds the exported ONNX regressor plus two JSON
//! arrays naming the feature columns and target columns in model order.
//! Everything is read once at startup and never reloaded.

use crate::error::ArtifactError;
use crate::models::CourseCatalog;
use crate::predictor::{GradeModel, OnnxModel};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_MODEL_FILE: &str = "grade_model.onnx";
pub const DEFAULT_FEATURE_COLUMNS_FILE: &str = "feature_columns.json";
pub const DEFAULT_TARGET_COLUMNS_FILE: &str = "target_columns.json";

/// Locations of the artifact files
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub model_dir: PathBuf,
    pub model_file: String,
    pub feature_columns_file: String,
    pub target_columns_file: String,
    /// Expected SHA-256 of the model file, hex encoded
    pub expected_sha256: Option<String>,
}

impl ArtifactConfig {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            feature_columns_file: DEFAULT_FEATURE_COLUMNS_FILE.to_string(),
            target_columns_file: DEFAULT_TARGET_COLUMNS_FILE.to_string(),
            expected_sha256: None,
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }

    pub fn feature_columns_path(&self) -> PathBuf {
        self.model_dir.join(&self.feature_columns_file)
    }

    pub fn target_columns_path(&self) -> PathBuf {
        self.model_dir.join(&self.target_columns_file)
    }
}

/// A loaded model together with its course catalog
pub struct ModelArtifact {
    pub model: Arc<dyn GradeModel>,
    pub catalog: CourseCatalog,
    pub checksum: String,
}

impl ModelArtifact {
    /// Load the course lists and the ONNX model described by `config`
    pub fn load(config: &ArtifactConfig, model_name: &str) -> Result<Self, ArtifactError> {
        let input_courses = load_course_list(&config.feature_columns_path())?;
        let output_courses = load_course_list(&config.target_columns_path())?;
        let catalog = CourseCatalog::new(input_courses, output_courses)?;

        let model_path = config.model_path();
        let bytes = read_file(&model_path)?;
        let checksum = compute_checksum(&bytes);
        if let Some(expected) = &config.expected_sha256 {
            verify_checksum(expected, &checksum)?;
        }
        debug!(path = %model_path.display(), size = bytes.len(), checksum = %checksum, "Read model file");

        let model = OnnxModel::new(&bytes, catalog.input_courses().len(), model_name)
            .map_err(ArtifactError::Model)?;

        Ok(Self {
            model: Arc::new(model),
            catalog,
            checksum,
        })
    }
}

/// Read a JSON array of course identifiers
pub fn load_course_list(path: &Path) -> Result<Vec<String>, ArtifactError> {
    let content = read_file(path)?;
    serde_json::from_slice(&content).map_err(|source| ArtifactError::CourseList {
        path: path.to_path_buf(),
        source,
    })
}

fn read_file(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn verify_checksum(expected: &str, actual: &str) -> Result<(), ArtifactError> {
    if expected.trim().eq_ignore_ascii_case(actual) {
        Ok(())
    } else {
        Err(ArtifactError::ChecksumMismatch {
            expected: expected.trim().to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Compute SHA256 checksum of data
fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
