//! Server configuration

use anyhow::{Context, Result};
use predictor_lib::artifact::{
    ArtifactConfig, DEFAULT_FEATURE_COLUMNS_FILE, DEFAULT_MODEL_FILE, DEFAULT_TARGET_COLUMNS_FILE,
};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable prefix, e.g. `GRADE_PORT`, `GRADE_MODEL_DIR`
const ENV_PREFIX: &str = "GRADE";

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    /// Falls back to the plain `PORT` variable used by hosting platforms
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the model and its column lists
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    #[serde(default = "default_model_file")]
    pub model_file: String,

    #[serde(default = "default_feature_columns_file")]
    pub feature_columns_file: String,

    #[serde(default = "default_target_columns_file")]
    pub target_columns_file: String,

    /// Expected SHA-256 of the model file; unchecked when unset
    #[serde(default)]
    pub model_sha256: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000)
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("model")
}

fn default_model_file() -> String {
    DEFAULT_MODEL_FILE.to_string()
}

fn default_feature_columns_file() -> String {
    DEFAULT_FEATURE_COLUMNS_FILE.to_string()
}

fn default_target_columns_file() -> String {
    DEFAULT_TARGET_COLUMNS_FILE.to_string()
}

impl ServerConfig {
    /// Load configuration from `GRADE_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_env(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_env(source: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(source.try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid server configuration")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn artifact_config(&self) -> ArtifactConfig {
        ArtifactConfig {
            model_dir: self.model_dir.clone(),
            model_file: self.model_file.clone(),
            feature_columns_file: self.feature_columns_file.clone(),
            target_columns_file: self.target_columns_file.clone(),
            expected_sha256: self.model_sha256.clone(),
        }
    }
}
