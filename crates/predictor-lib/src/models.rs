//! Core data models for the grade predictor

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::ArtifactError;

/// Grades submitted for prediction, keyed by course identifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeInput {
    pub grades: HashMap<String, f64>,
}

/// Prediction result returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predictions: BTreeMap<String, f64>,
    pub average: f64,
    pub pass_rate: f64,
}

/// Feature vector aligned to the model's trained column order
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFeatures {
    pub values: Vec<f64>,
    /// Input courses absent from the request, filled with the default grade
    pub defaulted: Vec<String>,
    /// Request keys that are not model features and were dropped
    pub ignored: Vec<String>,
}

/// Ordered course lists fixed when the model artifact is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCatalog {
    input_courses: Vec<String>,
    output_courses: Vec<String>,
}

impl CourseCatalog {
    /// Build a catalog, rejecting empty lists and duplicate identifiers
    pub fn new(
        input_courses: Vec<String>,
        output_courses: Vec<String>,
    ) -> Result<Self, ArtifactError> {
        validate_courses("input", &input_courses)?;
        validate_courses("output", &output_courses)?;
        Ok(Self {
            input_courses,
            output_courses,
        })
    }

    pub fn input_courses(&self) -> &[String] {
        &self.input_courses
    }

    pub fn output_courses(&self) -> &[String] {
        &self.output_courses
    }
}

fn validate_courses(kind: &'static str, courses: &[String]) -> Result<(), ArtifactError> {
    if courses.is_empty() {
        return Err(ArtifactError::InvalidCourses {
            kind,
            reason: "list is empty".to_string(),
        });
    }
    let mut seen = HashSet::with_capacity(courses.len());
    for course in courses {
        if !seen.insert(course.as_str()) {
            return Err(ArtifactError::InvalidCourses {
                kind,
                reason: format!("duplicate course '{}'", course),
            });
        }
    }
    Ok(())
}
