//! Feature alignment for ML inference
//!
//! Lays a request's grades out in the exact column order the model was
//! trained on. Courses missing from the request are filled with a default
//! grade and keys the model does not know are dropped.

use crate::models::AlignedFeatures;
use std::collections::HashMap;

/// Grade substituted for input courses missing from a request
pub const DEFAULT_GRADE: f64 = 70.0;

/// Aligns grade mappings to a fixed feature order
pub struct FeatureAligner<'a> {
    input_courses: &'a [String],
    default_grade: f64,
}

impl<'a> FeatureAligner<'a> {
    pub fn new(input_courses: &'a [String]) -> Self {
        Self {
            input_courses,
            default_grade: DEFAULT_GRADE,
        }
    }

    pub fn align(&self, grades: &HashMap<String, f64>) -> AlignedFeatures {
        let mut defaulted = Vec::new();
        let values = self
            .input_courses
            .iter()
            .map(|course| match grades.get(course) {
                Some(grade) => *grade,
                None => {
                    defaulted.push(course.clone());
                    self.default_grade
                }
            })
            .collect();

        let mut ignored: Vec<String> = grades
            .keys()
            .filter(|key| !self.input_courses.contains(key))
            .cloned()
            .collect();
        ignored.sort();

        AlignedFeatures {
            values,
            defaulted,
            ignored,
        }
    }
}

/// Align `grades` to `input_courses` using the default grade for gaps
pub fn align(grades: &HashMap<String, f64>, input_courses: &[String]) -> Vec<f64> {
    FeatureAligner::new(input_courses).align(grades).values
}
