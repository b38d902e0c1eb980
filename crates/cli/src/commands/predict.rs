//! Grade prediction command

use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tabled::Tabled;

use crate::client::{ApiClient, PredictRequest, PredictResponse};
use crate::curriculum;
use crate::output::{color_grade, color_pass_rate, format_grade, pass_label, print_warning, OutputFormat};

/// Row for predictions table
#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Course")]
    course: String,
    #[tabled(rename = "Predicted")]
    predicted: String,
    #[tabled(rename = "Result")]
    result: String,
}

/// Parse a `COURSE=GRADE` override
pub fn parse_grade_override(s: &str) -> Result<(String, f64), String> {
    let (course, grade) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COURSE=GRADE, got '{}'", s))?;
    let course = course.trim();
    if course.is_empty() {
        return Err(format!("missing course in '{}'", s));
    }
    let grade: f64 = grade
        .trim()
        .parse()
        .map_err(|_| format!("invalid grade in '{}'", s))?;
    Ok((course.to_string(), grade))
}

/// Grade used by `--fill-average` when no grades are given
const FALLBACK_FILL: f64 = 70.0;

/// How curriculum courses left out of the file and overrides are filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Value(f64),
    /// Rounded mean of the given grades
    Average,
}

/// Build the grades map: curriculum fill, then file, then overrides, clamped to 0-100
pub fn build_grades(
    file_grades: Option<HashMap<String, f64>>,
    fill: Option<Fill>,
    overrides: &[(String, f64)],
) -> BTreeMap<String, f64> {
    let mut given: BTreeMap<String, f64> = file_grades.unwrap_or_default().into_iter().collect();
    given.extend(overrides.iter().cloned());
    for grade in given.values_mut() {
        *grade = grade.clamp(0.0, 100.0);
    }

    let fill_value = match fill {
        Some(Fill::Value(value)) => Some(value.clamp(0.0, 100.0)),
        Some(Fill::Average) => Some(rounded_mean(&given)),
        None => None,
    };

    let mut grades = BTreeMap::new();
    if let Some(value) = fill_value {
        for course in curriculum::all_courses() {
            grades.insert(course.to_string(), value);
        }
    }
    grades.extend(given);
    grades
}

fn rounded_mean(grades: &BTreeMap<String, f64>) -> f64 {
    if grades.is_empty() {
        return FALLBACK_FILL;
    }
    (grades.values().sum::<f64>() / grades.len() as f64).round()
}

/// Read a JSON object of course grades, either bare or wrapped in `grades`
pub fn read_grades_file(path: &Path) -> Result<HashMap<String, f64>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read grades file {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).context("Grades file is not valid JSON")?;
    let grades = match value.get("grades") {
        Some(inner) => inner.clone(),
        None => value,
    };
    serde_json::from_value(grades).context("Grades file must map course ids to numbers")
}

/// Request a prediction and print it
pub async fn predict(
    client: &ApiClient,
    grades_file: Option<&Path>,
    fill: Option<Fill>,
    overrides: &[(String, f64)],
    format: OutputFormat,
) -> Result<()> {
    let file_grades = grades_file.map(read_grades_file).transpose()?;
    let request = PredictRequest {
        grades: build_grades(file_grades, fill, overrides),
    };

    if request.grades.is_empty() {
        print_warning("No grades given; the service will use its default for every course");
    }

    let result = client.predict(&request).await?;
    print_prediction(&result, format)
}

fn print_prediction(result: &PredictResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(result)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!("{}", "Predicted Grades".bold());
            println!("{}", "=".repeat(40));

            let rows: Vec<PredictionRow> = result
                .predictions
                .iter()
                .map(|(course, grade)| PredictionRow {
                    course: course.clone(),
                    predicted: color_grade(*grade),
                    result: pass_label(*grade),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            println!();
            println!("Average:   {}", format_grade(result.average).bold());
            println!("Pass rate: {}", color_pass_rate(result.pass_rate));
        }
    }

    Ok(())
}
