//! Curriculum listing command

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::curriculum::SEMESTERS;
use crate::output::OutputFormat;

/// Print the input courses grouped by semester
pub fn show_courses(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let semesters: serde_json::Map<String, serde_json::Value> = SEMESTERS
                .iter()
                .map(|(name, courses)| (name.to_string(), json!(courses)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&semesters)?);
        }
        OutputFormat::Table => {
            for (name, courses) in SEMESTERS.iter() {
                println!("{}", name.bold());
                println!("  {}", courses.join("  "));
            }
        }
    }
    Ok(())
}
