//! Grade Predictor CLI
//!
//! A command-line tool for requesting grade predictions from the service,
//! checking its status, and filtering student record spreadsheets.

mod client;
mod commands;
mod curriculum;
mod output;
mod spreadsheet;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{courses, filter, predict, status};
use std::path::PathBuf;

/// Grade Predictor CLI
#[derive(Parser)]
#[command(name = "gp")]
#[command(author, version, about = "CLI for the Grade Predictor service", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via GP_API_URL env var)
    #[arg(long, env = "GP_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show service and health status
    Status,

    /// Predict third-year grades from first- and second-year grades
    Predict {
        /// JSON file mapping course ids to grades
        #[arg(long, short)]
        grades: Option<PathBuf>,

        /// Set a single grade, e.g. --set M1100=72 (repeatable)
        #[arg(long = "set", value_name = "COURSE=GRADE", value_parser = predict::parse_grade_override)]
        overrides: Vec<(String, f64)>,

        /// Fill every curriculum course not given otherwise with this grade
        #[arg(long)]
        fill: Option<f64>,

        /// Fill every curriculum course not given otherwise with the rounded average of the given grades
        #[arg(long, conflicts_with = "fill")]
        fill_average: bool,
    },

    /// List the curriculum courses the model takes as input
    Courses,

    /// Filter a student records spreadsheet by program code
    Filter {
        /// Input spreadsheet (xlsx, xls or ods)
        #[arg(long, short, default_value = "G2024.xlsx")]
        input: PathBuf,

        /// Output xlsx file
        #[arg(long, short, default_value = "G2024_informatic.xlsx")]
        output: PathBuf,

        /// Program code column
        #[arg(long, default_value = "specia")]
        column: String,

        /// Program code prefix to keep
        #[arg(long, default_value = "I")]
        prefix: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            let client = client::ApiClient::new(&cli.api_url)?;
            status::show_status(&client, cli.format).await?;
        }
        Commands::Predict {
            grades,
            overrides,
            fill,
            fill_average,
        } => {
            let fill = match fill {
                Some(value) => Some(predict::Fill::Value(value)),
                None if fill_average => Some(predict::Fill::Average),
                None => None,
            };
            let client = client::ApiClient::new(&cli.api_url)?;
            predict::predict(&client, grades.as_deref(), fill, &overrides, cli.format).await?;
        }
        Commands::Courses => {
            courses::show_courses(cli.format)?;
        }
        Commands::Filter {
            input,
            output,
            column,
            prefix,
        } => {
            filter::filter_records(&input, &output, &column, &prefix)?;
        }
    }

    Ok(())
}
