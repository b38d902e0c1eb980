//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Grade at or above which a predicted course is shown as passed
pub const PASS_MARK: f64 = 50.0;

/// Grade at or above which a predicted course is shown as excellent
pub const EXCELLENT_MARK: f64 = 70.0;

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a grade with one decimal
pub fn format_grade(grade: f64) -> String {
    format!("{:.1}", grade)
}

/// Format a percentage without decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value)
}

/// Color a grade by its tier
pub fn color_grade(grade: f64) -> String {
    let formatted = format_grade(grade);
    if grade >= EXCELLENT_MARK {
        formatted.green().to_string()
    } else if grade >= PASS_MARK {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Tier label for a predicted grade: Excellent, Pass or Risk
pub fn pass_label(grade: f64) -> String {
    if grade >= EXCELLENT_MARK {
        "✓ Excellent".green().bold().to_string()
    } else if grade >= PASS_MARK {
        "✓ Pass".yellow().bold().to_string()
    } else {
        "✗ Risk".red().bold().to_string()
    }
}

/// Color pass rate: green from 75%, yellow from 50%, red below
pub fn color_pass_rate(pass_rate: f64) -> String {
    let formatted = format_percent(pass_rate);
    if pass_rate >= 75.0 {
        formatted.green().to_string()
    } else if pass_rate >= 50.0 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Color status based on value
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "healthy" | "running" => status.green().to_string(),
        "degraded" => status.yellow().to_string(),
        "unhealthy" | "error" | "failed" => status.red().to_string(),
        _ => status.to_string(),
    }
}
