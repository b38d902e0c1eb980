//! CLI integration tests

use std::process::Command;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "gp-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Grade Predictor"), "Should show app name");
    assert!(stdout.contains("status"), "Should show status command");
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("courses"), "Should show courses command");
    assert!(stdout.contains("filter"), "Should show filter command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run_cli(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("gp"), "Should show binary name");
}

/// Test predict subcommand help
#[test]
fn test_predict_help() {
    let output = run_cli(&["predict", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    assert!(stdout.contains("--grades"), "Should show grades option");
    assert!(stdout.contains("--set"), "Should show set option");
    assert!(stdout.contains("--fill"), "Should show fill option");
    assert!(stdout.contains("--fill-average"), "Should show fill-average option");
}

/// Test that a fixed fill and an average fill cannot be combined
#[test]
fn test_fill_options_conflict() {
    let output = run_cli(&["predict", "--fill", "70", "--fill-average"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Conflicting fills should fail");
    assert!(stderr.contains("cannot be used with"), "Should explain the conflict");
}

/// Test filter subcommand defaults
#[test]
fn test_filter_help_shows_defaults() {
    let output = run_cli(&["filter", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Filter help should succeed");
    assert!(stdout.contains("G2024.xlsx"), "Should show default input");
    assert!(stdout.contains("G2024_informatic.xlsx"), "Should show default output");
    assert!(stdout.contains("specia"), "Should show default column");
}

/// Test courses listing needs no server
#[test]
fn test_courses_json() {
    let output = run_cli(&["--format", "json", "courses"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Courses should succeed");
    let semesters: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(semesters["Semester 1"][0], "I1100");
    assert_eq!(semesters.as_object().unwrap().len(), 4);
}

/// Test malformed grade override is rejected
#[test]
fn test_invalid_override() {
    let output = run_cli(&["predict", "--set", "M1100"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Malformed override should fail");
    assert!(stderr.contains("COURSE=GRADE"), "Should explain expected format");
}

/// Test filter reports a missing input file
#[test]
fn test_filter_missing_input() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("absent.xlsx");
    let output = run_cli(&["filter", "--input", input.to_str().unwrap()]);

    assert!(!output.status.success(), "Missing input should fail");
}

/// Test that invalid command shows error
#[test]
fn test_invalid_command() {
    let output = run_cli(&["invalid-command"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Invalid command should fail");
    assert!(
        stderr.contains("error") || stderr.contains("unrecognized"),
        "Should show error message"
    );
}
