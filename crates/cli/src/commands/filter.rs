//! Spreadsheet filter command

use anyhow::Result;
use std::path::Path;

use crate::output::{print_info, print_success};
use crate::spreadsheet::filter_workbook;

/// Filter student records by program code prefix and report row counts
pub fn filter_records(input: &Path, output: &Path, column: &str, prefix: &str) -> Result<()> {
    let summary = filter_workbook(input, output, column, prefix)?;

    print_success(&format!("Filtered data saved to {}", output.display()));
    print_info(&format!("Total rows: {}", summary.total_rows));
    print_info(&format!(
        "Filtered rows ({} starting with '{}'): {}",
        column, prefix, summary.kept_rows
    ));

    Ok(())
}
