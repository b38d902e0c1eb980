//! Spreadsheet filtering by program code
//!
//! Reads the first worksheet of a workbook, treats its first row as the
//! header, and keeps the rows whose program-code cell, rendered as text,
//! starts with a prefix. Kept rows are written with the header to a new
//! xlsx workbook.

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

/// Row counts of a filter run, excluding the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub total_rows: usize,
    pub kept_rows: usize,
}

/// Filter `input` into `output`, keeping rows whose `column` starts with `prefix`
pub fn filter_workbook(
    input: &Path,
    output: &Path,
    column: &str,
    prefix: &str,
) -> Result<FilterSummary> {
    let mut workbook = open_workbook_auto(input)
        .map_err(|e| anyhow!("Failed to open {}: {}", input.display(), e))?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("{} has no worksheets", input.display()))?
        .map_err(|e| anyhow!("Failed to read first worksheet of {}: {}", input.display(), e))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .with_context(|| format!("{} is empty", input.display()))?;
    let column_idx = header
        .iter()
        .position(|cell| cell_text(cell) == column)
        .with_context(|| format!("Column '{}' not found in {}", column, input.display()))?;

    let mut total_rows = 0;
    let kept: Vec<&[Data]> = rows
        .inspect(|_| total_rows += 1)
        .filter(|row| {
            row.get(column_idx)
                .is_some_and(|cell| cell_text(cell).starts_with(prefix))
        })
        .collect();

    write_workbook(output, header, &kept)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(FilterSummary {
        total_rows,
        kept_rows: kept.len(),
    })
}

/// Text form of a cell, as used for prefix matching
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Number formats for date and time cells, which xlsx stores as serial numbers
struct DateFormats {
    date: Format,
    datetime: Format,
    duration: Format,
}

impl DateFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
            duration: Format::new().set_num_format("[h]:mm:ss"),
        }
    }

    fn for_cell(&self, dt: &ExcelDateTime) -> &Format {
        if dt.is_duration() {
            &self.duration
        } else if dt.as_f64().fract() == 0.0 {
            &self.date
        } else {
            &self.datetime
        }
    }
}

fn write_workbook(output: &Path, header: &[Data], rows: &[&[Data]]) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let formats = DateFormats::new();

    for (r, row) in std::iter::once(header).chain(rows.iter().copied()).enumerate() {
        for (c, cell) in row.iter().enumerate() {
            write_cell(worksheet, r as u32, c as u16, cell, &formats)?;
        }
    }

    workbook.save(output)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Data,
    formats: &DateFormats,
) -> Result<(), XlsxError> {
    match cell {
        Data::Empty => return Ok(()),
        Data::Int(i) => worksheet.write_number(row, col, *i as f64)?,
        Data::Float(f) => worksheet.write_number(row, col, *f)?,
        Data::Bool(b) => worksheet.write_boolean(row, col, *b)?,
        Data::DateTime(dt) => {
            worksheet.write_number_with_format(row, col, dt.as_f64(), formats.for_cell(dt))?
        }
        Data::String(s) => worksheet.write_string(row, col, s)?,
        other => worksheet.write_string(row, col, other.to_string())?,
    };
    Ok(())
}
