//! Excel/ODS plan file reader using calamine

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use std::path::Path;

pub mod grid;

pub use grid::{CellValue, Grid, PlanWorkbook, is_blank_row};

/// Read a plan workbook from a file path, keeping every sheet as a raw grid
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<PlanWorkbook> {
    let path = path.as_ref();
    let mut excel: Sheets<_> = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet_names = excel.sheet_names();
    let mut sheets = Vec::new();

    for sheet_name in &sheet_names {
        // An unreadable sheet (e.g. chart-only) becomes an empty grid;
        // downstream detection reports it with its own diagnostics
        let grid = match excel.worksheet_range(sheet_name) {
            Ok(range) => parse_grid(sheet_name, &range),
            Err(_) => Grid::new(sheet_name.as_str(), Vec::new()),
        };
        sheets.push(grid);
    }

    Ok(PlanWorkbook {
        path: path.to_path_buf(),
        sheets,
    })
}

fn parse_grid(name: &str, range: &Range<Data>) -> Grid {
    let rows = range
        .rows()
        .map(|row| row.iter().map(parse_cell_value).collect())
        .collect();
    Grid::new(name, rows)
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        // Error cells carry no usable quantity; they coerce to 0 downstream
        Data::Error(_) => CellValue::Empty,
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
