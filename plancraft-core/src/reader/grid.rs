//! Raw grid data structures

use std::path::PathBuf;

/// A workbook reduced to named, row-ordered cell grids
#[derive(Debug, Clone, Default)]
pub struct PlanWorkbook {
    pub path: PathBuf,
    pub sheets: Vec<Grid>,
}

impl PlanWorkbook {
    /// Get a sheet grid by name
    pub fn sheet(&self, name: &str) -> Option<&Grid> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// A single sheet as an ordered 2-D array of cells, no header semantics.
/// Source of truth for scanning; never mutated after the read.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Cell value types
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Stringify and trim the cell, the way header tokens are compared.
    /// Integral numbers render without a decimal point.
    pub fn as_trimmed_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Boolean(b) => b.to_string(),
        }
    }

    /// Interpret the cell as a number if it holds one (directly or as text)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Coerce to a numeric value, defaulting unparsable or non-finite
    /// content to 0. Downstream tables must never hold NaN or infinity.
    pub fn coerce_numeric(&self) -> f64 {
        self.as_number().filter(|n| n.is_finite()).unwrap_or(0.0)
    }

    /// Interpret the cell as an integer serial number (e.g. a "Sl. No" cell)
    pub fn as_serial(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            CellValue::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

/// Check whether every cell of a row is empty (or blank text)
pub fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(|c| c.as_trimmed_text().is_empty())
}
