//! Quarter block detection in raw plan grids
//!
//! The S&OP sheet carries no sheet-level header: each quarter's data sits in
//! its own block, introduced by a header row somewhere in the grid and ended
//! by a terminator row. The terminator rule depends on what the header row
//! offers, so it is picked per block as a [`ScanMode`] instead of running
//! separate scan loops.

use crate::config::QuarterCode;
use crate::reader::{CellValue, Grid, is_blank_row};
use std::collections::BTreeMap;

/// A contiguous run of grid rows belonging to one quarter. Transient:
/// produced by the scan, consumed by the table builder.
#[derive(Debug, Clone)]
pub struct QuarterBlock {
    pub quarter: QuarterCode,
    /// Trimmed header cells, in grid column order
    pub header: Vec<String>,
    /// Body rows, terminator excluded
    pub rows: Vec<Vec<CellValue>>,
}

/// Block termination strategy, selected from the header row's tokens.
///
/// Serial mode trusts the numeric serial column as ground truth: any row
/// whose serial cell is empty or not an integer ends the block, blank rows
/// included. Permissive mode has no serial column to lean on, so it must
/// tolerate spreadsheet whitespace: interior blank rows are dropped and only
/// a TOTAL marker (or the end of the grid) ends the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanMode {
    Serial { serial_col: usize },
    Permissive,
}

/// Scan a raw grid top to bottom and slice out every quarter block found.
/// A quarter whose header appears twice keeps the later block.
pub fn scan_quarters(grid: &Grid) -> BTreeMap<QuarterCode, QuarterBlock> {
    let mut blocks = BTreeMap::new();
    let mut i = 0;

    while i < grid.rows.len() {
        let row = &grid.rows[i];
        let Some((quarter, mode)) = detect_header(row) else {
            i += 1;
            continue;
        };

        let header: Vec<String> = row.iter().map(|c| c.as_trimmed_text()).collect();
        let mut body = Vec::new();
        let mut j = i + 1;

        while j < grid.rows.len() {
            let row = &grid.rows[j];
            match mode {
                ScanMode::Serial { serial_col } => {
                    let serial = row.get(serial_col).and_then(CellValue::as_serial);
                    if serial.is_none() {
                        break;
                    }
                    body.push(row.clone());
                }
                ScanMode::Permissive => {
                    if is_total_marker(row) {
                        break;
                    }
                    if is_blank_row(row) {
                        j += 1;
                        continue;
                    }
                    body.push(row.clone());
                }
            }
            j += 1;
        }

        blocks.insert(
            quarter,
            QuarterBlock {
                quarter,
                header,
                rows: body,
            },
        );

        // Resume after the consumed block, terminator included
        i = j + 1;
    }

    blocks
}

/// A row is a header row for quarter `q` iff its trimmed cell set contains
/// the literal tokens "Model", "Category" and `q`. A "Sl. No" cell switches
/// the block into strict serial termination.
fn detect_header(row: &[CellValue]) -> Option<(QuarterCode, ScanMode)> {
    let tokens: Vec<String> = row.iter().map(|c| c.as_trimmed_text()).collect();
    let contains = |wanted: &str| tokens.iter().any(|t| t == wanted);

    if !contains("Model") || !contains("Category") {
        return None;
    }

    let quarter = QuarterCode::ALL
        .iter()
        .copied()
        .find(|q| contains(q.as_str()))?;

    let mode = match tokens.iter().position(|t| t == "Sl. No") {
        Some(serial_col) => ScanMode::Serial { serial_col },
        None => ScanMode::Permissive,
    };

    Some((quarter, mode))
}

/// TOTAL marker: the first non-empty cell of the row reads "TOTAL",
/// case-insensitive
fn is_total_marker(row: &[CellValue]) -> bool {
    row.iter()
        .map(|c| c.as_trimmed_text())
        .find(|t| !t.is_empty())
        .is_some_and(|t| t.eq_ignore_ascii_case("TOTAL"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn serial_header() -> Vec<CellValue> {
        ["Sl. No", "Model", "Category", "OND", "Oct", "Nov", "Dec"]
            .iter()
            .map(|s| text(s))
            .collect()
    }

    fn data_row(serial: f64, model: &str) -> Vec<CellValue> {
        vec![
            num(serial),
            text(model),
            text("Compact"),
            num(300.0),
            num(100.0),
            num(100.0),
            num(100.0),
        ]
    }

    #[test]
    fn test_serial_block_ends_on_blank_row() {
        let grid = Grid::new(
            "S&OP",
            vec![
                vec![text("Quarterly production plan")],
                vec![],
                serial_header(),
                data_row(1.0, "MX-200"),
                data_row(2.0, "MX-210"),
                data_row(3.0, "MX-220"),
                vec![CellValue::Empty; 7],
                vec![text("TOTAL"), text(""), text(""), num(900.0)],
            ],
        );

        let blocks = scan_quarters(&grid);
        assert_eq!(blocks.len(), 1);
        let block = &blocks[&QuarterCode::Ond];
        assert_eq!(block.rows.len(), 3);
        assert_eq!(block.header[1], "Model");
    }

    #[test]
    fn test_serial_block_ends_on_total_text_in_serial_cell() {
        let grid = Grid::new(
            "S&OP",
            vec![
                serial_header(),
                data_row(1.0, "MX-200"),
                vec![text("TOTAL"), text(""), text(""), num(300.0)],
                data_row(99.0, "stray"),
            ],
        );

        let blocks = scan_quarters(&grid);
        // "TOTAL" is not integer-parsable, so it terminates the block
        assert_eq!(blocks[&QuarterCode::Ond].rows.len(), 1);
    }

    #[test]
    fn test_permissive_block_skips_interior_blanks() {
        let header: Vec<CellValue> = ["Model", "Category", "JFM", "Jan", "Feb", "Mar"]
            .iter()
            .map(|s| text(s))
            .collect();
        let grid = Grid::new(
            "S&OP",
            vec![
                header,
                vec![text("MX-200"), text("Compact"), num(90.0), num(30.0), num(30.0), num(30.0)],
                vec![CellValue::Empty; 6],
                vec![text("MX-210"), text("Compact"), num(60.0), num(20.0), num(20.0), num(20.0)],
                vec![text("Total"), text(""), num(150.0)],
            ],
        );

        let blocks = scan_quarters(&grid);
        let block = &blocks[&QuarterCode::Jfm];
        // Blank interior row dropped, TOTAL row excluded
        assert_eq!(block.rows.len(), 2);
    }

    #[test]
    fn test_two_quarters_in_one_grid() {
        let jfm_header: Vec<CellValue> = ["Sl. No", "Model", "Category", "JFM", "Jan", "Feb", "Mar"]
            .iter()
            .map(|s| text(s))
            .collect();
        let grid = Grid::new(
            "S&OP",
            vec![
                serial_header(),
                data_row(1.0, "MX-200"),
                vec![],
                jfm_header,
                data_row(1.0, "MX-200"),
                data_row(2.0, "MX-210"),
            ],
        );

        let blocks = scan_quarters(&grid);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[&QuarterCode::Ond].rows.len(), 1);
        assert_eq!(blocks[&QuarterCode::Jfm].rows.len(), 2);
    }

    #[test]
    fn test_duplicate_quarter_keeps_later_block() {
        let grid = Grid::new(
            "S&OP",
            vec![
                serial_header(),
                data_row(1.0, "old"),
                vec![],
                serial_header(),
                data_row(1.0, "new-a"),
                data_row(2.0, "new-b"),
            ],
        );

        let blocks = scan_quarters(&grid);
        let block = &blocks[&QuarterCode::Ond];
        assert_eq!(block.rows.len(), 2);
        assert_eq!(block.rows[0][1], text("new-a"));
    }

    #[test]
    fn test_no_headers_found() {
        let grid = Grid::new(
            "S&OP",
            vec![vec![text("just"), text("noise")], vec![num(1.0), num(2.0)]],
        );
        assert!(scan_quarters(&grid).is_empty());
    }

    #[test]
    fn test_header_requires_all_tokens() {
        // Missing "Category" token: not a header row
        let row: Vec<CellValue> = ["Sl. No", "Model", "OND", "Oct", "Nov", "Dec"]
            .iter()
            .map(|s| text(s))
            .collect();
        let grid = Grid::new("S&OP", vec![row, data_row(1.0, "MX-200")]);
        assert!(scan_quarters(&grid).is_empty());
    }
}
