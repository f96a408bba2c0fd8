//! Canonical per-quarter plan tables

use crate::config::QuarterCode;
use crate::error::PlanError;
use crate::scanner::QuarterBlock;
use serde::Serialize;
use std::collections::BTreeSet;

/// One plan line: a model, its category, the quarter total and the three
/// month quantities. All numeric fields are coerced at build time; the table
/// never holds NaN or infinity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRow {
    pub model: String,
    pub category: String,
    pub quarter_total: f64,
    /// Aligned with [`QuarterTable::months`]
    pub month_values: [f64; 3],
}

/// The canonical per-quarter entity. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterTable {
    pub quarter: QuarterCode,
    pub months: [&'static str; 3],
    pub rows: Vec<PlanRow>,
}

impl QuarterTable {
    /// Index of a month column name within this table's quarter
    pub fn month_index(&self, month: &str) -> Option<usize> {
        self.months.iter().position(|m| *m == month)
    }

    /// A row's quantity for the named month, 0 when the month does not
    /// belong to this quarter
    pub fn month_value(&self, row: &PlanRow, month: &str) -> f64 {
        self.month_index(month)
            .map(|i| row.month_values[i])
            .unwrap_or(0.0)
    }

    /// Distinct category values, sorted
    pub fn categories(&self) -> BTreeSet<String> {
        self.rows.iter().map(|r| r.category.clone()).collect()
    }
}

/// Build a typed quarter table from a scanned block.
///
/// Projects onto the required column set {Model, Category, quarter code,
/// three months}; a missing required column fails the build and the caller
/// drops only this quarter. Rows without a model are excluded; every
/// numeric cell coerces to 0 on parse failure.
pub fn build_quarter_table(block: &QuarterBlock) -> Result<QuarterTable, PlanError> {
    let quarter = block.quarter;
    let months = quarter.months();

    let column = |name: &str| -> Result<usize, PlanError> {
        block
            .header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PlanError::MissingColumn {
                quarter,
                column: name.to_string(),
            })
    };

    let model_col = column("Model")?;
    let category_col = column("Category")?;
    let total_col = column(quarter.as_str())?;
    let month_cols = [column(months[0])?, column(months[1])?, column(months[2])?];

    let mut rows = Vec::new();
    for raw in &block.rows {
        let model = raw
            .get(model_col)
            .map(|c| c.as_trimmed_text())
            .unwrap_or_default();
        if model.is_empty() {
            continue;
        }

        let category = raw
            .get(category_col)
            .map(|c| c.as_trimmed_text())
            .unwrap_or_default();

        let numeric = |col: usize| raw.get(col).map(|c| c.coerce_numeric()).unwrap_or(0.0);

        rows.push(PlanRow {
            model,
            category,
            quarter_total: numeric(total_col),
            month_values: [
                numeric(month_cols[0]),
                numeric(month_cols[1]),
                numeric(month_cols[2]),
            ],
        });
    }

    Ok(QuarterTable {
        quarter,
        months,
        rows,
    })
}
