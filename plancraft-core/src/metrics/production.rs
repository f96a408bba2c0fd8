//! Production plan rollups

use crate::config::QuarterCode;
use crate::table::QuarterTable;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub quantity: f64,
}

/// Quarter, month and category totals for one quarter table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionRollup {
    pub quarter: QuarterCode,
    pub quarter_total: f64,
    pub month_totals: Vec<MonthTotal>,
    /// Sorted by category name
    pub category_totals: Vec<CategoryTotal>,
}

/// Sum the quarter column, each month column and the quarter column grouped
/// by category
pub fn rollup(table: &QuarterTable) -> ProductionRollup {
    let quarter_total = table.rows.iter().map(|r| r.quarter_total).sum();

    let month_totals = table
        .months
        .iter()
        .enumerate()
        .map(|(i, month)| MonthTotal {
            month: month.to_string(),
            quantity: table.rows.iter().map(|r| r.month_values[i]).sum(),
        })
        .collect();

    let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
    for row in &table.rows {
        *by_category.entry(row.category.clone()).or_insert(0.0) += row.quarter_total;
    }
    let category_totals = by_category
        .into_iter()
        .map(|(category, quantity)| CategoryTotal { category, quantity })
        .collect();

    ProductionRollup {
        quarter: table.quarter,
        quarter_total,
        month_totals,
        category_totals,
    }
}
