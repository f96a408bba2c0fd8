//! COGS and gross margin analysis

use super::ratio_pct;
use crate::costs::CostMasterTable;
use crate::table::QuarterTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// One model's financials for the selected month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialRow {
    pub model: String,
    pub category: String,
    pub plan_qty: f64,
    pub unit_cost: f64,
    pub total_cogs: f64,
    pub revenue: f64,
    pub gross_profit: f64,
    pub gm_pct: f64,
}

/// Overall totals across the financial rows. GM% is recomputed from the
/// summed figures, never averaged from per-row margins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceTotals {
    pub revenue: f64,
    pub total_cogs: f64,
    pub gross_profit: f64,
    pub gm_pct: f64,
}

/// Category-level profitability rollup, sorted by category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub revenue: f64,
    pub total_cogs: f64,
    pub gross_profit: f64,
    pub gm_pct: f64,
}

/// Left-join the quarter table to the cost master on model for the selected
/// month. Unmatched models get an all-zero cost row; a duplicated cost
/// master model resolves to its first row.
pub fn financial_summary(
    table: &QuarterTable,
    costs: &CostMasterTable,
    month: &str,
) -> Vec<FinancialRow> {
    table
        .rows
        .iter()
        .map(|row| {
            let cost = costs.lookup(&row.model);
            let material = cost.map(|c| c.material_cost).unwrap_or(0.0);
            let conversion = cost.map(|c| c.conversion_cost).unwrap_or(0.0);
            let selling = cost.map(|c| c.selling_price).unwrap_or(0.0);

            let plan_qty = table.month_value(row, month);
            let unit_cost = material + conversion;
            let total_cogs = plan_qty * unit_cost;
            let revenue = plan_qty * selling;
            let gross_profit = revenue - total_cogs;

            FinancialRow {
                model: row.model.clone(),
                category: row.category.clone(),
                plan_qty,
                unit_cost,
                total_cogs,
                revenue,
                gross_profit,
                gm_pct: ratio_pct(gross_profit, revenue),
            }
        })
        .collect()
}

/// Sum revenue, COGS and gross profit across rows and derive the overall
/// margin from the sums
pub fn totals(rows: &[FinancialRow]) -> FinanceTotals {
    let revenue: f64 = rows.iter().map(|r| r.revenue).sum();
    let total_cogs: f64 = rows.iter().map(|r| r.total_cogs).sum();
    let gross_profit: f64 = rows.iter().map(|r| r.gross_profit).sum();

    FinanceTotals {
        revenue,
        total_cogs,
        gross_profit,
        gm_pct: ratio_pct(gross_profit, revenue),
    }
}

/// Group financial rows by category. Category GM% is margin-weighted by
/// construction: sum(gross profit) / sum(revenue), not the mean of row
/// margins.
pub fn category_profitability(rows: &[FinancialRow]) -> Vec<CategorySummary> {
    let mut grouped: BTreeMap<String, (f64, f64, f64)> = BTreeMap::new();
    for row in rows {
        let entry = grouped.entry(row.category.clone()).or_insert((0.0, 0.0, 0.0));
        entry.0 += row.revenue;
        entry.1 += row.total_cogs;
        entry.2 += row.gross_profit;
    }

    grouped
        .into_iter()
        .map(|(category, (revenue, total_cogs, gross_profit))| CategorySummary {
            category,
            revenue,
            total_cogs,
            gross_profit,
            gm_pct: ratio_pct(gross_profit, revenue),
        })
        .collect()
}
