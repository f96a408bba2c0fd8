//! Output formatters for plan, capacity and finance reports

use anyhow::Result;
use colored::*;
use plancraft_core::config::QuarterCode;
use plancraft_core::metrics::capacity::{UtilizationStatus, VendorUtilization};
use plancraft_core::metrics::finance::{CategorySummary, FinanceTotals, FinancialRow};
use plancraft_core::metrics::production::ProductionRollup;
use plancraft_core::{PlanRow, QuarterTable};

/// Print the production rollup and plan rows in human-readable form
pub fn print_plan_human(table: &QuarterTable, rollup: &ProductionRollup, rows: &[&PlanRow]) {
    println!(
        "{}",
        format!("{} Production Plan", rollup.quarter).bold().underline()
    );
    println!();
    println!(
        "  {} {}",
        "Total Quarter Plan:".bold(),
        format_qty(rollup.quarter_total)
    );

    println!("\n{}", "Month Totals:".bold());
    for month in &rollup.month_totals {
        println!("  {}: {}", month.month.cyan(), format_qty(month.quantity));
    }

    println!("\n{}", "Category Totals:".bold());
    for category in &rollup.category_totals {
        println!(
            "  {}: {}",
            category.category.cyan(),
            format_qty(category.quantity)
        );
    }

    println!("\n{}", "Plan Rows:".bold());
    for row in rows {
        let months = table
            .months
            .iter()
            .zip(row.month_values.iter())
            .map(|(m, v)| format!("{} {}", m, format_qty(*v)))
            .collect::<Vec<_>>()
            .join("  ");
        println!(
            "  {} [{}] {} ({})",
            row.model.bold(),
            row.category,
            format_qty(row.quarter_total),
            months
        );
    }
}

pub fn print_plan_json(rollup: &ProductionRollup, rows: &[&PlanRow]) -> Result<()> {
    let output = serde_json::json!({
        "rollup": rollup,
        "rows": rows,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print vendor utilization with status-tinted tiers
pub fn print_capacity_human(quarter: QuarterCode, month: &str, rows: &[VendorUtilization]) {
    println!(
        "{}",
        format!("Capacity Utilization — {} / {}", quarter, month)
            .bold()
            .underline()
    );
    println!();

    if rows.is_empty() {
        println!("{}", "No vendors declared.".yellow());
        return;
    }

    for row in rows {
        let status = match row.status {
            UtilizationStatus::Overloaded => row.status.as_str().red().bold(),
            UtilizationStatus::Tight => row.status.as_str().yellow().bold(),
            UtilizationStatus::Comfortable => row.status.as_str().green().bold(),
        };
        println!(
            "  {} [{}] capacity {} allocated {} utilization {:.1}% gap {} {}",
            row.vendor.bold(),
            row.category,
            format_qty(row.capacity),
            format_qty(row.allocated),
            row.utilization_pct,
            format_qty(row.gap),
            status
        );
    }
}

pub fn print_capacity_json(
    quarter: QuarterCode,
    month: &str,
    rows: &[VendorUtilization],
) -> Result<()> {
    let output = serde_json::json!({
        "quarter": quarter,
        "month": month,
        "vendors": rows,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print the SKU financial summary, overall totals and category
/// profitability
pub fn print_finance_human(
    quarter: QuarterCode,
    month: &str,
    rows: &[FinancialRow],
    totals: &FinanceTotals,
    categories: &[CategorySummary],
) {
    println!(
        "{}",
        format!("COGS & Gross Margin — {} / {}", quarter, month)
            .bold()
            .underline()
    );

    println!("\n{}", "SKU Financial Summary:".bold());
    for row in rows {
        println!(
            "  {} [{}] qty {} unit cost {} cogs {} revenue {} gp {} gm {:.2}%",
            row.model.bold(),
            row.category,
            format_qty(row.plan_qty),
            format_qty(row.unit_cost),
            format_qty(row.total_cogs),
            format_qty(row.revenue),
            format_qty(row.gross_profit),
            row.gm_pct
        );
    }

    println!("\n{}", "Overall:".bold());
    println!("  {} {}", "Revenue:".bold(), format_qty(totals.revenue));
    println!("  {} {}", "Total COGS:".bold(), format_qty(totals.total_cogs));
    println!(
        "  {} {}",
        "Gross Profit:".bold(),
        format_qty(totals.gross_profit)
    );
    println!("  {} {:.2}%", "Overall GM:".bold(), totals.gm_pct);

    println!("\n{}", "Category Profitability:".bold());
    for summary in categories {
        println!(
            "  {}: revenue {} gp {} gm {:.2}%",
            summary.category.cyan(),
            format_qty(summary.revenue),
            format_qty(summary.gross_profit),
            summary.gm_pct
        );
    }
}

pub fn print_finance_json(
    quarter: QuarterCode,
    month: &str,
    rows: &[FinancialRow],
    totals: &FinanceTotals,
    categories: &[CategorySummary],
) -> Result<()> {
    let output = serde_json::json!({
        "quarter": quarter,
        "month": month,
        "rows": rows,
        "totals": totals,
        "categories": categories,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Quantities render without trailing decimals when integral
fn format_qty(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
