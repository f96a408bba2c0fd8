use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use plancraft_core::config::{QuarterCode, VendorConfig};
use plancraft_core::metrics::{capacity, finance, production};
use plancraft_core::{PlanSession, QuarterTable};
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "planstats")]
#[command(about = "Production plan, capacity and margin reports from an S&OP workbook", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the plan workbook (xlsx/ods)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Quarter to analyze (OND, JFM, AMJ, JAS); defaults to the first
    /// quarter found in the file
    #[arg(short, long, value_name = "QUARTER")]
    quarter: Option<QuarterCode>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for CI/scripting
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Production plan rollup: quarter, month and category totals
    Plan {
        /// Restrict the row listing to one category
        #[arg(long, value_name = "CATEGORY")]
        category: Option<String>,
    },
    /// Vendor capacity utilization for one month
    Capacity {
        /// Vendor declarations (TOML)
        #[arg(long, value_name = "VENDORS")]
        vendors: PathBuf,

        /// Month to analyze (must belong to the selected quarter)
        #[arg(long, value_name = "MONTH")]
        month: String,
    },
    /// COGS and gross margin analysis for one month
    Finance {
        /// Month to analyze (must belong to the selected quarter)
        #[arg(long, value_name = "MONTH")]
        month: String,

        /// Restrict the summary to one category
        #[arg(long, value_name = "CATEGORY")]
        category: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let session = PlanSession::load(&cli.file)
        .with_context(|| format!("Failed to load plan file: {}", cli.file.display()))?;

    for warning in session.warnings() {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    let quarter = match cli.quarter {
        Some(q) => q,
        None => session
            .first_quarter()
            .context("No quarter table available")?,
    };
    let table = session
        .table(quarter)
        .with_context(|| format!("Quarter {} not present in this file", quarter))?;

    match &cli.command {
        Command::Plan { category } => {
            let rollup = production::rollup(table);
            let rows = filtered_rows(table, category.as_deref());
            match cli.format {
                OutputFormat::Human => formatter::print_plan_human(table, &rollup, &rows),
                OutputFormat::Json => formatter::print_plan_json(&rollup, &rows)?,
            }
        }
        Command::Capacity { vendors, month } => {
            let month = validate_month(table, month)?;
            let vendor_config = VendorConfig::from_file(vendors)
                .with_context(|| format!("Failed to load vendors from {}", vendors.display()))?;
            vendor_config
                .validate(table)
                .context("Invalid vendor declarations")?;

            let result = capacity::vendor_utilization(
                table,
                month,
                &vendor_config.allocations(),
                session.config(),
            );
            match cli.format {
                OutputFormat::Human => formatter::print_capacity_human(quarter, month, &result),
                OutputFormat::Json => formatter::print_capacity_json(quarter, month, &result)?,
            }
        }
        Command::Finance { month, category } => {
            let month = validate_month(table, month)?;
            let costs = session
                .cost_master()
                .context("Cost master not available; finance analysis requires the COGS sheet")?;

            let mut rows = finance::financial_summary(table, costs, month);
            if let Some(filter) = category {
                rows.retain(|r| &r.category == filter);
            }
            let totals = finance::totals(&rows);
            let categories = finance::category_profitability(&rows);
            match cli.format {
                OutputFormat::Human => {
                    formatter::print_finance_human(quarter, month, &rows, &totals, &categories)
                }
                OutputFormat::Json => {
                    formatter::print_finance_json(quarter, month, &rows, &totals, &categories)?
                }
            }
        }
    }

    Ok(())
}

fn filtered_rows<'a>(
    table: &'a QuarterTable,
    category: Option<&str>,
) -> Vec<&'a plancraft_core::PlanRow> {
    table
        .rows
        .iter()
        .filter(|r| category.is_none_or(|c| r.category == c))
        .collect()
}

fn validate_month<'a>(table: &QuarterTable, month: &'a str) -> Result<&'a str> {
    if table.month_index(month).is_none() {
        anyhow::bail!(
            "Month '{}' does not belong to quarter {} (expected one of: {})",
            month,
            table.quarter,
            table.months.join(", ")
        );
    }
    Ok(month)
}
