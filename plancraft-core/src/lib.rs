//! plancraft-core: S&OP production plan parsing and analysis
//!
//! This library turns a semi-structured quarterly plan workbook (irregular
//! header blocks, mixed-type rows, trailing totals) into validated tables
//! and derives production, capacity-utilization and cost/margin metrics.

pub mod config;
pub mod costs;
pub mod error;
pub mod metrics;
pub mod reader;
pub mod scanner;
pub mod table;

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

pub use config::{PlanConfig, QuarterCode, VendorConfig};
pub use costs::{CostBreakdownTable, CostMasterTable};
pub use error::PlanError;
pub use table::{PlanRow, QuarterTable};

/// One analysis session over one uploaded plan file.
///
/// Every load rebuilds all tables wholesale; there are no partial updates
/// and nothing persists between sessions. Failures that only degrade the
/// session (a malformed quarter block, a missing cost sheet) are demoted to
/// [`warnings`](PlanSession::warnings); only a plan sheet with no
/// detectable quarter block at all aborts the load.
pub struct PlanSession {
    config: PlanConfig,
    quarters: BTreeMap<QuarterCode, QuarterTable>,
    cost_master: Option<CostMasterTable>,
    cost_breakdown: Option<CostBreakdownTable>,
    warnings: Vec<String>,
}

impl PlanSession {
    /// Load a plan workbook with the default configuration
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_config(path, PlanConfig::default())
    }

    /// Load a plan workbook, scanning quarter blocks and attempting the
    /// cost sheets
    pub fn load_with_config<P: AsRef<Path>>(path: P, config: PlanConfig) -> Result<Self> {
        let workbook = reader::read_workbook(path)?;
        let plan_grid = workbook
            .sheet(&config.plan_sheet)
            .ok_or_else(|| PlanError::SheetNotFound(config.plan_sheet.clone()))?;

        let blocks = scanner::scan_quarters(plan_grid);
        if blocks.is_empty() {
            return Err(PlanError::NoQuarterBlocks(config.plan_sheet.clone()).into());
        }

        let mut warnings = Vec::new();
        let mut quarters = BTreeMap::new();
        for (code, block) in blocks {
            match table::build_quarter_table(&block) {
                Ok(table) => {
                    quarters.insert(code, table);
                }
                Err(e) => warnings.push(format!("{} block dropped: {}", code, e)),
            }
        }
        if quarters.is_empty() {
            // Every detected block failed projection; nothing can run
            return Err(PlanError::NoQuarterBlocks(config.plan_sheet.clone()).into());
        }

        let cost_master = match workbook.sheet(&config.cost_sheet) {
            Some(grid) => match costs::load_cost_master(grid) {
                Ok(table) => Some(table),
                Err(e) => {
                    warnings.push(format!("cost analysis unavailable: {}", e));
                    None
                }
            },
            None => {
                warnings.push(format!(
                    "cost analysis unavailable: sheet '{}' not found",
                    config.cost_sheet
                ));
                None
            }
        };

        // The wide breakdown export is auxiliary; absence is not worth a
        // warning, a malformed sheet is
        let cost_breakdown = workbook
            .sheet(&config.cost_breakdown_sheet)
            .and_then(|grid| match costs::load_cost_breakdown(grid) {
                Ok(table) => Some(table),
                Err(e) => {
                    warnings.push(format!("cost breakdown skipped: {}", e));
                    None
                }
            });

        Ok(Self {
            config,
            quarters,
            cost_master,
            cost_breakdown,
            warnings,
        })
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Quarter codes with a successfully built table, in fixed order
    pub fn quarters(&self) -> Vec<QuarterCode> {
        self.quarters.keys().copied().collect()
    }

    pub fn table(&self, quarter: QuarterCode) -> Option<&QuarterTable> {
        self.quarters.get(&quarter)
    }

    /// The first available quarter, for callers that did not select one
    pub fn first_quarter(&self) -> Option<QuarterCode> {
        self.quarters.keys().next().copied()
    }

    pub fn cost_master(&self) -> Option<&CostMasterTable> {
        self.cost_master.as_ref()
    }

    pub fn cost_breakdown(&self) -> Option<&CostBreakdownTable> {
        self.cost_breakdown.as_ref()
    }

    /// Degradation notices accumulated during the load
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
