//! User-visible failure taxonomy
//!
//! Only two classes of failure ever surface to the caller: a plan sheet
//! without any detectable quarter block (fatal to the session) and a cost
//! sheet that cannot be loaded (cost analysis degrades, plan analysis
//! continues). Cell-level parsing problems never raise past the builders;
//! they normalize to 0 or row exclusion.

use crate::config::QuarterCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("no quarter blocks detected in sheet '{0}'")]
    NoQuarterBlocks(String),

    #[error("required column '{column}' missing from the {quarter} block header")]
    MissingColumn {
        quarter: QuarterCode,
        column: String,
    },

    #[error("no model column recognized in the cost master sheet")]
    ModelColumnNotFound,

    #[error("cost breakdown sheet has {found} columns, expected at least {expected}")]
    CostBreakdownTooNarrow { found: usize, expected: usize },
}
