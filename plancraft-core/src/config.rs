//! Fixed plan constants and session configuration

use crate::metrics::capacity::{AllocationPolicy, VendorAllocation};
use crate::table::QuarterTable;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Quarter codes as they appear in plan sheet headers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuarterCode {
    Ond,
    Jfm,
    Amj,
    Jas,
}

impl QuarterCode {
    pub const ALL: [QuarterCode; 4] = [
        QuarterCode::Ond,
        QuarterCode::Jfm,
        QuarterCode::Amj,
        QuarterCode::Jas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuarterCode::Ond => "OND",
            QuarterCode::Jfm => "JFM",
            QuarterCode::Amj => "AMJ",
            QuarterCode::Jas => "JAS",
        }
    }

    /// The three month column names belonging to this quarter.
    /// The spelling matches the plan sheet headers exactly.
    pub fn months(&self) -> [&'static str; 3] {
        match self {
            QuarterCode::Ond => ["Oct", "Nov", "Dec"],
            QuarterCode::Jfm => ["Jan", "Feb", "Mar"],
            QuarterCode::Amj => ["April", "May", "June"],
            QuarterCode::Jas => ["Jul", "Aug", "Sep"],
        }
    }

    /// Match a trimmed header token against the quarter codes
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|q| q.as_str() == token)
    }
}

impl fmt::Display for QuarterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuarterCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s.trim().to_uppercase().as_str())
            .ok_or_else(|| format!("unknown quarter code '{}' (expected OND, JFM, AMJ or JAS)", s))
    }
}

/// Session configuration: sheet names and utilization thresholds.
/// Constructed once per session and treated as immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Sheet holding the quarter blocks
    #[serde(default = "default_plan_sheet")]
    pub plan_sheet: String,
    /// Sheet holding the cost master (format A)
    #[serde(default = "default_cost_sheet")]
    pub cost_sheet: String,
    /// Sheet holding the wide cost breakdown (format B)
    #[serde(default = "default_cost_breakdown_sheet")]
    pub cost_breakdown_sheet: String,
    /// Utilization at or above this is "Tight"
    #[serde(default = "default_tight_pct")]
    pub tight_pct: f64,
    /// Utilization above this is "Overloaded"
    #[serde(default = "default_overloaded_pct")]
    pub overloaded_pct: f64,
}

fn default_plan_sheet() -> String {
    "S&OP".to_string()
}

fn default_cost_sheet() -> String {
    "COGS".to_string()
}

fn default_cost_breakdown_sheet() -> String {
    "COGS - Temp".to_string()
}

fn default_tight_pct() -> f64 {
    85.0
}

fn default_overloaded_pct() -> f64 {
    100.0
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            plan_sheet: default_plan_sheet(),
            cost_sheet: default_cost_sheet(),
            cost_breakdown_sheet: default_cost_breakdown_sheet(),
            tight_pct: default_tight_pct(),
            overloaded_pct: default_overloaded_pct(),
        }
    }
}

/// Vendor declarations loaded from a TOML file.
///
/// ```toml
/// [[vendors]]
/// name = "Acme Assembly"
/// category = "Compact"
/// capacity = 1200.0
///
/// [[vendors]]
/// name = "Northside"
/// category = "Premium"
/// capacity = 800.0
/// allocation_pct = 40.0
///
/// [[vendors]]
/// name = "Eastgate"
/// category = "Compact"
/// capacity = 500.0
/// [vendors.sku_caps]
/// "MX-200" = 300.0
/// "MX-210" = 250.0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorConfig {
    #[serde(default)]
    pub vendors: Vec<VendorDecl>,
}

/// One declared vendor line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorDecl {
    pub name: String,
    pub category: String,
    pub capacity: f64,
    /// Percentage-of-category allocation, if declared
    #[serde(default)]
    pub allocation_pct: Option<f64>,
    /// Per-SKU capacity ceilings, if declared (takes precedence over
    /// allocation_pct)
    #[serde(default)]
    pub sku_caps: BTreeMap<String, f64>,
}

impl VendorConfig {
    /// Load vendor declarations from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: VendorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validate declarations against the categories present in the active
    /// quarter table
    pub fn validate(&self, table: &QuarterTable) -> Result<()> {
        let known = table.categories();
        for decl in &self.vendors {
            if decl.name.trim().is_empty() {
                // Blank names are excluded from results, not rejected
                continue;
            }
            if decl.capacity < 0.0 {
                anyhow::bail!(
                    "Vendor '{}' declares a negative capacity ({})",
                    decl.name,
                    decl.capacity
                );
            }
            if !known.contains(&decl.category) {
                anyhow::bail!(
                    "Vendor '{}' references unknown category '{}' (known: {})",
                    decl.name,
                    decl.category,
                    known.iter().cloned().collect::<Vec<_>>().join(", ")
                );
            }
        }
        Ok(())
    }

    /// Convert declarations into engine allocations
    pub fn allocations(&self) -> Vec<VendorAllocation> {
        self.vendors
            .iter()
            .map(|decl| {
                let policy = if !decl.sku_caps.is_empty() {
                    AllocationPolicy::SkuCapped(decl.sku_caps.clone())
                } else if let Some(pct) = decl.allocation_pct {
                    AllocationPolicy::PercentOfCategory(pct)
                } else {
                    AllocationPolicy::CategoryTotal
                };
                VendorAllocation {
                    vendor: decl.name.clone(),
                    category: decl.category.clone(),
                    capacity: decl.capacity,
                    policy,
                }
            })
            .collect()
    }
}
