//! Vendor capacity utilization

use super::ratio_pct;
use crate::config::PlanConfig;
use crate::table::QuarterTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// How a vendor's allocated quantity is derived from the plan. Policies are
/// mutually exclusive per vendor; all three feed the same utilization and
/// status computation.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationPolicy {
    /// Allocated = the selected month's total for the vendor's category
    CategoryTotal,
    /// Allocated = category month total x declared percentage / 100
    PercentOfCategory(f64),
    /// Allocated = sum over capped SKUs of min(plan quantity, cap)
    SkuCapped(BTreeMap<String, f64>),
}

/// A session-scoped vendor declaration. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorAllocation {
    pub vendor: String,
    pub category: String,
    pub capacity: f64,
    pub policy: AllocationPolicy,
}

/// Three-tier load classification with fixed business thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UtilizationStatus {
    Overloaded,
    Tight,
    Comfortable,
}

impl UtilizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UtilizationStatus::Overloaded => "Overloaded",
            UtilizationStatus::Tight => "Tight",
            UtilizationStatus::Comfortable => "Comfortable",
        }
    }

    /// Shared classifier for every allocation policy
    pub fn classify(utilization_pct: f64, config: &PlanConfig) -> Self {
        if utilization_pct > config.overloaded_pct {
            UtilizationStatus::Overloaded
        } else if utilization_pct >= config.tight_pct {
            UtilizationStatus::Tight
        } else {
            UtilizationStatus::Comfortable
        }
    }
}

/// One vendor's computed utilization line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorUtilization {
    pub vendor: String,
    pub category: String,
    pub capacity: f64,
    pub allocated: f64,
    /// 0 when capacity <= 0
    pub utilization_pct: f64,
    pub gap: f64,
    pub status: UtilizationStatus,
}

/// Compute utilization for every declared vendor against the selected
/// month's plan. Vendors with blank names are silently excluded.
pub fn vendor_utilization(
    table: &QuarterTable,
    month: &str,
    vendors: &[VendorAllocation],
    config: &PlanConfig,
) -> Vec<VendorUtilization> {
    vendors
        .iter()
        .filter(|v| !v.vendor.trim().is_empty())
        .map(|vendor| {
            let allocated = allocated_quantity(table, month, vendor);
            let utilization_pct = if vendor.capacity > 0.0 {
                ratio_pct(allocated, vendor.capacity)
            } else {
                0.0
            };
            VendorUtilization {
                vendor: vendor.vendor.clone(),
                category: vendor.category.clone(),
                capacity: vendor.capacity,
                allocated,
                utilization_pct,
                gap: vendor.capacity - allocated,
                status: UtilizationStatus::classify(utilization_pct, config),
            }
        })
        .collect()
}

fn allocated_quantity(table: &QuarterTable, month: &str, vendor: &VendorAllocation) -> f64 {
    match &vendor.policy {
        AllocationPolicy::CategoryTotal => category_month_total(table, month, &vendor.category),
        AllocationPolicy::PercentOfCategory(pct) => {
            category_month_total(table, month, &vendor.category) * pct / 100.0
        }
        AllocationPolicy::SkuCapped(caps) => table
            .rows
            .iter()
            .filter_map(|row| {
                caps.get(&row.model)
                    .map(|cap| table.month_value(row, month).min(*cap))
            })
            .sum(),
    }
}

fn category_month_total(table: &QuarterTable, month: &str, category: &str) -> f64 {
    table
        .rows
        .iter()
        .filter(|row| row.category == category)
        .map(|row| table.month_value(row, month))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuarterCode;
    use crate::table::PlanRow;

    fn test_table() -> QuarterTable {
        let row = |model: &str, category: &str, months: [f64; 3]| PlanRow {
            model: model.to_string(),
            category: category.to_string(),
            quarter_total: months.iter().sum(),
            month_values: months,
        };
        QuarterTable {
            quarter: QuarterCode::Ond,
            months: QuarterCode::Ond.months(),
            rows: vec![
                row("MX-200", "Compact", [100.0, 110.0, 120.0]),
                row("MX-210", "Compact", [20.0, 30.0, 40.0]),
                row("PR-100", "Premium", [50.0, 50.0, 50.0]),
            ],
        }
    }

    fn vendor(name: &str, category: &str, capacity: f64, policy: AllocationPolicy) -> VendorAllocation {
        VendorAllocation {
            vendor: name.to_string(),
            category: category.to_string(),
            capacity,
            policy,
        }
    }

    #[test]
    fn test_category_total_policy_overloaded() {
        let table = test_table();
        let vendors = vec![vendor("Acme", "Compact", 100.0, AllocationPolicy::CategoryTotal)];
        let result =
            vendor_utilization(&table, "Oct", &vendors, &PlanConfig::default());

        assert_eq!(result.len(), 1);
        // Compact Oct total = 120, capacity 100
        assert_eq!(result[0].allocated, 120.0);
        assert_eq!(result[0].utilization_pct, 120.0);
        assert_eq!(result[0].gap, -20.0);
        assert_eq!(result[0].status, UtilizationStatus::Overloaded);
    }

    #[test]
    fn test_percent_of_category_policy() {
        let table = test_table();
        let vendors = vec![vendor(
            "Northside",
            "Compact",
            100.0,
            AllocationPolicy::PercentOfCategory(50.0),
        )];
        let result =
            vendor_utilization(&table, "Nov", &vendors, &PlanConfig::default());

        // Compact Nov total = 140, half of it allocated
        assert_eq!(result[0].allocated, 70.0);
        assert_eq!(result[0].utilization_pct, 70.0);
        assert_eq!(result[0].status, UtilizationStatus::Comfortable);
    }

    #[test]
    fn test_sku_capped_policy() {
        let table = test_table();
        let caps: BTreeMap<String, f64> =
            [("MX-200".to_string(), 80.0), ("MX-210".to_string(), 100.0)]
                .into_iter()
                .collect();
        let vendors = vec![vendor("Eastgate", "Compact", 100.0, AllocationPolicy::SkuCapped(caps))];
        let result =
            vendor_utilization(&table, "Oct", &vendors, &PlanConfig::default());

        // min(100, 80) + min(20, 100) = 100
        assert_eq!(result[0].allocated, 100.0);
        assert_eq!(result[0].status, UtilizationStatus::Tight);
    }

    #[test]
    fn test_zero_capacity_is_not_a_division_error() {
        let table = test_table();
        let vendors = vec![vendor("Acme", "Compact", 0.0, AllocationPolicy::CategoryTotal)];
        let result =
            vendor_utilization(&table, "Oct", &vendors, &PlanConfig::default());

        assert_eq!(result[0].utilization_pct, 0.0);
        assert_eq!(result[0].status, UtilizationStatus::Comfortable);
        assert_eq!(result[0].gap, -120.0);
    }

    #[test]
    fn test_blank_vendor_names_excluded() {
        let table = test_table();
        let vendors = vec![
            vendor("  ", "Compact", 100.0, AllocationPolicy::CategoryTotal),
            vendor("Acme", "Compact", 100.0, AllocationPolicy::CategoryTotal),
        ];
        let result =
            vendor_utilization(&table, "Oct", &vendors, &PlanConfig::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].vendor, "Acme");
    }

    #[test]
    fn test_tier_boundaries() {
        let config = PlanConfig::default();
        assert_eq!(
            UtilizationStatus::classify(100.1, &config),
            UtilizationStatus::Overloaded
        );
        assert_eq!(
            UtilizationStatus::classify(100.0, &config),
            UtilizationStatus::Tight
        );
        assert_eq!(
            UtilizationStatus::classify(85.0, &config),
            UtilizationStatus::Tight
        );
        assert_eq!(
            UtilizationStatus::classify(84.9, &config),
            UtilizationStatus::Comfortable
        );
    }
}
