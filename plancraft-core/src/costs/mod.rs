//! Cost master loading with heuristic column resolution
//!
//! Two source layouts are supported. Format A ("COGS") is one row per model
//! with free-text column names, resolved against per-field alias lists.
//! Format B ("COGS - Temp") is a wide export where the fields sit at fixed
//! column positions and are relabeled positionally.

use crate::error::PlanError;
use crate::metrics::ratio_pct;
use crate::reader::{CellValue, Grid};
use serde::Serialize;
use std::collections::BTreeMap;

/// Recognized column aliases per canonical field, in match priority order
pub const MODEL_ALIASES: &[&str] = &["model", "sku"];
pub const MATERIAL_ALIASES: &[&str] = &["material"];
pub const CONVERSION_ALIASES: &[&str] = &["conversion"];
pub const SELLING_ALIASES: &[&str] = &["selling", "price", "sp"];

/// One cost master line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRow {
    pub model: String,
    pub material_cost: f64,
    pub conversion_cost: f64,
    pub selling_price: f64,
}

/// Cost master keyed by model. Models are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostMasterTable {
    pub rows: Vec<CostRow>,
}

impl CostMasterTable {
    /// Look up costs for a model. When a model appears more than once the
    /// first row wins; the join never fans out plan rows.
    pub fn lookup(&self, model: &str) -> Option<&CostRow> {
        self.rows.iter().find(|r| r.model == model)
    }
}

/// Resolve free-text headers to canonical fields by case-insensitive
/// substring match. For each field the first column containing any alias
/// wins. Pure: testable with literal column-name fixtures.
pub fn resolve_columns<'a>(
    headers: &[String],
    specs: &[(&'a str, &[&str])],
) -> BTreeMap<&'a str, Option<usize>> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    specs
        .iter()
        .map(|(field, aliases)| {
            let found = lowered
                .iter()
                .position(|header| aliases.iter().any(|alias| header.contains(alias)));
            (*field, found)
        })
        .collect()
}

/// Load a format A cost master: header row, then one row per model.
///
/// An unresolvable model column fails the load (cost analysis becomes
/// unavailable, plan analysis continues). Unresolved cost fields default to
/// an all-zero column.
pub fn load_cost_master(grid: &Grid) -> Result<CostMasterTable, PlanError> {
    let header: Vec<String> = grid
        .rows
        .first()
        .map(|row| row.iter().map(|c| c.as_trimmed_text()).collect())
        .unwrap_or_default();

    let resolved = resolve_columns(
        &header,
        &[
            ("model", MODEL_ALIASES),
            ("material", MATERIAL_ALIASES),
            ("conversion", CONVERSION_ALIASES),
            ("selling", SELLING_ALIASES),
        ],
    );

    let model_col = resolved["model"].ok_or(PlanError::ModelColumnNotFound)?;
    let material_col = resolved["material"];
    let conversion_col = resolved["conversion"];
    let selling_col = resolved["selling"];

    let mut rows = Vec::new();
    for raw in grid.rows.iter().skip(1) {
        let model = raw
            .get(model_col)
            .map(|c| c.as_trimmed_text())
            .unwrap_or_default();
        if model.is_empty() {
            continue;
        }

        let numeric = |col: Option<usize>| {
            col.and_then(|c| raw.get(c))
                .map(|c| c.coerce_numeric())
                .unwrap_or(0.0)
        };

        rows.push(CostRow {
            model,
            material_cost: numeric(material_col),
            conversion_cost: numeric(conversion_col),
            selling_price: numeric(selling_col),
        });
    }

    Ok(CostMasterTable { rows })
}

/// Canonical field count of the wide cost breakdown export
const BREAKDOWN_FIELDS: usize = 10;

/// One relabeled cost breakdown line (format B)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdownRow {
    pub model: String,
    pub category: String,
    pub material_cost: f64,
    pub conversion_cost: f64,
    pub overhead_cost: f64,
    pub freight_cost: f64,
    pub total_cost: f64,
    pub selling_price: f64,
    pub revenue: f64,
    pub gross_profit: f64,
    /// Guarded: 0 whenever revenue is 0 or the division is not finite
    pub gm_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostBreakdownTable {
    pub rows: Vec<CostBreakdownRow>,
}

/// Load a format B cost breakdown: the first ten columns are relabeled
/// positionally (Product, Category, Material, Conversion, two auxiliary
/// costs, Total Cost, Selling Price, Revenue, Gross Profit).
pub fn load_cost_breakdown(grid: &Grid) -> Result<CostBreakdownTable, PlanError> {
    let width = grid.rows.first().map(|r| r.len()).unwrap_or(0);
    if width < BREAKDOWN_FIELDS {
        return Err(PlanError::CostBreakdownTooNarrow {
            found: width,
            expected: BREAKDOWN_FIELDS,
        });
    }

    let mut rows = Vec::new();
    for raw in grid.rows.iter().skip(1) {
        let cell = |col: usize| raw.get(col).cloned().unwrap_or(CellValue::Empty);
        let model = cell(0).as_trimmed_text();
        if model.is_empty() {
            continue;
        }

        let revenue = cell(8).coerce_numeric();
        let gross_profit = cell(9).coerce_numeric();

        rows.push(CostBreakdownRow {
            model,
            category: cell(1).as_trimmed_text(),
            material_cost: cell(2).coerce_numeric(),
            conversion_cost: cell(3).coerce_numeric(),
            overhead_cost: cell(4).coerce_numeric(),
            freight_cost: cell(5).coerce_numeric(),
            total_cost: cell(6).coerce_numeric(),
            selling_price: cell(7).coerce_numeric(),
            revenue,
            gross_profit,
            gm_pct: ratio_pct(gross_profit, revenue),
        });
    }

    Ok(CostBreakdownTable { rows })
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

    #[test]
    fn test_resolve_columns_first_match_wins() {
        let headers: Vec<String> = ["SKU Code", "Material Cost (USD)", "Conv. Cost", "SP"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let resolved = resolve_columns(
            &headers,
            &[
                ("model", MODEL_ALIASES),
                ("material", MATERIAL_ALIASES),
                ("conversion", CONVERSION_ALIASES),
                ("selling", SELLING_ALIASES),
            ],
        );

        assert_eq!(resolved["model"], Some(0));
        assert_eq!(resolved["material"], Some(1));
        // "Conv. Cost" does not contain "conversion"
        assert_eq!(resolved["conversion"], None);
        assert_eq!(resolved["selling"], Some(3));
    }

    #[test]
    fn test_load_cost_master() {
        let grid = Grid::new(
            "COGS",
            vec![
                vec![text("Model"), text("Material Cost"), text("Conversion Cost"), text("Selling Price")],
                vec![text("MX-200"), num(40.0), num(10.0), num(80.0)],
                vec![text("MX-210"), text("bad"), num(12.0), num(95.0)],
                vec![CellValue::Empty, num(1.0), num(1.0), num(1.0)],
            ],
        );

        let table = load_cost_master(&grid).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].material_cost, 40.0);
        // Unparsable cost coerced to 0
        assert_eq!(table.rows[1].material_cost, 0.0);
    }

    #[test]
    fn test_missing_model_column_is_fatal_to_loader() {
        let grid = Grid::new(
            "COGS",
            vec![vec![text("Material Cost"), text("Selling Price")]],
        );
        assert!(matches!(
            load_cost_master(&grid),
            Err(PlanError::ModelColumnNotFound)
        ));
    }

    #[test]
    fn test_missing_selling_price_defaults_to_zero() {
        let grid = Grid::new(
            "COGS",
            vec![
                vec![text("Model"), text("Material Cost"), text("Conversion Cost")],
                vec![text("MX-200"), num(40.0), num(10.0)],
            ],
        );

        let table = load_cost_master(&grid).unwrap();
        assert_eq!(table.rows[0].selling_price, 0.0);
    }

    #[test]
    fn test_lookup_is_deterministic_first_match() {
        let table = CostMasterTable {
            rows: vec![
                CostRow {
                    model: "MX-200".to_string(),
                    material_cost: 40.0,
                    conversion_cost: 10.0,
                    selling_price: 80.0,
                },
                CostRow {
                    model: "MX-200".to_string(),
                    material_cost: 99.0,
                    conversion_cost: 99.0,
                    selling_price: 99.0,
                },
            ],
        };

        assert_eq!(table.lookup("MX-200").unwrap().material_cost, 40.0);
        assert!(table.lookup("unknown").is_none());
    }

    #[test]
    fn test_load_cost_breakdown_guards_gm() {
        let header: Vec<CellValue> = [
            "Product", "Category", "Material", "Conversion", "Overhead", "Freight",
            "Total Cost", "SP", "Revenue", "GP",
        ]
        .iter()
        .map(|s| text(s))
        .collect();

        let grid = Grid::new(
            "COGS - Temp",
            vec![
                header,
                vec![
                    text("MX-200"), text("Compact"), num(40.0), num(10.0), num(5.0),
                    num(2.0), num(57.0), num(80.0), num(8000.0), num(2300.0),
                ],
                vec![
                    text("MX-210"), text("Premium"), num(40.0), num(10.0), num(5.0),
                    num(2.0), num(57.0), num(80.0), num(0.0), num(0.0),
                ],
            ],
        );

        let table = load_cost_breakdown(&grid).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert!((table.rows[0].gm_pct - 28.75).abs() < 1e-9);
        // 0 / 0 must not produce NaN
        assert_eq!(table.rows[1].gm_pct, 0.0);
    }

    #[test]
    fn test_narrow_breakdown_sheet_is_rejected() {
        let grid = Grid::new(
            "COGS - Temp",
            vec![vec![text("Product"), text("Category"), num(1.0)]],
        );
        assert!(matches!(
            load_cost_breakdown(&grid),
            Err(PlanError::CostBreakdownTooNarrow { found: 3, .. })
        ));
    }
}
