use std::collections::BTreeMap;

use super::ledger::Ledger;

/// Ceiling for the supported tax range, in percent.
pub const MAX_TAX_RATE_PERCENT: f64 = 21.0;

/// Tax rate in percent, always within `0..=MAX_TAX_RATE_PERCENT`.
///
/// Out-of-range input clamps instead of failing; a non-finite input falls
/// back to the ceiling, which is also the default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxRate(f64);

impl TaxRate {
    pub fn new(percent: f64) -> Self {
        if percent.is_finite() {
            Self(percent.clamp(0.0, MAX_TAX_RATE_PERCENT))
        } else {
            Self(MAX_TAX_RATE_PERCENT)
        }
    }

    pub fn percent(&self) -> f64 {
        self.0
    }

    pub fn fraction(&self) -> f64 {
        self.0 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self(MAX_TAX_RATE_PERCENT)
    }
}

/// Aggregated view over a ledger: totals plus per-category and
/// per-subcategory cost breakdowns.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub tax_rate: TaxRate,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub grand_total: f64,
    pub by_category: BTreeMap<String, f64>,
    pub by_subcategory: BTreeMap<String, f64>,
}

impl Ledger {
    /// Computes the summary in one pass over the entries.
    ///
    /// `subtotal` is the sum of entry totals, `tax_amount` is
    /// `subtotal * rate`, and `grand_total` their sum. An empty ledger
    /// yields zeros and empty breakdowns.
    pub fn summarize(&self, rate: TaxRate) -> BudgetSummary {
        let mut subtotal = 0.0;
        let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
        let mut by_subcategory: BTreeMap<String, f64> = BTreeMap::new();

        for entry in self.entries() {
            subtotal += entry.total_cost;
            *by_category.entry(entry.category.clone()).or_insert(0.0) += entry.total_cost;
            *by_subcategory
                .entry(entry.subcategory.clone())
                .or_insert(0.0) += entry.total_cost;
        }

        let tax_amount = subtotal * rate.fraction();
        BudgetSummary {
            tax_rate: rate,
            subtotal,
            tax_amount,
            grand_total: subtotal + tax_amount,
            by_category,
            by_subcategory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::item::{ItemDraft, UnitKind, NO_SUBCATEGORY};

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.allow_missing_subcategory();
        ledger
            .add(
                ItemDraft::new("Kitchen", "Floors", "Tile", UnitKind::Length, 25.0)
                    .with_subcategory("Parquet")
                    .with_quantity(10.0),
            )
            .unwrap();
        ledger
            .add(
                ItemDraft::new("Kitchen", "Floors", "Sealant", UnitKind::Count, 15.0)
                    .with_subcategory("Parquet")
                    .with_quantity(2.0),
            )
            .unwrap();
        ledger
            .add(
                ItemDraft::new("Bathroom", "Walls", "Paint", UnitKind::Weight, 8.0)
                    .with_quantity(5.0),
            )
            .unwrap();
        ledger
    }

    #[test]
    fn rate_clamps_into_supported_range() {
        assert_eq!(TaxRate::new(-4.0).percent(), 0.0);
        assert_eq!(TaxRate::new(10.5).percent(), 10.5);
        assert_eq!(TaxRate::new(99.0).percent(), MAX_TAX_RATE_PERCENT);
        assert_eq!(TaxRate::new(f64::NAN).percent(), MAX_TAX_RATE_PERCENT);
        assert_eq!(TaxRate::default().percent(), MAX_TAX_RATE_PERCENT);
    }

    #[test]
    fn standard_rate_on_single_entry() {
        let mut ledger = Ledger::new();
        ledger
            .add(
                ItemDraft::new("Kitchen", "Floors", "Tile", UnitKind::Length, 25.0)
                    .with_subcategory("Parquet")
                    .with_quantity(10.0),
            )
            .unwrap();

        let summary = ledger.summarize(TaxRate::new(21.0));
        assert_eq!(summary.subtotal, 250.0);
        assert_eq!(summary.tax_amount, 52.5);
        assert_eq!(summary.grand_total, 302.5);
    }

    #[test]
    fn zero_rate_keeps_grand_total_at_subtotal() {
        let ledger = sample_ledger();
        let summary = ledger.summarize(TaxRate::new(0.0));
        assert_eq!(summary.tax_amount, 0.0);
        assert_eq!(summary.grand_total, summary.subtotal);
    }

    #[test]
    fn empty_ledger_summarizes_to_zeros() {
        let ledger = Ledger::new();
        let summary = ledger.summarize(TaxRate::default());
        assert_eq!(summary.subtotal, 0.0);
        assert_eq!(summary.tax_amount, 0.0);
        assert_eq!(summary.grand_total, 0.0);
        assert!(summary.by_category.is_empty());
        assert!(summary.by_subcategory.is_empty());
    }

    #[test]
    fn breakdowns_group_by_category_and_subcategory() {
        let ledger = sample_ledger();
        let summary = ledger.summarize(TaxRate::new(0.0));

        // 250 + 30 under Floors, 40 under Walls.
        assert_eq!(summary.by_category["Floors"], 280.0);
        assert_eq!(summary.by_category["Walls"], 40.0);
        assert_eq!(summary.by_subcategory["Parquet"], 280.0);
        assert_eq!(summary.by_subcategory[NO_SUBCATEGORY], 40.0);
        assert_eq!(summary.subtotal, 320.0);
    }

    #[test]
    fn breakdown_totals_match_subtotal() {
        let ledger = sample_ledger();
        let summary = ledger.summarize(TaxRate::new(10.0));
        let category_sum: f64 = summary.by_category.values().sum();
        let subcategory_sum: f64 = summary.by_subcategory.values().sum();
        assert!((category_sum - summary.subtotal).abs() < 1e-9);
        assert!((subcategory_sum - summary.subtotal).abs() < 1e-9);
    }
}
