//! Quantity totals, overall and per fuel category.
//!
//! Totals are summed as [`Decimal`] from the three-decimal display values, so
//! they add up exactly to what the table shows. Quantities beyond the
//! `Decimal` range (about 7.9e28) are left out of the sums and counted as
//! skipped.

use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::warn;

use crate::core::{Comparison, FuelCategory, ReportRow};

/// Billed and transported totals over a set of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuantityTotals {
    pub rows: usize,
    pub billed: Decimal,
    pub transported: Decimal,
    /// Rows whose quantities compare [`Comparison::Different`].
    pub mismatches: usize,
    /// Rows left out of `billed` and `transported` because a quantity
    /// did not fit.
    pub skipped: usize,
}

impl QuantityTotals {
    fn add(&mut self, row: &ReportRow) {
        self.rows += 1;
        if row.comparison() == Comparison::Different {
            self.mismatches += 1;
        }
        match (
            checked_sum(self.billed, row.billed_quantity()),
            checked_sum(self.transported, row.transported_quantity()),
        ) {
            (Some(billed), Some(transported)) => {
                self.billed = billed;
                self.transported = transported;
            }
            _ => self.skipped += 1,
        }
    }

    /// Billed total, three decimals.
    pub fn billed_display(&self) -> String {
        format_total(self.billed)
    }

    /// Transported total, three decimals.
    pub fn transported_display(&self) -> String {
        format_total(self.transported)
    }
}

/// Totals for one fuel category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuelTotals {
    pub fuel: FuelCategory,
    #[serde(flatten)]
    pub totals: QuantityTotals,
}

/// Totals for a whole report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub overall: QuantityTotals,
    /// Categories in order of first appearance; rows without a category are
    /// only counted in `overall`.
    pub by_fuel: Vec<FuelTotals>,
}

impl ReportSummary {
    pub fn fuel(&self, fuel: FuelCategory) -> Option<&QuantityTotals> {
        self.by_fuel
            .iter()
            .find(|f| f.fuel == fuel)
            .map(|f| &f.totals)
    }
}

/// Sum the billed and transported quantities of `rows`.
///
/// Never fails: a row with a quantity outside the `Decimal` range, or one
/// that would overflow a total, still counts in `rows` and `mismatches` but
/// is left out of the sums and counted in `skipped`.
pub fn summarize(rows: &[ReportRow]) -> ReportSummary {
    let mut summary = ReportSummary::default();
    for row in rows {
        summary.overall.add(row);
        let Some(fuel) = row.fuel else {
            continue;
        };
        match summary.by_fuel.iter().position(|f| f.fuel == fuel) {
            Some(i) => summary.by_fuel[i].totals.add(row),
            None => {
                let mut totals = QuantityTotals::default();
                totals.add(row);
                summary.by_fuel.push(FuelTotals { fuel, totals });
            }
        }
    }
    if summary.overall.skipped > 0 {
        warn!(
            skipped = summary.overall.skipped,
            "quantities out of decimal range left out of totals"
        );
    }
    summary
}

fn checked_sum(total: Decimal, quantity: &str) -> Option<Decimal> {
    total.checked_add(Decimal::from_str(quantity).ok()?)
}

fn format_total(d: Decimal) -> String {
    format!("{:.3}", d.round_dp(3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_total_cases() {
        assert_eq!(format_total(dec!(0)), "0.000");
        assert_eq!(format_total(dec!(150.5)), "150.500");
        assert_eq!(format_total(dec!(1234.567)), "1234.567");
    }

    #[test]
    fn checked_sum_rejects_out_of_range() {
        let huge = format!("{:.3}", 1e30_f64);
        assert_eq!(checked_sum(Decimal::ZERO, &huge), None);
        assert_eq!(checked_sum(Decimal::MAX, "1.000"), None);
        assert_eq!(checked_sum(dec!(1.5), "2.250"), Some(dec!(3.750)));
    }
}
