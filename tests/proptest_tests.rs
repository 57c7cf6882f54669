//! Property-based tests for quantity normalization, fuel classification and
//! record ordering.

use cartaporte::batch::sort_records;
use cartaporte::core::*;
use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

fn record(index: usize, date: Option<NaiveDateTime>) -> ParsedRecord {
    ParsedRecord {
        version: CartaPorteVersion::V20,
        emission_date: date,
        period: String::new(),
        series: String::new(),
        folio: index.to_string(),
        sat_key: None,
        quantities: reconcile(None, None),
        fuel: None,
        source_file: format!("{index}.xml"),
        receipt: ReceiptLink::NotFound,
    }
}

fn arb_date() -> impl Strategy<Value = Option<NaiveDateTime>> {
    prop::option::of((0u32..3650, 0u32..86_400).prop_map(|(days, secs)| {
        NaiveDate::from_ymd_opt(2015, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
            + chrono::Duration::days(days.into())
            + chrono::Duration::seconds(secs.into())
    }))
}

proptest! {
    /// Finite numbers survive a trip through their text form.
    #[test]
    fn finite_values_parse_back(v in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        prop_assert_eq!(parse_quantity(Some(&v.to_string())), v);
    }

    /// Normalization is total and always finite.
    #[test]
    fn arbitrary_text_never_panics(s in ".*") {
        prop_assert!(parse_quantity(Some(&s)).is_finite());
    }

    /// Purely alphabetic text is not a number (and not "inf"/"NaN" either).
    #[test]
    fn letters_are_zero(s in "[a-hj-mo-z]{1,12}") {
        prop_assert_eq!(parse_quantity(Some(&s)), 0.0);
    }

    /// Display form always has three fractional digits.
    #[test]
    fn formatted_with_three_decimals(v in -1.0e12f64..1.0e12) {
        let text = format_quantity(v);
        let (_, fraction) = text.split_once('.').unwrap();
        prop_assert_eq!(fraction.len(), 3);
    }

    /// The verdict depends only on the unrounded difference.
    #[test]
    fn verdict_matches_tolerance(a in -1.0e6f64..1.0e6, b in -1.0e6f64..1.0e6) {
        let r = reconcile(Some(&a.to_string()), Some(&b.to_string()));
        let expected = if (a - b).abs() < QUANTITY_TOLERANCE {
            Comparison::Equal
        } else {
            Comparison::Different
        };
        prop_assert_eq!(r.comparison(), expected);
    }

    /// Identical text always reconciles as equal.
    #[test]
    fn same_text_is_equal(s in ".*") {
        prop_assert_eq!(reconcile(Some(&s), Some(&s)).comparison(), Comparison::Equal);
    }

    /// Only the three catalog keys classify.
    #[test]
    fn classifier_is_total(key in "[0-9]{0,10}") {
        let known = ["15101514", "15101515", "15101505"].contains(&key.as_str());
        prop_assert_eq!(fuel_category(&key).is_some(), known);
    }

    /// Dated rows come first in ascending order, undated rows last, and ties
    /// keep their input order.
    #[test]
    fn sort_orders_dates_and_puts_undated_last(dates in prop::collection::vec(arb_date(), 0..40)) {
        let records: Vec<_> = dates.iter().enumerate().map(|(i, d)| record(i, *d)).collect();
        let rows = sort_records(records);
        prop_assert_eq!(rows.len(), dates.len());

        let keys: Vec<(bool, Option<NaiveDateTime>, usize)> = rows
            .iter()
            .map(|r| {
                let i: usize = r.folio.parse().unwrap();
                (dates[i].is_none(), dates[i], i)
            })
            .collect();
        let mut expected = keys.clone();
        expected.sort();
        prop_assert_eq!(keys, expected);
    }
}
