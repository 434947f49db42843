//! Purchase estimation tests
//!
//! Property-based and unit tests for GST aggregation on purchase estimations.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    calculate_estimation, round_currency, validate_gst_rate, EstimationLine, SupplyType,
    GST_SLABS,
};
use std::str::FromStr;

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn line(quantity: Decimal, rate: Decimal, gst_percent: Decimal) -> EstimationLine {
    EstimationLine {
        description: "Fabric".to_string(),
        quantity,
        rate,
        gst_percent,
    }
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Lines with quantities up to 10,000 units and rates up to 5,000.00
fn line_strategy() -> impl Strategy<Value = EstimationLine> {
    (1..=10_000i64, 0..=500_000i64, 0..GST_SLABS.len()).prop_map(|(qty, paise, slab)| {
        line(
            Decimal::from(qty),
            Decimal::new(paise, 2),
            Decimal::from(GST_SLABS[slab]),
        )
    })
}

// ============================================================================
// Property: GST Aggregation
// ============================================================================
// Split taxes always add back up to the total GST, and the grand total is
// the subtotal plus GST.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn property_intra_state_split_sums_to_total(
        lines in prop::collection::vec(line_strategy(), 1..10),
    ) {
        let totals = calculate_estimation(&lines, SupplyType::IntraState);

        prop_assert_eq!(totals.cgst + totals.sgst, totals.total_gst);
        prop_assert_eq!(totals.igst, Decimal::ZERO);
        prop_assert!((totals.sgst - totals.cgst).abs() <= dec("0.01"));
        prop_assert_eq!(totals.grand_total, totals.subtotal + totals.total_gst);
    }

    #[test]
    fn property_inter_state_is_all_igst(
        lines in prop::collection::vec(line_strategy(), 1..10),
    ) {
        let totals = calculate_estimation(&lines, SupplyType::InterState);

        prop_assert_eq!(totals.igst, totals.total_gst);
        prop_assert_eq!(totals.cgst, Decimal::ZERO);
        prop_assert_eq!(totals.sgst, Decimal::ZERO);
    }

    #[test]
    fn property_line_totals_add_up(
        lines in prop::collection::vec(line_strategy(), 1..10),
    ) {
        let totals = calculate_estimation(&lines, SupplyType::IntraState);
        let line_sum: Decimal = totals.lines.iter().map(|l| l.total).sum();

        prop_assert_eq!(totals.lines.len(), lines.len());
        prop_assert_eq!(line_sum, totals.grand_total);
    }

    #[test]
    fn property_amounts_have_two_decimal_places(
        lines in prop::collection::vec(line_strategy(), 1..10),
    ) {
        let totals = calculate_estimation(&lines, SupplyType::IntraState);
        for l in &totals.lines {
            prop_assert_eq!(l.amount.scale(), 2);
            prop_assert_eq!(l.gst_amount.scale(), 2);
        }
    }
}

// ============================================================================
// Unit Tests for Estimation Totals
// ============================================================================

#[test]
fn test_typical_fabric_purchase() {
    // 500 m of shirting at 142.75 with 5% GST
    let lines = vec![line(dec("500"), dec("142.75"), dec("5"))];
    let totals = calculate_estimation(&lines, SupplyType::IntraState);

    assert_eq!(totals.subtotal, dec("71375.00"));
    assert_eq!(totals.total_gst, dec("3568.75"));
    assert_eq!(totals.cgst, dec("1784.37"));
    assert_eq!(totals.sgst, dec("1784.38"));
    assert_eq!(totals.grand_total, dec("74943.75"));
}

#[test]
fn test_mixed_slabs() {
    let lines = vec![
        line(dec("200"), dec("90"), dec("5")),  // fabric
        line(dec("2000"), dec("1.5"), dec("12")), // buttons
        line(dec("1"), dec("15000"), dec("18")), // embroidery job work
    ];
    let totals = calculate_estimation(&lines, SupplyType::InterState);

    assert_eq!(totals.subtotal, dec("36000.00"));
    assert_eq!(totals.total_gst, dec("3960.00"));
    assert_eq!(totals.igst, dec("3960.00"));
    assert_eq!(totals.grand_total, dec("39960.00"));
}

#[test]
fn test_zero_rated_line() {
    let lines = vec![line(dec("10"), dec("100"), Decimal::ZERO)];
    let totals = calculate_estimation(&lines, SupplyType::IntraState);

    assert_eq!(totals.total_gst, Decimal::ZERO);
    assert_eq!(totals.grand_total, dec("1000.00"));
}

#[test]
fn test_round_currency_midpoint() {
    assert_eq!(round_currency(dec("10.005")), dec("10.01"));
    assert_eq!(round_currency(dec("10.004")), dec("10.00"));
    assert_eq!(round_currency(dec("-10.005")), dec("-10.01"));
}

#[test]
fn test_gst_slabs() {
    for slab in GST_SLABS {
        assert!(validate_gst_rate(Decimal::from(slab)).is_ok());
    }
    assert!(validate_gst_rate(dec("3")).is_err());
}
