//! Line total computation tests for the document chain.

use rust_decimal::Decimal;
use sales_service::models::totals::{discounted_line_total, line_total};

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

#[test]
fn discount_applies_before_rounding() {
    // 3 x 100.00 at 10% off
    let total = discounted_line_total(3, dec("100.00"), dec("10"));
    assert_eq!(total, dec("270.00"));
}

#[test]
fn zero_discount_matches_plain_total() {
    let discounted = discounted_line_total(4, dec("19.99"), Decimal::ZERO);
    let plain = line_total(4, dec("19.99"));
    assert_eq!(discounted, plain);
    assert_eq!(plain, dec("79.96"));
}

#[test]
fn result_rounds_to_two_decimal_places() {
    // 3 x 0.10 at 33% off = 0.201, banker's rounding to 0.20
    let total = discounted_line_total(3, dec("0.10"), dec("33"));
    assert_eq!(total, dec("0.20"));
    assert_eq!(total.scale(), 2);
}

#[test]
fn fractional_unit_prices_are_exact() {
    // No float drift: 3 x 0.1 is exactly 0.3
    let total = line_total(3, dec("0.1"));
    assert_eq!(total, dec("0.30"));
}
