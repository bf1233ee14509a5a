//! Derived-field tests for invoices: tax, remaining balance, and the
//! paid/overdue predicates.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use sales_service::models::{compute_remaining, compute_tax, Invoice};
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

fn invoice(total: &str, partial: &str) -> Invoice {
    let total = dec(total);
    let partial = dec(partial);
    Invoice {
        invoice_id: Uuid::new_v4(),
        purchase_order_id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        invoice_number: "INV-0001".to_string(),
        invoice_date: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        total,
        tax_amount: compute_tax(total, Decimal::ZERO),
        discount_amount: Decimal::ZERO,
        payment_status: "pending".to_string(),
        payment_mode: "transfer".to_string(),
        due_date: None,
        paid_utc: None,
        payment_terms: None,
        delivery_address: None,
        shipping_status: "pending".to_string(),
        partial_payment: partial,
        remaining_balance: compute_remaining(total, partial),
        billing_status: "in_progress".to_string(),
    }
}

#[test]
fn tax_is_twenty_percent_of_net() {
    assert_eq!(compute_tax(dec("1000.00"), Decimal::ZERO), dec("200.00"));
    assert_eq!(compute_tax(dec("1000.00"), dec("100.00")), dec("180.00"));
}

#[test]
fn tax_rounds_to_two_decimal_places() {
    // (10.33 - 0) * 0.20 = 2.066 -> 2.07
    assert_eq!(compute_tax(dec("10.33"), Decimal::ZERO), dec("2.07"));
}

#[test]
fn remaining_balance_tracks_partial_payment() {
    assert_eq!(compute_remaining(dec("1000.00"), dec("400.00")), dec("600.00"));
    assert_eq!(compute_remaining(dec("1000.00"), Decimal::ZERO), dec("1000.00"));
}

#[test]
fn paid_iff_nothing_remains() {
    let open = invoice("1000.00", "400.00");
    assert!(!open.is_paid());

    let settled = invoice("1000.00", "1000.00");
    assert_eq!(settled.remaining_balance, Decimal::ZERO);
    assert!(settled.is_paid());
}

#[test]
fn overdue_requires_due_date_balance_and_elapsed_time() {
    let due = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();

    let mut inv = invoice("500.00", "0");
    // No due date: never overdue.
    assert!(!inv.is_overdue(due + Duration::days(30)));

    inv.due_date = Some(due);
    // Before the due date.
    assert!(!inv.is_overdue(due - Duration::days(1)));
    // Past the due date with a balance outstanding.
    assert!(inv.is_overdue(due + Duration::days(1)));

    // Settled invoices never go overdue, no matter the clock.
    let mut settled = invoice("500.00", "500.00");
    settled.due_date = Some(due);
    assert!(!settled.is_overdue(due + Duration::days(365)));
}

#[test]
fn exactly_at_due_date_is_not_overdue() {
    let due = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    let mut inv = invoice("500.00", "0");
    inv.due_date = Some(due);
    assert!(!inv.is_overdue(due));
}
