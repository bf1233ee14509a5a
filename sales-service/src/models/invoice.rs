//! Invoice model and its derived-field calculators.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::totals::MONEY_SCALE;

/// Payment status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "paid" => PaymentStatus::Paid,
            "cancelled" => PaymentStatus::Cancelled,
            _ => PaymentStatus::Pending,
        }
    }
}

/// Shipping status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    Pending,
    Shipped,
    Delivered,
}

impl ShippingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingStatus::Pending => "pending",
            ShippingStatus::Shipped => "shipped",
            ShippingStatus::Delivered => "delivered",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "shipped" => ShippingStatus::Shipped,
            "delivered" => ShippingStatus::Delivered,
            _ => ShippingStatus::Pending,
        }
    }
}

/// Billing progression of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    InProgress,
    Final,
    Proforma,
}

impl BillingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingStatus::InProgress => "in_progress",
            BillingStatus::Final => "final",
            BillingStatus::Proforma => "proforma",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "final" => BillingStatus::Final,
            "proforma" => BillingStatus::Proforma,
            _ => BillingStatus::InProgress,
        }
    }
}

/// Fixed 20% tax rate applied to every invoice.
pub fn tax_rate() -> Decimal {
    Decimal::new(20, 2)
}

/// Tax amount: (total - discount) x 20%, two decimal places.
pub fn compute_tax(total: Decimal, discount: Decimal) -> Decimal {
    ((total - discount) * tax_rate()).round_dp(MONEY_SCALE)
}

/// Remaining balance: total - partial payment.
pub fn compute_remaining(total: Decimal, partial_payment: Decimal) -> Decimal {
    total - partial_payment
}

/// Invoice document. `tax_amount` and `remaining_balance` are overwritten
/// on every save; callers cannot set them through normal persistence.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub purchase_order_id: Uuid,
    pub client_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: DateTime<Utc>,
    pub total: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub payment_status: String,
    pub payment_mode: String,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_utc: Option<DateTime<Utc>>,
    pub payment_terms: Option<String>,
    pub delivery_address: Option<String>,
    pub shipping_status: String,
    pub partial_payment: Decimal,
    pub remaining_balance: Decimal,
    pub billing_status: String,
}

impl Invoice {
    /// True exactly when nothing remains to pay.
    pub fn is_paid(&self) -> bool {
        self.remaining_balance.is_zero()
    }

    /// True when a due date is set, a balance remains, and `now` is past
    /// the due date. The clock is an explicit parameter so the predicate
    /// stays deterministic.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => self.remaining_balance > Decimal::ZERO && now > due,
            None => false,
        }
    }
}

/// Input for creating an invoice. Tax and remaining balance are derived
/// from these fields, never taken from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub purchase_order_id: Uuid,
    pub client_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: Option<DateTime<Utc>>,
    pub total: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    pub payment_mode: String,
    pub due_date: Option<DateTime<Utc>>,
    pub payment_terms: Option<String>,
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub partial_payment: Decimal,
    pub billing_status: Option<BillingStatus>,
}

/// Input for updating an invoice. `None` keeps the stored value; derived
/// fields are recomputed from the merged record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInvoice {
    pub total: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_mode: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_utc: Option<DateTime<Utc>>,
    pub payment_terms: Option<String>,
    pub delivery_address: Option<String>,
    pub shipping_status: Option<ShippingStatus>,
    pub partial_payment: Option<Decimal>,
    pub billing_status: Option<BillingStatus>,
}
