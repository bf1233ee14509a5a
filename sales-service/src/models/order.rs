//! Purchase order model: second stage of the document chain.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::DocumentStatus;

/// Purchase order header. References the quote it was raised from; the
/// quote's total is carried over, not recomputed here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseOrder {
    pub purchase_order_id: Uuid,
    pub quote_id: Uuid,
    pub client_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub total: Decimal,
    pub payment_mode: String,
    pub delivery_date: Option<DateTime<Utc>>,
}

/// Order line item. No discount term: total = quantity x unit price.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderLine {
    pub order_line_id: Uuid,
    pub purchase_order_id: Uuid,
    pub product_id: Uuid,
    pub site_article_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a purchase order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePurchaseOrder {
    pub quote_id: Uuid,
    pub client_id: Uuid,
    pub order_date: Option<DateTime<Utc>>,
    pub total: Decimal,
    pub payment_mode: String,
    pub delivery_date: Option<DateTime<Utc>>,
}

/// Input for updating a purchase order header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePurchaseOrder {
    pub status: Option<DocumentStatus>,
    pub total: Option<Decimal>,
    pub payment_mode: Option<String>,
    pub delivery_date: Option<DateTime<Utc>>,
}

/// Input for adding an order line. The total is derived, never supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderLine {
    pub product_id: Uuid,
    pub site_article_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Input for updating an order line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderLine {
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
}
