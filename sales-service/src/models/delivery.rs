//! Delivery note model: third stage of the document chain.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Delivery progress status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    InProgress,
    Cancelled,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::InProgress => "in_progress",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "delivered" => DeliveryStatus::Delivered,
            "cancelled" => DeliveryStatus::Cancelled,
            _ => DeliveryStatus::InProgress,
        }
    }
}

/// Delivery note header.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeliveryNote {
    pub delivery_note_id: Uuid,
    pub purchase_order_id: Uuid,
    pub client_id: Uuid,
    pub delivery_date: DateTime<Utc>,
    pub status: String,
    pub delivery_address: String,
}

/// Delivery line item. Total = quantity x unit price.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeliveryLine {
    pub delivery_line_id: Uuid,
    pub delivery_note_id: Uuid,
    pub product_id: Uuid,
    pub site_article_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a delivery note.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeliveryNote {
    pub purchase_order_id: Uuid,
    pub client_id: Uuid,
    pub delivery_date: Option<DateTime<Utc>>,
    pub delivery_address: String,
}

/// Input for updating a delivery note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDeliveryNote {
    pub delivery_date: Option<DateTime<Utc>>,
    pub status: Option<DeliveryStatus>,
    pub delivery_address: Option<String>,
}

/// Input for adding a delivery line. The total is derived, never supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeliveryLine {
    pub product_id: Uuid,
    pub site_article_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Input for updating a delivery line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDeliveryLine {
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
}
