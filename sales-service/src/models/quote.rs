//! Quote model: the first stage of the document chain.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Status shared by quotes and purchase orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Accepted,
    Refused,
    Cancelled,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Accepted => "accepted",
            DocumentStatus::Refused => "refused",
            DocumentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "accepted" => DocumentStatus::Accepted,
            "refused" => DocumentStatus::Refused,
            "cancelled" => DocumentStatus::Cancelled,
            _ => DocumentStatus::Pending,
        }
    }
}

/// Quote header. `total` is informational; the sum of the line totals is
/// queried separately and nothing forces the two to match.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub quote_id: Uuid,
    pub client_id: Uuid,
    pub created_utc: DateTime<Utc>,
    pub expires_utc: Option<DateTime<Utc>>,
    pub status: String,
    pub total: Decimal,
    pub discount_pct: Decimal,
    pub tax_pct: Decimal,
}

/// Quote line item. `line_total` is recomputed on every save.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuoteLine {
    pub quote_line_id: Uuid,
    pub quote_id: Uuid,
    pub product_id: Uuid,
    pub site_article_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_pct: Decimal,
    pub line_total: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a quote.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuote {
    pub client_id: Uuid,
    pub expires_utc: Option<DateTime<Utc>>,
    pub total: Decimal,
    #[serde(default)]
    pub discount_pct: Decimal,
    #[serde(default)]
    pub tax_pct: Decimal,
}

/// Input for updating a quote header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuote {
    pub expires_utc: Option<DateTime<Utc>>,
    pub status: Option<DocumentStatus>,
    pub total: Option<Decimal>,
    pub discount_pct: Option<Decimal>,
    pub tax_pct: Option<Decimal>,
}

/// Input for adding a quote line. The total is derived, never supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuoteLine {
    pub product_id: Uuid,
    pub site_article_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount_pct: Decimal,
}

/// Input for updating a quote line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuoteLine {
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub discount_pct: Option<Decimal>,
}
