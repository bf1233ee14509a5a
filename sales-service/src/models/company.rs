//! Company model for sales-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registered legal structure of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalForm {
    Sarl,
    SarlAu,
    Sa,
}

impl LegalForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegalForm::Sarl => "sarl",
            LegalForm::SarlAu => "sarl_au",
            LegalForm::Sa => "sa",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "sarl_au" => LegalForm::SarlAu,
            "sa" => LegalForm::Sa,
            _ => LegalForm::Sarl,
        }
    }

    /// Label used on printed documents.
    pub fn display_label(&self) -> &'static str {
        match self {
            LegalForm::Sarl => "SARL",
            LegalForm::SarlAu => "SARL AU",
            LegalForm::Sa => "SA",
        }
    }
}

/// Company record. Carries the billing identity reused by invoice footers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub company_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub patente: Option<String>,
    pub trade_registry: Option<String>,
    pub cnss_number: Option<String>,
    pub fiscal_id: Option<String>,
    pub ice_number: Option<String>,
    pub bank_rib: Option<String>,
    pub legal_form: Option<String>,
    pub registered_capital: Option<Decimal>,
    pub email: Option<String>,
    pub business_sector: Option<String>,
    pub active: bool,
    pub deleted: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Company {
    /// Name plus the legal-form label when one is set.
    pub fn display_name(&self) -> String {
        match self.legal_form.as_deref() {
            Some(form) => format!("{} {}", self.name, LegalForm::from_string(form).display_label()),
            None => self.name.clone(),
        }
    }
}

/// Input for creating a company.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub patente: Option<String>,
    pub trade_registry: Option<String>,
    pub cnss_number: Option<String>,
    pub fiscal_id: Option<String>,
    pub ice_number: Option<String>,
    pub bank_rib: Option<String>,
    pub legal_form: Option<LegalForm>,
    pub registered_capital: Option<Decimal>,
    pub email: Option<String>,
    pub business_sector: Option<String>,
}

/// Input for updating a company. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub patente: Option<String>,
    pub trade_registry: Option<String>,
    pub cnss_number: Option<String>,
    pub fiscal_id: Option<String>,
    pub ice_number: Option<String>,
    pub bank_rib: Option<String>,
    pub legal_form: Option<LegalForm>,
    pub registered_capital: Option<Decimal>,
    pub email: Option<String>,
    pub business_sector: Option<String>,
    pub active: Option<bool>,
}
