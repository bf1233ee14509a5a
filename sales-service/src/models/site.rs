//! Site model and the invoice footer composer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Company;

/// Fixed regional codes a site can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Ma01,
    Ma02,
    Ma03,
    Ma04,
    Ma05,
    Ma06,
    Ma07,
    Ma08,
    Ma09,
    Ma10,
    Ma11,
    Ma12,
    Other,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Ma01 => "MA01",
            Region::Ma02 => "MA02",
            Region::Ma03 => "MA03",
            Region::Ma04 => "MA04",
            Region::Ma05 => "MA05",
            Region::Ma06 => "MA06",
            Region::Ma07 => "MA07",
            Region::Ma08 => "MA08",
            Region::Ma09 => "MA09",
            Region::Ma10 => "MA10",
            Region::Ma11 => "MA11",
            Region::Ma12 => "MA12",
            Region::Other => "ATRE",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "MA01" => Region::Ma01,
            "MA02" => Region::Ma02,
            "MA03" => Region::Ma03,
            "MA04" => Region::Ma04,
            "MA05" => Region::Ma05,
            "MA06" => Region::Ma06,
            "MA07" => Region::Ma07,
            "MA08" => Region::Ma08,
            "MA09" => Region::Ma09,
            "MA10" => Region::Ma10,
            "MA11" => Region::Ma11,
            "MA12" => Region::Ma12,
            _ => Region::Other,
        }
    }
}

/// Site record. Belongs to exactly one company; the unit clients and
/// access roles are scoped against.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Site {
    pub site_id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub invoice_name: String,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub patente: Option<String>,
    pub reference_code: String,
    pub bank_rib: Option<String>,
    pub region: String,
    pub active: bool,
    pub deleted: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Text fragments printed at the bottom of rendered documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceFooter {
    pub header: String,
    pub additional_info: String,
    pub payment_info: String,
}

/// Joins the present fragments with " - "; absent fields leave no
/// separator artifact behind.
fn join_present(parts: &[Option<String>]) -> String {
    parts
        .iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join(" - ")
}

impl Site {
    /// Compose the three footer fragments from this site and its owning
    /// company. Pure formatting over already-validated data.
    pub fn invoice_footer(&self, company: &Company) -> InvoiceFooter {
        // Company phone wins; the site phone is the fallback.
        let phone = company
            .phone
            .as_deref()
            .or(self.phone.as_deref())
            .unwrap_or_default();
        let mut header = format!("{} - Tel: {}", company.display_name(), phone);
        if let Some(sector) = &company.business_sector {
            header.push_str(&format!(" - Business sector: {}", sector));
        }

        let additional_info = join_present(&[
            company.city.as_ref().map(|v| format!("City: {}", v)),
            company.ice_number.as_ref().map(|v| format!("ICE: {}", v)),
            company.trade_registry.as_ref().map(|v| format!("RC: {}", v)),
            company.fiscal_id.as_ref().map(|v| format!("Fiscal ID: {}", v)),
            company.cnss_number.as_ref().map(|v| format!("CNSS: {}", v)),
        ]);

        let payment_info = join_present(&[
            self.bank_rib.as_ref().map(|v| format!("RIB: {}", v)),
            company
                .registered_capital
                .as_ref()
                .map(|v| format!("Registered capital: {} MAD", v)),
        ]);

        InvoiceFooter {
            header,
            additional_info,
            payment_info,
        }
    }
}

/// Input for creating a site. The owning company must be active.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSite {
    pub company_id: Uuid,
    pub name: String,
    pub invoice_name: String,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub patente: Option<String>,
    pub reference_code: String,
    pub bank_rib: Option<String>,
    pub region: Region,
}

/// Input for updating a site. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSite {
    pub name: Option<String>,
    pub invoice_name: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub patente: Option<String>,
    pub reference_code: Option<String>,
    pub bank_rib: Option<String>,
    pub region: Option<Region>,
    pub active: Option<bool>,
}
