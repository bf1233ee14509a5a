//! Client model and type-conditional validation.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?\d{10,15}$").expect("phone regex must compile"));

/// Client type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    Individual,
    Enterprise,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Individual => "individual",
            ClientType::Enterprise => "enterprise",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "enterprise" => ClientType::Enterprise,
            _ => ClientType::Individual,
        }
    }
}

/// Client record. Email is unique across the registry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub client_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub client_type: String,
    pub active: bool,
    pub deleted: bool,
    pub site_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub enterprise_name: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Client {
    /// Payload encoded into the client identifier badge.
    pub fn badge_payload(&self) -> String {
        format!(
            "{}|{}|{}",
            self.name,
            self.email,
            self.phone.as_deref().unwrap_or_default()
        )
    }
}

/// Input for creating a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone: Option<String>,

    pub client_type: ClientType,
    pub site_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub enterprise_name: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
}

/// Input for updating a client. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClient {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone: Option<String>,

    pub client_type: Option<ClientType>,
    pub active: Option<bool>,
    pub site_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub enterprise_name: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
}

/// Identifier merge for updates. Enterprise clients keep stored values
/// when the input omits them; a record whose merged type is Individual
/// drops the stored identifiers instead of carrying them forward, so
/// only explicitly supplied ones reach validation.
pub fn merge_type_identifiers(
    client_type: ClientType,
    input_siret: Option<&str>,
    input_vat: Option<&str>,
    stored_siret: Option<&str>,
    stored_vat: Option<&str>,
) -> (Option<String>, Option<String>) {
    match client_type {
        ClientType::Individual => (
            input_siret.map(str::to_owned),
            input_vat.map(str::to_owned),
        ),
        ClientType::Enterprise => (
            input_siret.or(stored_siret).map(str::to_owned),
            input_vat.or(stored_vat).map(str::to_owned),
        ),
    }
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

/// Mutual-exclusivity check between the type discriminator and the tax
/// identifiers. Runs before any persistence, so a partially-invalid
/// record never reaches the store.
pub fn check_type_fields(
    client_type: ClientType,
    siret: Option<&str>,
    vat_number: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    match client_type {
        ClientType::Enterprise => {
            if !present(siret) {
                let mut err = ValidationError::new("required_for_enterprise");
                err.message = Some("SIRET number is required for enterprise clients".into());
                errors.add("siret", err);
            }
            if !present(vat_number) {
                let mut err = ValidationError::new("required_for_enterprise");
                err.message = Some("VAT number is required for enterprise clients".into());
                errors.add("vat_number", err);
            }
        }
        ClientType::Individual => {
            if present(siret) {
                let mut err = ValidationError::new("forbidden_for_individual");
                err.message = Some("SIRET number must not be set for individual clients".into());
                errors.add("siret", err);
            }
            if present(vat_number) {
                let mut err = ValidationError::new("forbidden_for_individual");
                err.message = Some("VAT number must not be set for individual clients".into());
                errors.add("vat_number", err);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
