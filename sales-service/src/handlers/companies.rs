//! Company registry handlers.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Company, CreateCompany, UpdateCompany};
use crate::services::assets::company_logo_name;
use crate::services::metrics::ASSETS_TOTAL;
use crate::AppState;
use service_core::error::AppError;

/// Create a new company.
///
/// POST /companies
pub async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompany>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    let company = state.db.create_company(&req).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// List companies.
///
/// GET /companies
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Company>>, AppError> {
    let companies = state.db.list_companies().await?;
    Ok(Json(companies))
}

/// Get a company.
///
/// GET /companies/:company_id
pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let company = state
        .db
        .get_company(company_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Company not found")))?;
    Ok(Json(company))
}

/// Update a company.
///
/// PUT /companies/:company_id
pub async fn update_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(req): Json<UpdateCompany>,
) -> Result<Json<Company>, AppError> {
    let company = state
        .db
        .update_company(company_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Company not found")))?;
    Ok(Json(company))
}

/// Soft-delete a company. Refused while any live site still points at it.
///
/// DELETE /companies/:company_id
pub async fn delete_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.db.soft_delete_company(company_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Company not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Request carrying a base64-encoded logo image.
#[derive(Debug, Deserialize)]
pub struct UploadLogoRequest {
    pub data: String,
}

/// Attach a logo to a company.
///
/// PUT /companies/:company_id/logo
pub async fn upload_logo(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(req): Json<UploadLogoRequest>,
) -> Result<StatusCode, AppError> {
    state
        .db
        .get_company(company_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Company not found")))?;

    let bytes = general_purpose::STANDARD
        .decode(&req.data)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid base64 logo data: {}", e)))?;

    state
        .assets
        .put(&company_logo_name(company_id), &bytes)
        .await?;
    ASSETS_TOTAL.with_label_values(&["company_logo"]).inc();

    Ok(StatusCode::NO_CONTENT)
}
