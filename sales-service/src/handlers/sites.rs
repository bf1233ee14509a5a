//! Site handlers: CRUD, visibility scoping, footers and monthly targets.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{
    CreateMonthlyTarget, CreateSite, InvoiceFooter, MonthlyTarget, Site, UpdateSite,
};
use crate::services::access::site_scope;
use crate::AppState;
use service_core::error::AppError;

/// Create a new site.
///
/// POST /sites
pub async fn create_site(
    State(state): State<AppState>,
    Json(req): Json<CreateSite>,
) -> Result<(StatusCode, Json<Site>), AppError> {
    let site = state.db.create_site(&req).await?;
    Ok((StatusCode::CREATED, Json(site)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSitesQuery {
    /// When set, the list is restricted to the sites this user may see.
    pub user_id: Option<Uuid>,
}

/// List sites. With `user_id`, the caller's role decides visibility: a
/// superadmin sees everything, a manager only assigned sites, and a user
/// without a profile sees nothing.
///
/// GET /sites?user_id=...
pub async fn list_sites(
    State(state): State<AppState>,
    Query(query): Query<ListSitesQuery>,
) -> Result<Json<Vec<Site>>, AppError> {
    let sites = match query.user_id {
        Some(user_id) => {
            let profile = state.db.get_profile(user_id).await?;
            let scope = site_scope(profile.as_ref());
            state.db.visible_sites(&scope).await?
        }
        None => state.db.list_sites().await?,
    };
    Ok(Json(sites))
}

/// Get a site.
///
/// GET /sites/:site_id
pub async fn get_site(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
) -> Result<Json<Site>, AppError> {
    let site = state
        .db
        .get_site(site_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Site not found")))?;
    Ok(Json(site))
}

/// Update a site. Every successful update appends a history snapshot.
///
/// PUT /sites/:site_id
pub async fn update_site(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
    Json(req): Json<UpdateSite>,
) -> Result<Json<Site>, AppError> {
    let site = state
        .db
        .update_site(site_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Site not found")))?;
    Ok(Json(site))
}

/// Soft-delete a site. Refused while live clients still reference it.
///
/// DELETE /sites/:site_id
pub async fn delete_site(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.db.soft_delete_site(site_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Site not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Compose the printed footer for a site's documents.
///
/// GET /sites/:site_id/footer
pub async fn get_invoice_footer(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
) -> Result<Json<InvoiceFooter>, AppError> {
    let site = state
        .db
        .get_site(site_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Site not found")))?;
    let company = state
        .db
        .get_company(site.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Owning company not found")))?;
    Ok(Json(site.invoice_footer(&company)))
}

#[derive(Debug, Deserialize)]
pub struct CreateTargetRequest {
    pub month: chrono::NaiveDate,
}

/// Create a monthly target for a site. One per (site, month).
///
/// POST /sites/:site_id/targets
pub async fn create_monthly_target(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
    Json(req): Json<CreateTargetRequest>,
) -> Result<(StatusCode, Json<MonthlyTarget>), AppError> {
    state
        .db
        .get_site(site_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Site not found")))?;

    let target = state
        .db
        .create_monthly_target(&CreateMonthlyTarget {
            site_id,
            month: req.month,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(target)))
}

/// List a site's monthly targets.
///
/// GET /sites/:site_id/targets
pub async fn list_monthly_targets(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
) -> Result<Json<Vec<MonthlyTarget>>, AppError> {
    let targets = state.db.list_monthly_targets(site_id).await?;
    Ok(Json(targets))
}
