//! Client registry handlers.
//!
//! Every client save regenerates the identifier badge from the stored
//! record, so the asset never drifts from the data it encodes.

use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Client, CreateClient, UpdateClient};
use crate::services::assets::{badge_base64, badge_png, client_badge_name};
use crate::services::metrics::ASSETS_TOTAL;
use crate::AppState;
use service_core::error::AppError;

/// Client response carrying the badge alongside the record.
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    #[serde(flatten)]
    pub client: Client,
    /// Base64 PNG of the identifier badge.
    pub badge: String,
}

async fn store_badge(state: &AppState, client: &Client) -> Result<String, AppError> {
    let payload = client.badge_payload();
    let png = badge_png(&payload)?;
    state
        .assets
        .put(&client_badge_name(client.client_id), &png)
        .await?;
    ASSETS_TOTAL.with_label_values(&["client_badge"]).inc();
    badge_base64(&payload)
}

/// Create a new client.
///
/// POST /clients
pub async fn create_client(
    State(state): State<AppState>,
    Json(req): Json<CreateClient>,
) -> Result<(StatusCode, Json<ClientResponse>), AppError> {
    let client = state.db.create_client(&req).await?;
    let badge = store_badge(&state, &client).await?;
    Ok((StatusCode::CREATED, Json(ClientResponse { client, badge })))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListClientsQuery {
    pub site_id: Option<Uuid>,
}

/// List clients, optionally scoped to a site.
///
/// GET /clients?site_id=...
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> Result<Json<Vec<Client>>, AppError> {
    let clients = state.db.list_clients(query.site_id).await?;
    Ok(Json(clients))
}

/// Get a client.
///
/// GET /clients/:client_id
pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    let client = state
        .db
        .get_client(client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;
    Ok(Json(client))
}

/// Update a client. The badge is regenerated unconditionally, even when
/// none of the encoded fields changed.
///
/// PUT /clients/:client_id
pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(req): Json<UpdateClient>,
) -> Result<Json<ClientResponse>, AppError> {
    let client = state
        .db
        .update_client(client_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;
    let badge = store_badge(&state, &client).await?;
    Ok(Json(ClientResponse { client, badge }))
}

/// Soft-delete a client.
///
/// DELETE /clients/:client_id
pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.db.soft_delete_client(client_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Client not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Render a client's identifier badge as PNG.
///
/// GET /clients/:client_id/badge
pub async fn get_badge(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let client = state
        .db
        .get_client(client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;
    let png = badge_png(&client.badge_payload())?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
