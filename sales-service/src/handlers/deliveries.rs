//! Delivery note handlers: headers and line items.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{
    CreateDeliveryLine, CreateDeliveryNote, DeliveryLine, DeliveryNote, UpdateDeliveryLine,
    UpdateDeliveryNote,
};
use crate::services::metrics::DOCUMENTS_TOTAL;
use crate::AppState;
use service_core::error::AppError;

/// Create a delivery note against a purchase order.
///
/// POST /deliveries
pub async fn create_delivery_note(
    State(state): State<AppState>,
    Json(req): Json<CreateDeliveryNote>,
) -> Result<(StatusCode, Json<DeliveryNote>), AppError> {
    let note = state.db.create_delivery_note(&req).await?;
    DOCUMENTS_TOTAL.with_label_values(&["delivery_note"]).inc();
    Ok((StatusCode::CREATED, Json(note)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListDeliveriesQuery {
    pub client_id: Option<Uuid>,
}

/// List delivery notes, optionally for one client.
///
/// GET /deliveries?client_id=...
pub async fn list_delivery_notes(
    State(state): State<AppState>,
    Query(query): Query<ListDeliveriesQuery>,
) -> Result<Json<Vec<DeliveryNote>>, AppError> {
    let notes = state.db.list_delivery_notes(query.client_id).await?;
    Ok(Json(notes))
}

/// Get a delivery note.
///
/// GET /deliveries/:note_id
pub async fn get_delivery_note(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
) -> Result<Json<DeliveryNote>, AppError> {
    let note = state
        .db
        .get_delivery_note(note_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Delivery note not found")))?;
    Ok(Json(note))
}

/// Update a delivery note.
///
/// PUT /deliveries/:note_id
pub async fn update_delivery_note(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
    Json(req): Json<UpdateDeliveryNote>,
) -> Result<Json<DeliveryNote>, AppError> {
    let note = state
        .db
        .update_delivery_note(note_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Delivery note not found")))?;
    Ok(Json(note))
}

/// Add a line to a delivery note.
///
/// POST /deliveries/:note_id/lines
pub async fn add_line(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
    Json(req): Json<CreateDeliveryLine>,
) -> Result<(StatusCode, Json<DeliveryLine>), AppError> {
    let line = state.db.add_delivery_line(note_id, &req).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// List the lines of a delivery note.
///
/// GET /deliveries/:note_id/lines
pub async fn list_lines(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
) -> Result<Json<Vec<DeliveryLine>>, AppError> {
    let lines = state.db.get_delivery_lines(note_id).await?;
    Ok(Json(lines))
}

/// Update a delivery line.
///
/// PUT /deliveries/:note_id/lines/:line_id
pub async fn update_line(
    State(state): State<AppState>,
    Path((note_id, line_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateDeliveryLine>,
) -> Result<Json<DeliveryLine>, AppError> {
    let line = state
        .db
        .update_delivery_line(note_id, line_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Delivery line not found")))?;
    Ok(Json(line))
}

/// Remove a delivery line.
///
/// DELETE /deliveries/:note_id/lines/:line_id
pub async fn remove_line(
    State(state): State<AppState>,
    Path((note_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let removed = state.db.remove_delivery_line(note_id, line_id).await?;
    if !removed {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Delivery line not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
