//! Purchase order handlers: headers and line items.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    CreateOrderLine, CreatePurchaseOrder, OrderLine, PurchaseOrder, UpdateOrderLine,
    UpdatePurchaseOrder,
};
use crate::services::metrics::DOCUMENTS_TOTAL;
use crate::AppState;
use service_core::error::AppError;

/// Raise a purchase order from a quote.
///
/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreatePurchaseOrder>,
) -> Result<(StatusCode, Json<PurchaseOrder>), AppError> {
    let order = state.db.create_purchase_order(&req).await?;
    DOCUMENTS_TOTAL.with_label_values(&["purchase_order"]).inc();
    Ok((StatusCode::CREATED, Json(order)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub client_id: Option<Uuid>,
}

/// List purchase orders, optionally for one client.
///
/// GET /orders?client_id=...
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<PurchaseOrder>>, AppError> {
    let orders = state.db.list_purchase_orders(query.client_id).await?;
    Ok(Json(orders))
}

/// Purchase order with the informational sum of its line totals.
#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub line_total_sum: Decimal,
}

/// Get a purchase order with its line-total sum.
///
/// GET /orders/:order_id
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, AppError> {
    let order = state
        .db
        .get_purchase_order(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Purchase order not found")))?;
    let line_total_sum = state.db.sum_order_line_totals(order_id).await?;
    Ok(Json(OrderDetailResponse {
        order,
        line_total_sum,
    }))
}

/// Update a purchase order header.
///
/// PUT /orders/:order_id
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<UpdatePurchaseOrder>,
) -> Result<Json<PurchaseOrder>, AppError> {
    let order = state
        .db
        .update_purchase_order(order_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Purchase order not found")))?;
    Ok(Json(order))
}

/// Add a line to a purchase order.
///
/// POST /orders/:order_id/lines
pub async fn add_line(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<CreateOrderLine>,
) -> Result<(StatusCode, Json<OrderLine>), AppError> {
    let line = state.db.add_order_line(order_id, &req).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// List the lines of a purchase order.
///
/// GET /orders/:order_id/lines
pub async fn list_lines(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<OrderLine>>, AppError> {
    let lines = state.db.get_order_lines(order_id).await?;
    Ok(Json(lines))
}

/// Update an order line.
///
/// PUT /orders/:order_id/lines/:line_id
pub async fn update_line(
    State(state): State<AppState>,
    Path((order_id, line_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateOrderLine>,
) -> Result<Json<OrderLine>, AppError> {
    let line = state
        .db
        .update_order_line(order_id, line_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order line not found")))?;
    Ok(Json(line))
}

/// Remove an order line.
///
/// DELETE /orders/:order_id/lines/:line_id
pub async fn remove_line(
    State(state): State<AppState>,
    Path((order_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let removed = state.db.remove_order_line(order_id, line_id).await?;
    if !removed {
        return Err(AppError::NotFound(anyhow::anyhow!("Order line not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
