//! Quote handlers: headers and line items.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CreateQuote, CreateQuoteLine, Quote, QuoteLine, UpdateQuote, UpdateQuoteLine};
use crate::services::metrics::DOCUMENTS_TOTAL;
use crate::AppState;
use service_core::error::AppError;

/// Create a new quote.
///
/// POST /quotes
pub async fn create_quote(
    State(state): State<AppState>,
    Json(req): Json<CreateQuote>,
) -> Result<(StatusCode, Json<Quote>), AppError> {
    let quote = state.db.create_quote(&req).await?;
    DOCUMENTS_TOTAL.with_label_values(&["quote"]).inc();
    Ok((StatusCode::CREATED, Json(quote)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuotesQuery {
    pub client_id: Option<Uuid>,
}

/// List quotes, optionally for one client.
///
/// GET /quotes?client_id=...
pub async fn list_quotes(
    State(state): State<AppState>,
    Query(query): Query<ListQuotesQuery>,
) -> Result<Json<Vec<Quote>>, AppError> {
    let quotes = state.db.list_quotes(query.client_id).await?;
    Ok(Json(quotes))
}

/// Quote response with the informational sum of its line totals. The
/// header total is reported as stored; the two are not reconciled.
#[derive(Debug, Serialize)]
pub struct QuoteDetailResponse {
    #[serde(flatten)]
    pub quote: Quote,
    pub line_total_sum: Decimal,
}

/// Get a quote with its line-total sum.
///
/// GET /quotes/:quote_id
pub async fn get_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<QuoteDetailResponse>, AppError> {
    let quote = state
        .db
        .get_quote(quote_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Quote not found")))?;
    let line_total_sum = state.db.sum_quote_line_totals(quote_id).await?;
    Ok(Json(QuoteDetailResponse {
        quote,
        line_total_sum,
    }))
}

/// Update a quote header.
///
/// PUT /quotes/:quote_id
pub async fn update_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
    Json(req): Json<UpdateQuote>,
) -> Result<Json<Quote>, AppError> {
    let quote = state
        .db
        .update_quote(quote_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Quote not found")))?;
    Ok(Json(quote))
}

/// Add a line to a quote.
///
/// POST /quotes/:quote_id/lines
pub async fn add_line(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
    Json(req): Json<CreateQuoteLine>,
) -> Result<(StatusCode, Json<QuoteLine>), AppError> {
    let line = state.db.add_quote_line(quote_id, &req).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// List the lines of a quote.
///
/// GET /quotes/:quote_id/lines
pub async fn list_lines(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<Vec<QuoteLine>>, AppError> {
    let lines = state.db.get_quote_lines(quote_id).await?;
    Ok(Json(lines))
}

/// Update a quote line.
///
/// PUT /quotes/:quote_id/lines/:line_id
pub async fn update_line(
    State(state): State<AppState>,
    Path((quote_id, line_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateQuoteLine>,
) -> Result<Json<QuoteLine>, AppError> {
    let line = state
        .db
        .update_quote_line(quote_id, line_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Quote line not found")))?;
    Ok(Json(line))
}

/// Remove a quote line.
///
/// DELETE /quotes/:quote_id/lines/:line_id
pub async fn remove_line(
    State(state): State<AppState>,
    Path((quote_id, line_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let removed = state.db.remove_quote_line(quote_id, line_id).await?;
    if !removed {
        return Err(AppError::NotFound(anyhow::anyhow!("Quote line not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
