//! Invoice handlers.
//!
//! The wall clock enters exactly once, at the read boundary, where the
//! overdue predicate is evaluated for the response.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CreateInvoice, Invoice, UpdateInvoice};
use crate::services::metrics::DOCUMENTS_TOTAL;
use crate::AppState;
use service_core::error::AppError;

/// Invoice response with the two read-time predicates evaluated.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub is_paid: bool,
    pub is_overdue: bool,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        let now = Utc::now();
        Self {
            is_paid: invoice.is_paid(),
            is_overdue: invoice.is_overdue(now),
            invoice,
        }
    }
}

/// Create an invoice against a purchase order.
///
/// POST /invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(req): Json<CreateInvoice>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    let invoice = state.db.create_invoice(&req).await?;
    DOCUMENTS_TOTAL.with_label_values(&["invoice"]).inc();
    Ok((StatusCode::CREATED, Json(invoice.into())))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListInvoicesQuery {
    pub client_id: Option<Uuid>,
}

/// List invoices, optionally for one client.
///
/// GET /invoices?client_id=...
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let invoices = state.db.list_invoices(query.client_id).await?;
    Ok(Json(invoices.into_iter().map(Into::into).collect()))
}

/// Get an invoice.
///
/// GET /invoices/:invoice_id
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = state
        .db
        .get_invoice(invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;
    Ok(Json(invoice.into()))
}

/// Update an invoice. Tax and remaining balance come back recomputed.
///
/// PUT /invoices/:invoice_id
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(req): Json<UpdateInvoice>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = state
        .db
        .update_invoice(invoice_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;
    Ok(Json(invoice.into()))
}
