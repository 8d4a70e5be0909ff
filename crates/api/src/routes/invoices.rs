//! Customer invoice routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{NaiveDate, Utc};
use finledger_core::document::DocumentStatus;
use finledger_db::InvoiceRepository;
use finledger_db::repositories::invoice::{InvoiceFilter, InvoiceInput};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use super::bills::{AgingQuery, LineItemRequest, parse_statuses};
use super::require;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// Creates the invoice routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices", post(create_invoice))
        .route("/invoices/next-number", get(next_number))
        .route("/invoices/aging", get(aging))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}", put(update_invoice))
        .route("/invoices/{id}", delete(delete_invoice))
}

fn repo(state: &AppState) -> InvoiceRepository {
    InvoiceRepository::new(
        state.db.clone(),
        state.config.accounts.clone(),
        state.config.posting.default_tax_rate,
    )
}

/// Request body for creating or updating an invoice.
#[derive(Debug, Deserialize)]
pub struct InvoiceRequest {
    /// Explicit invoice number; generated when absent.
    pub invoice_number: Option<String>,
    /// Customer id.
    pub customer_id: i64,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Tax rate in percent; configuration default when absent.
    pub tax_rate: Option<Decimal>,
    /// Line items; each must name a revenue account.
    pub items: Vec<LineItemRequest>,
    /// Target status; defaults to draft.
    #[serde(default = "default_status")]
    pub status: DocumentStatus,
    /// Free-form notes.
    pub notes: Option<String>,
}

fn default_status() -> DocumentStatus {
    DocumentStatus::Draft
}

impl From<InvoiceRequest> for InvoiceInput {
    fn from(req: InvoiceRequest) -> Self {
        Self {
            invoice_number: req.invoice_number,
            customer_id: req.customer_id,
            invoice_date: req.invoice_date,
            due_date: req.due_date,
            tax_rate: req.tax_rate,
            items: req.items.into_iter().map(Into::into).collect(),
            status: req.status,
            notes: req.notes,
        }
    }
}

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct InvoiceListQuery {
    /// Comma-separated statuses.
    pub status: Option<String>,
    /// Filter by customer.
    pub customer_id: Option<i64>,
    /// Filter by invoice date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by invoice date range end.
    pub date_to: Option<NaiveDate>,
}

async fn list_invoices(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<InvoiceListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "invoices.view")?;
    let filter = InvoiceFilter {
        statuses: parse_statuses(query.status.as_deref())?,
        customer_id: query.customer_id,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let invoices = repo(&state).list(filter).await?;
    Ok(Json(json!({ "data": invoices })))
}

async fn next_number(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "invoices.view")?;
    let number = repo(&state).next_number().await?;
    Ok(Json(json!({ "data": { "invoice_number": number } })))
}

async fn aging(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<AgingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "invoices.view")?;
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let rows = repo(&state).aging(as_of).await?;
    Ok(Json(json!({ "data": rows, "as_of": as_of })))
}

async fn get_invoice(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "invoices.view")?;
    let found = repo(&state).get(id).await?;
    Ok(Json(json!({ "data": found.invoice, "items": found.items })))
}

async fn create_invoice(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Json(body): Json<InvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "invoices.create")?;
    let created = repo(&state).create(&ctx, body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": created.invoice, "items": created.items })),
    ))
}

async fn update_invoice(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<InvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "invoices.edit")?;
    let updated = repo(&state).update(&ctx, id, body.into()).await?;
    Ok(Json(
        json!({ "data": updated.invoice, "items": updated.items }),
    ))
}

async fn delete_invoice(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "invoices.delete")?;
    repo(&state).delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
