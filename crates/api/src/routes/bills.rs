//! Vendor bill routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{NaiveDate, Utc};
use finledger_core::document::{DocumentStatus, LineItemInput};
use finledger_db::BillRepository;
use finledger_db::repositories::bill::{BillFilter, BillInput};
use finledger_shared::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use super::require;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// Creates the bill routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bills", get(list_bills))
        .route("/bills", post(create_bill))
        .route("/bills/next-number", get(next_number))
        .route("/bills/aging", get(aging))
        .route("/bills/{id}", get(get_bill))
        .route("/bills/{id}", put(update_bill))
        .route("/bills/{id}", delete(delete_bill))
}

fn repo(state: &AppState) -> BillRepository {
    BillRepository::new(
        state.db.clone(),
        state.config.accounts.clone(),
        state.config.posting.default_tax_rate,
    )
}

/// One line item in a request body.
#[derive(Debug, Deserialize)]
pub struct LineItemRequest {
    /// Item description.
    pub description: String,
    /// Quantity; defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Expense or revenue account id.
    pub account_id: Option<i64>,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

impl From<LineItemRequest> for LineItemInput {
    fn from(item: LineItemRequest) -> Self {
        Self {
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            account_id: item.account_id,
        }
    }
}

/// Request body for creating or updating a bill.
#[derive(Debug, Deserialize)]
pub struct BillRequest {
    /// Explicit bill number; generated when absent.
    pub bill_number: Option<String>,
    /// Vendor id.
    pub vendor_id: i64,
    /// Bill date.
    pub bill_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Tax rate in percent; configuration default when absent.
    pub tax_rate: Option<Decimal>,
    /// Tax-inclusive total for a simple bill entered without items.
    pub amount: Option<Decimal>,
    /// Line items for an itemized bill.
    #[serde(default)]
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

impl From<BillRequest> for BillInput {
    fn from(req: BillRequest) -> Self {
        Self {
            bill_number: req.bill_number,
            vendor_id: req.vendor_id,
            bill_date: req.bill_date,
            due_date: req.due_date,
            tax_rate: req.tax_rate,
            amount: req.amount,
            items: req.items.into_iter().map(Into::into).collect(),
            status: req.status,
            notes: req.notes,
        }
    }
}

/// Query parameters for listing bills.
#[derive(Debug, Deserialize)]
pub struct BillListQuery {
    /// Comma-separated statuses.
    pub status: Option<String>,
    /// Filter by vendor.
    pub vendor_id: Option<i64>,
    /// Filter by bill date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by bill date range end.
    pub date_to: Option<NaiveDate>,
}

/// Parses a comma-separated status list.
pub(crate) fn parse_statuses(raw: Option<&str>) -> Result<Vec<DocumentStatus>, ApiError> {
    raw.map_or_else(
        || Ok(Vec::new()),
        |s| {
            s.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| {
                    DocumentStatus::parse(p)
                        .ok_or_else(|| AppError::Validation(format!("unknown status: {p}")).into())
                })
                .collect()
        },
    )
}

async fn list_bills(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<BillListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "bills.view")?;
    let filter = BillFilter {
        statuses: parse_statuses(query.status.as_deref())?,
        vendor_id: query.vendor_id,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let bills = repo(&state).list(filter).await?;
    Ok(Json(json!({ "data": bills })))
}

async fn next_number(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "bills.view")?;
    let number = repo(&state).next_number().await?;
    Ok(Json(json!({ "data": { "bill_number": number } })))
}

/// Query parameters for the aging report.
#[derive(Debug, Deserialize)]
pub struct AgingQuery {
    /// Report date; today when absent.
    pub as_of: Option<NaiveDate>,
}

async fn aging(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<AgingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "bills.view")?;
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let rows = repo(&state).aging(as_of).await?;
    Ok(Json(json!({ "data": rows, "as_of": as_of })))
}

async fn get_bill(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "bills.view")?;
    let found = repo(&state).get(id).await?;
    Ok(Json(json!({ "data": found.bill, "items": found.items })))
}

async fn create_bill(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Json(body): Json<BillRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "bills.create")?;
    let created = repo(&state).create(&ctx, body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": created.bill, "items": created.items })),
    ))
}

async fn update_bill(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<BillRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "bills.edit")?;
    let updated = repo(&state).update(&ctx, id, body.into()).await?;
    Ok(Json(json!({ "data": updated.bill, "items": updated.items })))
}

async fn delete_bill(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "bills.delete")?;
    repo(&state).delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statuses() {
        let parsed = parse_statuses(Some("draft, approved")).unwrap();
        assert_eq!(parsed, vec![DocumentStatus::Draft, DocumentStatus::Approved]);
        assert!(parse_statuses(Some("posted")).is_err());
        assert!(parse_statuses(None).unwrap().is_empty());
    }
}
