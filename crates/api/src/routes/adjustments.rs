//! AP/AR adjustment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use finledger_core::document::{AdjustmentType, DocumentStatus};
use finledger_db::AdjustmentRepository;
use finledger_db::repositories::adjustment::{AdjustmentFilter, AdjustmentInput};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use super::require;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// Creates the adjustment routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/adjustments", get(list_adjustments))
        .route("/adjustments", post(create_adjustment))
        .route("/adjustments/{id}", get(get_adjustment))
        .route("/adjustments/{id}", put(update_adjustment))
        .route("/adjustments/{id}", delete(delete_adjustment))
}

fn repo(state: &AppState) -> AdjustmentRepository {
    AdjustmentRepository::new(state.db.clone(), state.config.accounts.clone())
}

/// Request body for creating or updating an adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustmentRequest {
    /// Kind of adjustment.
    pub adjustment_type: AdjustmentType,
    /// Vendor for a payable-side adjustment.
    pub vendor_id: Option<i64>,
    /// Customer for a receivable-side adjustment.
    pub customer_id: Option<i64>,
    /// Bill the adjustment applies to.
    pub bill_id: Option<i64>,
    /// Invoice the adjustment applies to.
    pub invoice_id: Option<i64>,
    /// Adjustment date.
    pub adjustment_date: NaiveDate,
    /// Adjustment amount, always positive.
    pub amount: Decimal,
    /// Why the adjustment was made.
    pub reason: Option<String>,
    /// Target status; defaults to draft.
    #[serde(default = "default_status")]
    pub status: DocumentStatus,
}

fn default_status() -> DocumentStatus {
    DocumentStatus::Draft
}

impl From<AdjustmentRequest> for AdjustmentInput {
    fn from(req: AdjustmentRequest) -> Self {
        Self {
            adjustment_type: req.adjustment_type,
            vendor_id: req.vendor_id,
            customer_id: req.customer_id,
            bill_id: req.bill_id,
            invoice_id: req.invoice_id,
            adjustment_date: req.adjustment_date,
            amount: req.amount,
            reason: req.reason,
            status: req.status,
        }
    }
}

/// Query parameters for listing adjustments.
#[derive(Debug, Deserialize)]
pub struct AdjustmentListQuery {
    /// Filter by adjustment type.
    pub adjustment_type: Option<AdjustmentType>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

async fn list_adjustments(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<AdjustmentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "adjustments.view")?;
    let filter = AdjustmentFilter {
        adjustment_type: query.adjustment_type,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let adjustments = repo(&state).list(filter).await?;
    Ok(Json(json!({ "data": adjustments })))
}

async fn get_adjustment(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "adjustments.view")?;
    let adjustment = repo(&state).get(id).await?;
    Ok(Json(json!({ "data": adjustment })))
}

async fn create_adjustment(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Json(body): Json<AdjustmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "adjustments.create")?;
    let created = repo(&state).create(&ctx, body.into()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": created }))))
}

async fn update_adjustment(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<AdjustmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "adjustments.edit")?;
    let updated = repo(&state).update(&ctx, id, body.into()).await?;
    Ok(Json(json!({ "data": updated })))
}

async fn delete_adjustment(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "adjustments.delete")?;
    repo(&state).delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
