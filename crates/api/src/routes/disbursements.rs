//! Cash disbursement routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use finledger_db::DisbursementRepository;
use finledger_db::repositories::disbursement::{DisbursementFilter, DisbursementInput};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use super::require;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// Creates the disbursement routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/disbursements", get(list_disbursements))
        .route("/disbursements", post(create_disbursement))
        .route("/disbursements/{id}", get(get_disbursement))
        .route("/disbursements/{id}", put(update_disbursement))
        .route("/disbursements/{id}", delete(delete_disbursement))
}

fn repo(state: &AppState) -> DisbursementRepository {
    DisbursementRepository::new(state.db.clone(), state.config.accounts.clone())
}

/// Request body for creating or updating a disbursement.
#[derive(Debug, Deserialize)]
pub struct DisbursementRequest {
    /// Disbursement date.
    pub disbursement_date: NaiveDate,
    /// Who was paid.
    pub payee: String,
    /// Amount paid out.
    pub amount: Decimal,
    /// Payment method, e.g. `bank_transfer`.
    pub payment_method: String,
    /// External reference, e.g. a check number.
    pub reference_number: Option<String>,
    /// What the payment was for.
    pub purpose: String,
    /// Bill this disbursement settles.
    pub bill_id: Option<i64>,
    /// Expense account debited when no bill is linked.
    pub account_id: Option<i64>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl From<DisbursementRequest> for DisbursementInput {
    fn from(req: DisbursementRequest) -> Self {
        Self {
            disbursement_date: req.disbursement_date,
            payee: req.payee,
            amount: req.amount,
            payment_method: req.payment_method,
            reference_number: req.reference_number,
            purpose: req.purpose,
            bill_id: req.bill_id,
            account_id: req.account_id,
            notes: req.notes,
        }
    }
}

/// Query parameters for listing disbursements.
#[derive(Debug, Deserialize)]
pub struct DisbursementListQuery {
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

async fn list_disbursements(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<DisbursementListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "disbursements.view")?;
    let filter = DisbursementFilter {
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let disbursements = repo(&state).list(filter).await?;
    Ok(Json(json!({ "data": disbursements })))
}

async fn get_disbursement(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "disbursements.view")?;
    let disbursement = repo(&state).get(id).await?;
    Ok(Json(json!({ "data": disbursement })))
}

async fn create_disbursement(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Json(body): Json<DisbursementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "disbursements.create")?;
    let created = repo(&state).create(&ctx, body.into()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": created }))))
}

async fn update_disbursement(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<DisbursementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "disbursements.edit")?;
    let updated = repo(&state).update(&ctx, id, body.into()).await?;
    Ok(Json(json!({ "data": updated })))
}

async fn delete_disbursement(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "disbursements.delete")?;
    repo(&state).delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
