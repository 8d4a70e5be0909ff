//! Journal entry read routes.
//!
//! The journal is written only by document postings; the HTTP surface is
//! read-only.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use finledger_db::JournalRepository;
use finledger_db::entities::sea_orm_active_enums::JournalStatus;
use finledger_db::repositories::journal::JournalFilter;
use serde::Deserialize;
use serde_json::json;

use super::require;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// Creates the journal routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", get(list_entries))
        .route("/journal-entries/{id}", get(get_entry))
}

/// Query parameters for listing journal entries.
#[derive(Debug, Deserialize)]
pub struct JournalListQuery {
    /// Filter by status.
    pub status: Option<JournalStatus>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
    /// Filter by source document reference, e.g. `BILL-42`.
    pub reference: Option<String>,
}

async fn list_entries(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<JournalListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "journal.view")?;
    let filter = JournalFilter {
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
        reference: query.reference,
    };
    let entries = JournalRepository::new(state.db.clone()).list(filter).await?;
    Ok(Json(json!({ "data": entries })))
}

async fn get_entry(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "journal.view")?;
    let found = JournalRepository::new(state.db.clone()).get(id).await?;
    Ok(Json(json!({ "data": found.entry, "lines": found.lines })))
}
