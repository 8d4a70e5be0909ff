//! Budget read routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{Datelike, Utc};
use finledger_db::BudgetRepository;
use serde::Deserialize;
use serde_json::json;

use super::require;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// Creates the budget routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/budgets/items", get(list_items))
}

/// Query parameters for listing budget items.
#[derive(Debug, Deserialize)]
pub struct BudgetItemsQuery {
    /// Fiscal year; current year when absent.
    pub fiscal_year: Option<i32>,
    /// Narrow to one account.
    pub account_id: Option<i64>,
}

async fn list_items(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<BudgetItemsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "budgets.view")?;
    let fiscal_year = query
        .fiscal_year
        .unwrap_or_else(|| Utc::now().date_naive().year());
    let items = BudgetRepository::new(state.db.clone())
        .list_items(fiscal_year, query.account_id)
        .await?;
    Ok(Json(json!({ "data": items, "fiscal_year": fiscal_year })))
}
