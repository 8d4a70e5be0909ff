//! Chart-of-accounts routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use finledger_db::AccountRepository;
use finledger_db::entities::sea_orm_active_enums::AccountType;
use serde::Deserialize;
use serde_json::json;

use super::require;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// Creates the account routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/accounts", get(list_accounts))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Include inactive accounts when false; defaults to active only.
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_active_only() -> bool {
    true
}

async fn list_accounts(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Query(query): Query<AccountListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&ctx, "accounts.view")?;
    let accounts = AccountRepository::new(state.db.clone())
        .list(query.account_type, query.active_only)
        .await?;
    Ok(Json(json!({ "data": accounts })))
}
