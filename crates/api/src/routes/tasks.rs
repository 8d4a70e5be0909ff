//! Task routes.
//!
//! Tasks are produced by the posting layer (budget approval requests);
//! the HTTP surface only lists the caller's pending ones.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use finledger_db::TaskRepository;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// Creates the task routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/tasks/pending", get(list_pending))
}

async fn list_pending(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = TaskRepository::new(state.db.clone())
        .pending_for(ctx.user_id)
        .await?;
    Ok(Json(json!({ "data": tasks })))
}
