//! Mapping from repository errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use finledger_core::budget::BudgetError;
use finledger_core::ledger::LedgerError;
use finledger_db::PostingError;
use finledger_shared::AppError;
use serde_json::json;

/// API error wrapper carrying the application error taxonomy.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<PostingError> for ApiError {
    fn from(err: PostingError) -> Self {
        let app = match err {
            PostingError::NotFound(what, id) => AppError::NotFound(format!("{what} {id}")),
            PostingError::Validation(msg) => AppError::Validation(msg),
            PostingError::InvalidAccounts(ids) => {
                AppError::Validation(format!("invalid or inactive accounts: {ids:?}"))
            }
            PostingError::Conflict(msg) => AppError::Conflict(msg),
            PostingError::Ledger(ledger) => match ledger {
                // A control account missing from the chart is a deployment
                // problem, not a client one.
                LedgerError::MissingAccount { .. } => AppError::Internal(ledger.to_string()),
                LedgerError::NonPositiveAmount | LedgerError::EmptyEntry => {
                    AppError::Validation(ledger.to_string())
                }
                LedgerError::Unbalanced { .. }
                | LedgerError::MixedLine { .. }
                | LedgerError::NegativeAmount { .. } => AppError::BusinessRule(ledger.to_string()),
            },
            PostingError::Budget(BudgetError::Exceeded {
                account_id,
                requested,
                remaining,
            }) => AppError::BusinessRule(format!(
                "budget exceeded for account {account_id}: requested {requested}, remaining {remaining}"
            )),
            PostingError::Database(db) => {
                tracing::error!(error = %db, "database error");
                AppError::Database("internal database error".to_string())
            }
        };
        Self(app)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(PostingError::NotFound("bill", 9));
        assert_eq!(err.0.status_code(), 404);
    }

    #[test]
    fn test_budget_exceeded_maps_to_422() {
        let err = ApiError::from(PostingError::Budget(BudgetError::Exceeded {
            account_id: 5,
            requested: dec!(100),
            remaining: dec!(40),
        }));
        assert_eq!(err.0.status_code(), 422);
        assert!(err.0.to_string().contains("remaining 40"));
    }

    #[test]
    fn test_missing_control_account_is_internal() {
        let err = ApiError::from(PostingError::Ledger(LedgerError::MissingAccount {
            code: "2001".to_string(),
        }));
        assert_eq!(err.0.status_code(), 500);
    }

    #[test]
    fn test_invalid_accounts_maps_to_400() {
        let err = ApiError::from(PostingError::InvalidAccounts(vec![3, 7]));
        assert_eq!(err.0.status_code(), 400);
    }
}
