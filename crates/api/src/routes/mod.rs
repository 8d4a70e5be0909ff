//! API route definitions.

use axum::{Router, middleware};
use finledger_shared::{AppError, RequestContext};

use crate::error::ApiError;
use crate::{AppState, middleware::auth::auth_middleware};

pub mod accounts;
pub mod adjustments;
pub mod bills;
pub mod budgets;
pub mod disbursements;
pub mod health;
pub mod invoices;
pub mod journal_entries;
pub mod tasks;

/// Creates the API router: public health plus authenticated routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(accounts::routes())
        .merge(adjustments::routes())
        .merge(bills::routes())
        .merge(budgets::routes())
        .merge(disbursements::routes())
        .merge(invoices::routes())
        .merge(journal_entries::routes())
        .merge(tasks::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Rejects callers lacking the named permission.
pub(crate) fn require(ctx: &RequestContext, permission: &str) -> Result<(), ApiError> {
    if ctx.has_permission(permission) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("requires {permission}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finledger_shared::Role;

    #[test]
    fn test_require_denies_staff_deletes() {
        let ctx = RequestContext::new(3, Role::Staff);
        assert!(require(&ctx, "bills.view").is_ok());
        assert!(require(&ctx, "bills.delete").is_err());
    }
}
