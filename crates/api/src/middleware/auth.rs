//! Session authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use finledger_db::SessionRepository;
use finledger_shared::{RequestContext, Role};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(error: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": error, "message": message })),
    )
        .into_response()
}

/// Authentication middleware that resolves bearer session tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Resolves it to an unexpired session of an active user
/// 3. Stores a `RequestContext` in request extensions for handlers
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized(
            "missing_token",
            "Authorization header with Bearer token is required",
        );
    };

    let Ok(token) = Uuid::parse_str(token) else {
        return unauthorized("invalid_token", "Malformed session token");
    };

    let sessions = SessionRepository::new(state.db.clone());
    match sessions.find_valid(token).await {
        Ok(Some((user, _session))) => {
            let Some(role) = Role::parse(&user.role) else {
                tracing::warn!(user_id = user.id, role = %user.role, "unknown role on user");
                return unauthorized("invalid_session", "Session user has no valid role");
            };
            request
                .extensions_mut()
                .insert(RequestContext::new(user.id, role));
            next.run(request).await
        }
        Ok(None) => unauthorized("invalid_session", "Session is expired or unknown"),
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to validate session"
                })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated request context.
///
/// Use this in handlers behind the auth middleware:
///
/// ```ignore
/// async fn handler(AuthUser(ctx): AuthUser) -> impl IntoResponse {
///     let user_id = ctx.user_id;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
