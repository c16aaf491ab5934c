use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::credential::models::UserId;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated user in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Middleware that validates bearer access tokens and adds user info to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    // Signature, issuer, audience and lifetime are all checked here
    let claims = state
        .token_issuer
        .validate_access_token(token)
        .map_err(|e| {
            tracing::warn!(error = %e, "Access token validation failed");
            unauthorized("Invalid or expired token")
        })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse user ID from token");
        unauthorized("Invalid token format")
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        username: claims.username,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        unauthorized("Invalid Authorization header format. Expected: Bearer <token>")
    })
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}
