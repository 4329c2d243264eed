//! services/api/src/web/middleware.rs
//!
//! Request gates: dashboard authentication and the site-wide coming-soon mode.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;

/// Compares two byte strings without exiting early on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Middleware that validates the dashboard bearer token.
///
/// If missing or wrong, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract the Authorization header
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Compare against the configured token
    if !constant_time_eq(token.trim().as_bytes(), state.config.dashboard_token.as_bytes()) {
        warn!("Rejected dashboard request with an invalid token");
        return Err(StatusCode::UNAUTHORIZED);
    }

    // 3. Continue to the handler
    Ok(next.run(req).await)
}

/// Middleware that replaces the public API with a placeholder while the site
/// runs in coming-soon mode. Dashboard routes are not wrapped by it.
pub async fn coming_soon_gate(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if state.config.show_coming_soon {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "comingSoon": true })),
        )
            .into_response();
    }
    next.run(req).await
}
